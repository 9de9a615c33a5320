//! Per-model detail cards and the agreement view.

use crate::models::{AnalysisResult, Conclusion, ModelId, ModelMetadata, Sentiment};
use crate::scoring::ScoreView;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelDetail {
    pub model: ModelId,
    pub name: String,
    pub description: String,
    // Only set when the label is a category the model could vote for
    pub sentiment: Option<Sentiment>,
    pub label: Option<String>,
    pub scores: Option<ScoreView>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgreementEntry {
    pub sentiment: Sentiment,
    pub label: String,
    pub votes: usize,
    // Display names, canonical model order
    pub models: Vec<String>,
}

/// One card per model, failed ones included so their error can be shown.
pub fn model_details(result: Option<&AnalysisResult>, metadata: &ModelMetadata) -> Vec<ModelDetail> {
    let Some(result) = result else {
        return Vec::new();
    };

    ModelId::ALL
        .iter()
        .map(|model| {
            let outcome = result.outcome(*model);
            let usable = outcome.and_then(|o| o.usable());
            ModelDetail {
                model: *model,
                name: metadata.display_name(*model),
                description: metadata.description(*model),
                sentiment: usable.and_then(|r| r.sentiment),
                label: usable.map(|r| r.label.clone()),
                scores: usable.map(ScoreView::from_result),
                error: outcome
                    .and_then(|o| o.error())
                    .map(str::to_string)
                    .or_else(|| usable.is_none().then(|| crate::validation::NO_DATA_ERROR.to_string())),
            }
        })
        .collect()
}

/// Always three entries, one per category, even with zero votes.
pub fn agreement(conclusion: Option<&Conclusion>, metadata: &ModelMetadata) -> Vec<AgreementEntry> {
    let Some(conclusion) = conclusion else {
        return Vec::new();
    };

    Sentiment::ALL
        .iter()
        .map(|sentiment| AgreementEntry {
            sentiment: *sentiment,
            label: sentiment.title().to_string(),
            votes: conclusion.votes(*sentiment),
            models: conclusion
                .bucket(*sentiment)
                .iter()
                .map(|model| metadata.display_name(*model))
                .collect(),
        })
        .collect()
}
