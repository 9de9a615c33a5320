//! End-to-end aggregation: validate, normalize, vote, then project into
//! chart datasets. Every step is a pure function of its input.

use crate::charts::{self, AgreementEntry, ChartDatasets, ModelDetail};
use crate::models::{AnalysisResult, Conclusion, ModelMetadata, RawAnalysis, SentimentPalette};
use crate::scoring;
use crate::voting;
use log::debug;
use serde::Serialize;

/// Everything the presentation layer needs for one analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisView {
    pub conclusion: Option<Conclusion>,
    pub datasets: ChartDatasets,
    pub details: Vec<ModelDetail>,
    pub agreement: Vec<AgreementEntry>,
}

impl AnalysisView {
    pub fn is_empty(&self) -> bool {
        self.conclusion.is_none() && self.datasets.is_empty() && self.details.is_empty()
    }
}

pub struct Pipeline {
    metadata: ModelMetadata,
    palette: SentimentPalette,
}

impl Pipeline {
    pub fn new(metadata: ModelMetadata, palette: SentimentPalette) -> Self {
        Self { metadata, palette }
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    pub fn palette(&self) -> &SentimentPalette {
        &self.palette
    }

    /// Project an analysis, or nothing, into a view. `None` gives an empty view.
    pub fn run(&self, result: Option<&AnalysisResult>) -> AnalysisView {
        let scores = result.map(scoring::normalize);
        // The breakdown depends on the conclusion, so vote first
        let conclusion = result.map(voting::calculate_consensus);

        let datasets = charts::build_datasets(
            result,
            scores.as_ref(),
            conclusion.as_ref(),
            &self.metadata,
            &self.palette,
        );

        AnalysisView {
            details: charts::model_details(result, &self.metadata),
            agreement: charts::agreement(conclusion.as_ref(), &self.metadata),
            conclusion,
            datasets,
        }
    }

    /// Validate a raw endpoint payload and run it. The endpoint's own
    /// conclusion is never trusted, only compared against.
    pub fn run_raw(&self, raw: &RawAnalysis) -> AnalysisView {
        let result = AnalysisResult::from_raw(raw);
        let view = self.run(Some(&result));

        if let Some(reported) = raw.reported_final_sentiment() {
            let local = view
                .conclusion
                .as_ref()
                .and_then(|c| c.final_sentiment)
                .map(|s| s.as_str())
                .unwrap_or("none");
            if reported != local {
                debug!("Endpoint reported final sentiment '{}', recomputed '{}'", reported, local);
            }
        }

        view
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(ModelMetadata::default(), SentimentPalette::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sentiment;
    use serde_json::json;

    #[test]
    fn test_no_result_renders_nothing() {
        let view = Pipeline::default().run(None);
        assert!(view.is_empty());
        assert!(view.agreement.is_empty());
    }

    #[test]
    fn test_endpoint_conclusion_is_recomputed() {
        // Endpoint resolved this 3-way tie to neutral; locally positive wins
        let raw = RawAnalysis {
            vader: Some(json!({"positive": 0.6, "neutral": 0.3, "negative": 0.1, "compound": 0.4, "sentiment": "positive"})),
            naive_bayes: Some(json!({"positive": 0.1, "neutral": 0.2, "negative": 0.7, "sentiment": "negative"})),
            roberta: Some(json!({"positive": 0.2, "neutral": 0.6, "negative": 0.2, "sentiment": "neutral"})),
            conclusion: Some(json!({"final_sentiment": "neutral", "positive": ["vader"]})),
        };

        let view = Pipeline::default().run_raw(&raw);
        let conclusion = view.conclusion.expect("conclusion should be present");
        assert_eq!(conclusion.final_sentiment, Some(Sentiment::Positive));
        assert_eq!(view.datasets.breakdown.len(), 3);
    }
}
