//! Full-axis datasets
//!
//! Every builder here always emits one row per category (or per model) and
//! writes 0 for a model without usable scores. A 0 on these charts is a
//! measured value, so rows are never dropped. The only way to get an empty
//! dataset is to have nothing to chart: no analysis, or no usable model.

use crate::models::{AnalysisResult, ModelId, ModelKind, ModelMetadata, Sentiment};
use crate::scoring::{NormalizedScores, ScoreView};
use serde::Serialize;

/// Lexicon model composition, one row per category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositionRow {
    pub sentiment: Sentiment,
    pub label: String,
    pub model: ModelId,
    pub series: String,
    pub value: f64,
}

/// One model's value on a category row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub model: ModelId,
    pub name: String,
    pub color: String,
    pub value: f64,
}

/// Classifier probabilities for one category, one column per classifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilityRow {
    pub sentiment: Sentiment,
    pub label: String,
    pub columns: Vec<SeriesPoint>,
}

/// One spoke of the radar chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarAxis {
    pub sentiment: Sentiment,
    pub axis: String,
    pub series: Vec<SeriesPoint>,
}

/// Grouped-bar row, one per model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelComparisonRow {
    pub model: ModelId,
    pub name: String,
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
    // Label as reported (even one that did not vote), or "error" for a failed model
    pub sentiment: String,
}

fn usable(scores: Option<&NormalizedScores>) -> Option<&NormalizedScores> {
    scores.filter(|s| s.has_usable())
}

fn points(scores: &NormalizedScores, models: &[ModelId], sentiment: Sentiment, metadata: &ModelMetadata) -> Vec<SeriesPoint> {
    models
        .iter()
        .map(|model| SeriesPoint {
            model: *model,
            name: metadata.display_name(*model),
            color: metadata.color(*model),
            value: scores.score_or_zero(*model, sentiment),
        })
        .collect()
}

/// Composition of the first lexicon model in the metadata table.
pub fn composition(scores: Option<&NormalizedScores>, metadata: &ModelMetadata) -> Vec<CompositionRow> {
    let Some(scores) = usable(scores) else {
        return Vec::new();
    };
    // Without a lexicon model there is no series to name
    let Some(model) = metadata.models_of_kind(ModelKind::Lexicon).first().copied() else {
        return Vec::new();
    };
    let series = metadata.display_name(model);

    Sentiment::ALL
        .iter()
        .map(|sentiment| CompositionRow {
            sentiment: *sentiment,
            label: sentiment.title().to_string(),
            model,
            series: series.clone(),
            value: scores.score_or_zero(model, *sentiment),
        })
        .collect()
}

pub fn probability_comparison(scores: Option<&NormalizedScores>, metadata: &ModelMetadata) -> Vec<ProbabilityRow> {
    let Some(scores) = usable(scores) else {
        return Vec::new();
    };
    let classifiers = metadata.models_of_kind(ModelKind::Classifier);

    Sentiment::ALL
        .iter()
        .map(|sentiment| ProbabilityRow {
            sentiment: *sentiment,
            label: sentiment.title().to_string(),
            columns: points(scores, &classifiers, *sentiment, metadata),
        })
        .collect()
}

/// Radar axes over every model, axes always positive, neutral, negative.
pub fn radar(scores: Option<&NormalizedScores>, metadata: &ModelMetadata) -> Vec<RadarAxis> {
    let Some(scores) = usable(scores) else {
        return Vec::new();
    };

    Sentiment::ALL
        .iter()
        .map(|sentiment| RadarAxis {
            sentiment: *sentiment,
            axis: sentiment.title().to_string(),
            series: points(scores, &ModelId::ALL, *sentiment, metadata),
        })
        .collect()
}

pub fn model_comparison(result: Option<&AnalysisResult>, metadata: &ModelMetadata) -> Vec<ModelComparisonRow> {
    let Some(result) = result.filter(|r| r.usable_count() > 0) else {
        return Vec::new();
    };

    ModelId::ALL
        .iter()
        .map(|model| {
            let model_result = result.usable(*model);
            let view = model_result.map(ScoreView::from_result);
            ModelComparisonRow {
                model: *model,
                name: metadata.display_name(*model),
                positive: view.map(|v| v.positive).unwrap_or(0.0),
                neutral: view.map(|v| v.neutral).unwrap_or(0.0),
                negative: view.map(|v| v.negative).unwrap_or(0.0),
                sentiment: model_result
                    .map(|r| r.sentiment.map(|s| s.as_str().to_string()).unwrap_or_else(|| r.label.clone()))
                    .unwrap_or_else(|| "error".to_string()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawAnalysis;
    use crate::scoring::normalize;
    use serde_json::json;

    fn sample(vader_failed: bool) -> AnalysisResult {
        let vader = if vader_failed {
            json!({"error": "lexicon crashed"})
        } else {
            json!({"positive": 0.5, "neutral": 0.4, "negative": 0.1, "compound": 0.6, "sentiment": "positive"})
        };
        AnalysisResult::from_raw(&RawAnalysis {
            vader: Some(vader),
            naive_bayes: Some(json!({"positive": 0.2, "neutral": 0.3, "negative": 0.5, "sentiment": "negative"})),
            roberta: Some(json!({"positive": 0.7, "neutral": 0.2, "negative": 0.1, "sentiment": "positive"})),
            conclusion: None,
        })
    }

    #[test]
    fn test_composition_uses_lexicon_model() {
        let result = sample(false);
        let scores = normalize(&result);
        let rows = composition(Some(&scores), &ModelMetadata::default());

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].label, "Positive");
        assert_eq!(rows[0].series, "VADER");
        assert_eq!(rows[0].value, 0.5);
        assert_eq!(rows[2].value, 0.1);
    }

    #[test]
    fn test_composition_zero_fills_failed_lexicon() {
        let result = sample(true);
        let scores = normalize(&result);
        let rows = composition(Some(&scores), &ModelMetadata::default());

        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|row| row.value == 0.0));
    }

    #[test]
    fn test_probability_has_one_column_per_classifier() {
        let result = sample(false);
        let scores = normalize(&result);
        let rows = probability_comparison(Some(&scores), &ModelMetadata::default());

        assert_eq!(rows.len(), 3);
        for row in &rows {
            let models: Vec<ModelId> = row.columns.iter().map(|c| c.model).collect();
            assert_eq!(models, vec![ModelId::NaiveBayes, ModelId::Roberta]);
        }
        assert_eq!(rows[2].columns[0].value, 0.5);
        assert_eq!(rows[0].columns[1].value, 0.7);
    }

    #[test]
    fn test_radar_axes_are_fixed() {
        let result = sample(true);
        let scores = normalize(&result);
        let axes = radar(Some(&scores), &ModelMetadata::default());

        let names: Vec<&str> = axes.iter().map(|a| a.axis.as_str()).collect();
        assert_eq!(names, vec!["Positive", "Neutral", "Negative"]);
        assert!(axes.iter().all(|a| a.series.len() == 3));
        // Failed VADER renders as 0 on every axis
        assert!(axes.iter().all(|a| a.series[0].value == 0.0));
    }

    #[test]
    fn test_model_comparison_marks_failed_model() {
        let result = sample(true);
        let rows = model_comparison(Some(&result), &ModelMetadata::default());

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].sentiment, "error");
        assert_eq!(rows[0].positive, 0.0);
        assert_eq!(rows[2].name, "RoBERTa");
        assert_eq!(rows[2].sentiment, "positive");
    }

    #[test]
    fn test_unknown_label_is_still_charted() {
        let result = AnalysisResult::from_raw(&RawAnalysis {
            vader: Some(json!({"error": "lexicon crashed"})),
            naive_bayes: Some(json!({"positive": 0.7, "neutral": 0.2, "negative": 0.1, "sentiment": "unknown"})),
            roberta: Some(json!({"positive": 0.1, "neutral": 0.1, "negative": 0.8, "sentiment": "negative"})),
            conclusion: None,
        });
        let scores = normalize(&result);
        let metadata = ModelMetadata::default();

        let rows = probability_comparison(Some(&scores), &metadata);
        assert_eq!(rows[0].columns[0].value, 0.7);
        let axes = radar(Some(&scores), &metadata);
        assert_eq!(axes[1].series[1].value, 0.2);

        let comparison = model_comparison(Some(&result), &metadata);
        assert_eq!(comparison[1].sentiment, "unknown");
        assert_eq!(comparison[1].positive, 0.7);
        assert_eq!(comparison[0].sentiment, "error");
    }

    #[test]
    fn test_no_result_means_no_rows() {
        let metadata = ModelMetadata::default();
        assert!(composition(None, &metadata).is_empty());
        assert!(probability_comparison(None, &metadata).is_empty());
        assert!(radar(None, &metadata).is_empty());
        assert!(model_comparison(None, &metadata).is_empty());
    }
}
