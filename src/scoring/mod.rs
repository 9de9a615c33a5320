//! Score normalization
//!
//! Turns every usable model result into the same read-only view: three
//! proportions in `[0, 1]` plus an optional compound in `[-1, 1]`. Callers
//! never need to know which models carry a compound score.

use crate::models::{AnalysisResult, ModelId, ModelResult, Sentiment};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreView {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compound: Option<f64>,
}

impl ScoreView {
    pub fn from_result(result: &ModelResult) -> Self {
        Self {
            positive: clamp_unit(result.positive),
            neutral: clamp_unit(result.neutral),
            negative: clamp_unit(result.negative),
            compound: result.compound.map(clamp_signed),
        }
    }

    pub fn score(&self, sentiment: Sentiment) -> f64 {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Neutral => self.neutral,
            Sentiment::Negative => self.negative,
        }
    }
}

/// Normalized scores for one analysis, one slot per model in canonical order.
/// Failed models hold `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedScores {
    models: Vec<(ModelId, Option<ScoreView>)>,
}

impl NormalizedScores {
    pub fn get(&self, model: ModelId) -> Option<&ScoreView> {
        self.models
            .iter()
            .find(|(id, _)| *id == model)
            .and_then(|(_, view)| view.as_ref())
    }

    /// Score for a model and category, 0 when the model has no usable result.
    pub fn score_or_zero(&self, model: ModelId, sentiment: Sentiment) -> f64 {
        self.get(model).map(|view| view.score(sentiment)).unwrap_or(0.0)
    }

    pub fn has_usable(&self) -> bool {
        self.models.iter().any(|(_, view)| view.is_some())
    }
}

pub fn normalize(result: &AnalysisResult) -> NormalizedScores {
    let models = result
        .entries()
        .iter()
        .map(|entry| (entry.model, entry.outcome.usable().map(ScoreView::from_result)))
        .collect();

    NormalizedScores { models }
}

// Non-finite input is treated like an absent value
fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() { value.clamp(0.0, 1.0) } else { 0.0 }
}

fn clamp_signed(value: f64) -> f64 {
    if value.is_finite() { value.clamp(-1.0, 1.0) } else { 0.0 }
}
