//! Provider output adapters
//!
//! Each classifier's serving API answers in its own shape. These functions
//! turn those answers into the per-model entry the analysis payload carries.
//! A provider answer that can't be understood becomes an `error` entry, never
//! an `Err`.
//!
//! Nothing in the dashboard calls these; they are for whatever serves the
//! analysis endpoint and wants to emit a payload this crate can read.

use crate::models::{ModelId, RawAnalysis, Sentiment};
use crate::validation::UNKNOWN_LABEL;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// Compound score thresholds for the lexicon model's label
const POSITIVE_THRESHOLD: f64 = 0.05;
const NEGATIVE_THRESHOLD: f64 = -0.05;

// Probability vectors are ordered negative, neutral, positive
const PROBABILITY_ORDER: [Sentiment; 3] = [Sentiment::Negative, Sentiment::Neutral, Sentiment::Positive];

lazy_static! {
    static ref INDEXED_LABEL: Regex = Regex::new(r"^LABEL_(\d+)$").unwrap();
}

/// One model entry of the analysis payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProviderOutput {
    Scores {
        negative: f64,
        neutral: f64,
        positive: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        compound: Option<f64>,
        sentiment: String,
    },
    Error {
        error: String,
    },
}

impl ProviderOutput {
    fn error(message: impl Into<String>) -> Self {
        ProviderOutput::Error { error: message.into() }
    }

    pub fn into_value(self) -> Value {
        // Serializing plain floats and strings cannot fail
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Raw lexicon scores (`neg`, `neu`, `pos`, `compound`).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PolarityScores {
    pub neg: f64,
    pub neu: f64,
    pub pos: f64,
    pub compound: f64,
}

pub fn label_for_compound(compound: f64) -> Sentiment {
    if compound >= POSITIVE_THRESHOLD {
        Sentiment::Positive
    } else if compound <= NEGATIVE_THRESHOLD {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

pub fn from_polarity_scores(scores: &PolarityScores) -> ProviderOutput {
    ProviderOutput::Scores {
        negative: scores.neg,
        neutral: scores.neu,
        positive: scores.pos,
        compound: Some(scores.compound),
        sentiment: label_for_compound(scores.compound).as_str().to_string(),
    }
}

#[derive(Debug, Deserialize)]
struct ProbabilityPrediction {
    all_probabilities: Vec<f64>,
    label: Option<String>,
}

/// Adapt a `{ "all_probabilities": [neg, neu, pos], "label": ... }` answer.
/// Some gateways wrap it in a JSON string, so that is unwrapped first.
pub fn from_probabilities(raw: &Value) -> ProviderOutput {
    let value = match raw {
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(v) => v,
            Err(_) => return ProviderOutput::error("Unexpected response format"),
        },
        other => other.clone(),
    };

    let Ok(prediction) = serde_json::from_value::<ProbabilityPrediction>(value) else {
        return ProviderOutput::error("Unexpected response format");
    };

    let mut scores = [0.0; 3];
    for (i, sentiment) in PROBABILITY_ORDER.iter().enumerate() {
        // Missing trailing slots count as 0
        let value = prediction.all_probabilities.get(i).copied().unwrap_or(0.0);
        scores[sentiment_index(*sentiment)] = value;
    }

    ProviderOutput::Scores {
        positive: scores[0],
        neutral: scores[1],
        negative: scores[2],
        compound: None,
        sentiment: prediction.label.unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
    }
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

/// Map a provider label (`LABEL_0`..`LABEL_2` or a plain category name).
pub fn map_label(label: &str) -> Option<Sentiment> {
    if let Some(caps) = INDEXED_LABEL.captures(label.trim()) {
        let index: usize = caps[1].parse().ok()?;
        return PROBABILITY_ORDER.get(index).copied();
    }
    Sentiment::parse(label)
}

/// Adapt a list of `{label, score}` pairs, optionally nested one level deep
/// as text-classification endpoints return it. The label with the highest
/// score becomes the sentiment.
pub fn from_label_scores(raw: &Value) -> ProviderOutput {
    let list = match raw {
        Value::Array(items) if items.first().map(Value::is_array).unwrap_or(false) => &items[0],
        Value::Array(_) => raw,
        _ => return ProviderOutput::error("Unexpected response format"),
    };

    let Ok(pairs) = serde_json::from_value::<Vec<LabelScore>>(list.clone()) else {
        return ProviderOutput::error("Unexpected response format");
    };
    if pairs.is_empty() {
        return ProviderOutput::error("Unexpected response format");
    }

    let mut scores = [0.0; 3];
    let mut best: Option<(String, f64)> = None;

    for pair in &pairs {
        let mapped = map_label(&pair.label);
        if let Some(sentiment) = mapped {
            scores[sentiment_index(sentiment)] = pair.score;
        }
        if best.as_ref().map(|(_, score)| pair.score > *score).unwrap_or(pair.score > 0.0) {
            let name = mapped
                .map(|s| s.as_str().to_string())
                .unwrap_or_else(|| pair.label.clone());
            best = Some((name, pair.score));
        }
    }

    ProviderOutput::Scores {
        positive: scores[0],
        neutral: scores[1],
        negative: scores[2],
        compound: None,
        sentiment: best.map(|(name, _)| name).unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
    }
}

/// Build a payload from one output per model.
pub fn assemble(outputs: Vec<(ModelId, ProviderOutput)>) -> RawAnalysis {
    let mut raw = RawAnalysis::default();
    for (model, output) in outputs {
        raw.set_entry(model, output.into_value());
    }
    raw
}

// Position in Sentiment::ALL
fn sentiment_index(sentiment: Sentiment) -> usize {
    match sentiment {
        Sentiment::Positive => 0,
        Sentiment::Neutral => 1,
        Sentiment::Negative => 2,
    }
}
