//! Shape checks for per-model results
//!
//! Each model entry is judged on its own, so one broken classifier never
//! takes the other two down with it.

use crate::models::{FailedModel, ModelEntry, ModelId, ModelOutcome, ModelResult, RawAnalysis, Sentiment};
use log::{debug, warn};
use serde_json::Value;

pub const NO_DATA_ERROR: &str = "no data";
// Stands in for a label the entry did not carry at all
pub const UNKNOWN_LABEL: &str = "unknown";

// How far the three proportions may drift from 1.0 before we log it
const SUM_TOLERANCE: f64 = 0.05;

/// Validate every model entry of a raw payload, in canonical model order.
pub fn validate(raw: &RawAnalysis) -> Vec<ModelEntry> {
    ModelId::ALL
        .iter()
        .map(|model| ModelEntry {
            model: *model,
            outcome: check_entry(*model, raw.entry(*model)),
        })
        .collect()
}

/// Decide whether one entry is usable.
///
/// Usable means: no `error` field and all three proportions present and
/// numeric. Anything else is carried through as a failure holding the entry
/// as received. The label does not decide usability; an unrecognised or
/// missing label leaves `sentiment` empty so the model sits out the vote.
pub fn check_entry(model: ModelId, entry: Option<&Value>) -> ModelOutcome {
    let Some(value) = entry else {
        warn!("No result for model {}", model);
        return failed(NO_DATA_ERROR.to_string(), None);
    };

    let Some(fields) = value.as_object() else {
        warn!("Result for model {} is not an object: {}", model, value);
        return failed("Unexpected result format".to_string(), Some(value));
    };

    if let Some(error) = fields.get("error").filter(|e| !e.is_null()) {
        let message = match error {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        warn!("Model {} reported an error: {}", model, message);
        return failed(message, Some(value));
    }

    let mut scores = [0.0; 3];
    for (slot, sentiment) in scores.iter_mut().zip(Sentiment::ALL) {
        match fields.get(sentiment.as_str()).and_then(Value::as_f64) {
            Some(score) => *slot = score,
            None => {
                warn!("Model {} has a missing or non-numeric '{}' score", model, sentiment);
                return failed(
                    format!("Missing or non-numeric '{}' score", sentiment),
                    Some(value),
                );
            }
        }
    }
    let [positive, neutral, negative] = scores;

    // A bad label costs the model its vote, not its scores
    let (sentiment, label) = match fields.get("sentiment") {
        Some(Value::String(label)) => {
            let sentiment = Sentiment::parse(label);
            if sentiment.is_none() {
                warn!("Model {} returned unrecognised label '{}', excluding it from the vote", model, label);
            }
            (sentiment, label.trim().to_string())
        }
        _ => {
            warn!("Model {} returned no sentiment label, excluding it from the vote", model);
            (None, UNKNOWN_LABEL.to_string())
        }
    };

    let compound = match fields.get("compound") {
        None | Some(Value::Null) => None,
        Some(c) => match c.as_f64() {
            Some(compound) => Some(compound),
            None => {
                // Optional field, so a bad value only drops the compound
                warn!("Ignoring non-numeric compound for model {}: {}", model, c);
                None
            }
        },
    };

    let sum = positive + neutral + negative;
    if (sum - 1.0).abs() > SUM_TOLERANCE {
        debug!("Scores for model {} sum to {:.3}", model, sum);
    }

    ModelOutcome::Usable(ModelResult {
        positive,
        neutral,
        negative,
        sentiment,
        label,
        compound,
    })
}

fn failed(error: String, raw: Option<&Value>) -> ModelOutcome {
    ModelOutcome::Failed(FailedModel {
        error,
        raw: raw.cloned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_complete_entry_is_usable() {
        let entry = json!({
            "positive": 0.6, "neutral": 0.3, "negative": 0.1,
            "compound": 0.72, "sentiment": "positive"
        });

        let outcome = check_entry(ModelId::Vader, Some(&entry));
        let result = outcome.usable().expect("entry should be usable");
        assert_eq!(result.sentiment, Some(Sentiment::Positive));
        assert_eq!(result.compound, Some(0.72));
        assert_eq!(result.positive, 0.6);
    }

    #[test]
    fn test_label_is_kept_even_when_not_argmax() {
        let entry = json!({
            "positive": 0.1, "neutral": 0.1, "negative": 0.8,
            "sentiment": "positive"
        });

        let outcome = check_entry(ModelId::NaiveBayes, Some(&entry));
        assert_eq!(outcome.usable().and_then(|r| r.sentiment), Some(Sentiment::Positive));
    }

    #[test]
    fn test_missing_entry_gets_no_data_error() {
        let outcome = check_entry(ModelId::Roberta, None);
        assert_eq!(outcome.error(), Some(NO_DATA_ERROR));
    }

    #[test]
    fn test_error_entry_is_carried_through() {
        let entry = json!({"error": "HuggingFace API timeout"});
        let outcome = check_entry(ModelId::Roberta, Some(&entry));

        match outcome {
            ModelOutcome::Failed(failed) => {
                assert_eq!(failed.error, "HuggingFace API timeout");
                assert_eq!(failed.raw, Some(entry));
            }
            ModelOutcome::Usable(_) => panic!("error entry must not be usable"),
        }
    }

    #[test]
    fn test_non_numeric_score_fails_entry() {
        let entry = json!({
            "positive": "high", "neutral": 0.3, "negative": 0.1,
            "sentiment": "positive"
        });
        let outcome = check_entry(ModelId::Vader, Some(&entry));
        assert_eq!(outcome.error(), Some("Missing or non-numeric 'positive' score"));
    }

    #[test]
    fn test_missing_score_fails_entry() {
        let entry = json!({"positive": 0.3, "neutral": 0.7, "sentiment": "neutral"});
        let outcome = check_entry(ModelId::Vader, Some(&entry));
        assert_eq!(outcome.error(), Some("Missing or non-numeric 'negative' score"));
    }

    #[test]
    fn test_unknown_label_keeps_scores() {
        let entry = json!({
            "positive": 0.7, "neutral": 0.2, "negative": 0.1,
            "sentiment": "unknown"
        });
        let outcome = check_entry(ModelId::NaiveBayes, Some(&entry));
        let result = outcome.usable().expect("scores are still usable");
        assert_eq!(result.positive, 0.7);
        assert_eq!(result.sentiment, None);
        assert_eq!(result.label, "unknown");
    }

    #[test]
    fn test_missing_label_keeps_scores() {
        let entry = json!({"positive": 0.2, "neutral": 0.5, "negative": 0.3});
        let outcome = check_entry(ModelId::Roberta, Some(&entry));
        let result = outcome.usable().expect("scores are still usable");
        assert_eq!(result.sentiment, None);
        assert_eq!(result.label, UNKNOWN_LABEL);
    }

    #[test]
    fn test_bad_compound_is_dropped_not_fatal() {
        let entry = json!({
            "positive": 0.5, "neutral": 0.5, "negative": 0.0,
            "compound": "n/a", "sentiment": "Positive"
        });
        let outcome = check_entry(ModelId::Vader, Some(&entry));
        let result = outcome.usable().expect("entry should be usable");
        assert_eq!(result.compound, None);
        assert_eq!(result.sentiment, Some(Sentiment::Positive));
        assert_eq!(result.label, "Positive");
    }

    #[test]
    fn test_validate_keeps_canonical_order() {
        let raw = RawAnalysis {
            roberta: Some(json!({"error": "down"})),
            ..Default::default()
        };

        let entries = validate(&raw);
        let models: Vec<ModelId> = entries.iter().map(|e| e.model).collect();
        assert_eq!(models, ModelId::ALL.to_vec());
        assert!(entries.iter().all(|e| e.outcome.usable().is_none()));
    }
}
