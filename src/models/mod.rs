pub mod metadata;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub use metadata::{ModelInfo, ModelKind, ModelMetadata, SentimentPalette};

// Sentiment categories, declared in tie-break precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// Every category, in axis order. This is also the precedence used to
    /// break ties when counting votes.
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }

    // Capitalised label used on chart axes and legends
    pub fn title(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
        }
    }

    /// Parse a label as the endpoint sends it. Case and surrounding
    /// whitespace are ignored; anything else (e.g. "unknown") is rejected.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "positive" => Some(Sentiment::Positive),
            "neutral" => Some(Sentiment::Neutral),
            "negative" => Some(Sentiment::Negative),
            _ => None,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// The three classifiers the endpoint always reports on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelId {
    Vader,
    NaiveBayes,
    Roberta,
}

impl ModelId {
    /// Canonical model order. Vote buckets and per-model views follow it.
    pub const ALL: [ModelId; 3] = [ModelId::Vader, ModelId::NaiveBayes, ModelId::Roberta];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelId::Vader => "vader",
            ModelId::NaiveBayes => "naive_bayes",
            ModelId::Roberta => "roberta",
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload exactly as the analysis endpoint returns it.
///
/// Entries are kept as untyped JSON so a malformed model entry can be
/// reported per model instead of failing the whole response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vader: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub naive_bayes: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roberta: Option<Value>,
    // Conclusion computed by the endpoint; only used for cross-checking
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<Value>,
}

impl RawAnalysis {
    pub fn entry(&self, model: ModelId) -> Option<&Value> {
        match model {
            ModelId::Vader => self.vader.as_ref(),
            ModelId::NaiveBayes => self.naive_bayes.as_ref(),
            ModelId::Roberta => self.roberta.as_ref(),
        }
    }

    pub fn set_entry(&mut self, model: ModelId, value: Value) {
        match model {
            ModelId::Vader => self.vader = Some(value),
            ModelId::NaiveBayes => self.naive_bayes = Some(value),
            ModelId::Roberta => self.roberta = Some(value),
        }
    }

    // final_sentiment as reported by the endpoint, if it sent one
    pub fn reported_final_sentiment(&self) -> Option<&str> {
        self.conclusion
            .as_ref()
            .and_then(|c| c.get("final_sentiment"))
            .and_then(Value::as_str)
    }
}

/// A usable classifier output. Scores are stored as received; use
/// [`crate::scoring::ScoreView`] for the clamped values.
///
/// Usable only means the scores can be charted. A model votes only when
/// its label is one of the three categories, so `sentiment` is `None` for
/// a label like "unknown" while `label` keeps the text as sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResult {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
    pub sentiment: Option<Sentiment>,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compound: Option<f64>,
}

/// A classifier output that cannot take part in aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedModel {
    pub error: String,
    // Entry as received, kept for display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelOutcome {
    Usable(ModelResult),
    Failed(FailedModel),
}

impl ModelOutcome {
    pub fn usable(&self) -> Option<&ModelResult> {
        match self {
            ModelOutcome::Usable(result) => Some(result),
            ModelOutcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ModelOutcome::Usable(_) => None,
            ModelOutcome::Failed(failed) => Some(failed.error.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEntry {
    pub model: ModelId,
    pub outcome: ModelOutcome,
}

/// Validated result for one submitted text: one entry per model, in
/// canonical order. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    entries: Vec<ModelEntry>,
}

impl AnalysisResult {
    /// Validate a raw payload. Never fails; broken entries become
    /// [`ModelOutcome::Failed`].
    pub fn from_raw(raw: &RawAnalysis) -> Self {
        Self {
            entries: crate::validation::validate(raw),
        }
    }

    pub(crate) fn from_entries(entries: Vec<ModelEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ModelEntry] {
        &self.entries
    }

    pub fn outcome(&self, model: ModelId) -> Option<&ModelOutcome> {
        self.entries
            .iter()
            .find(|entry| entry.model == model)
            .map(|entry| &entry.outcome)
    }

    pub fn usable(&self, model: ModelId) -> Option<&ModelResult> {
        self.outcome(model).and_then(ModelOutcome::usable)
    }

    pub fn usable_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.outcome.usable().is_some())
            .count()
    }
}

/// Which models voted for which category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conclusion {
    pub positive: Vec<ModelId>,
    pub neutral: Vec<ModelId>,
    pub negative: Vec<ModelId>,
    // Models left out of the vote: failed, or no recognised label
    pub excluded: Vec<ModelId>,
    // None when no model produced a usable label
    pub final_sentiment: Option<Sentiment>,
}

impl Conclusion {
    pub fn bucket(&self, sentiment: Sentiment) -> &[ModelId] {
        match sentiment {
            Sentiment::Positive => &self.positive,
            Sentiment::Neutral => &self.neutral,
            Sentiment::Negative => &self.negative,
        }
    }

    pub(crate) fn bucket_mut(&mut self, sentiment: Sentiment) -> &mut Vec<ModelId> {
        match sentiment {
            Sentiment::Positive => &mut self.positive,
            Sentiment::Neutral => &mut self.neutral,
            Sentiment::Negative => &mut self.negative,
        }
    }

    pub fn votes(&self, sentiment: Sentiment) -> usize {
        self.bucket(sentiment).len()
    }

    pub fn total_votes(&self) -> usize {
        Sentiment::ALL.iter().map(|s| self.votes(*s)).sum()
    }
}
