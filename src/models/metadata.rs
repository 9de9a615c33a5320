//! Labelling and colour tables handed to the dataset builders.

use super::{ModelId, Sentiment};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    // Word-weight model reporting a composition and a compound score
    Lexicon,
    // Model reporting a probability per category
    Classifier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: ModelId,
    pub display_name: String,
    pub description: String,
    pub kind: ModelKind,
    pub color: String,
}

impl ModelInfo {
    pub fn new(id: ModelId, display_name: &str, description: &str, kind: ModelKind, color: &str) -> Self {
        Self {
            id,
            display_name: display_name.to_string(),
            description: description.to_string(),
            kind,
            color: color.to_string(),
        }
    }
}

/// Display metadata for every model the dashboard knows about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    models: Vec<ModelInfo>,
}

impl ModelMetadata {
    pub fn new(models: Vec<ModelInfo>) -> Self {
        Self { models }
    }

    pub fn info(&self, model: ModelId) -> Option<&ModelInfo> {
        self.models.iter().find(|info| info.id == model)
    }

    // Falls back to the wire identifier for models missing from the table
    pub fn display_name(&self, model: ModelId) -> String {
        self.info(model)
            .map(|info| info.display_name.clone())
            .unwrap_or_else(|| model.as_str().to_string())
    }

    pub fn description(&self, model: ModelId) -> String {
        self.info(model)
            .map(|info| info.description.clone())
            .unwrap_or_default()
    }

    pub fn color(&self, model: ModelId) -> String {
        self.info(model)
            .map(|info| info.color.clone())
            .unwrap_or_else(|| DEFAULT_MODEL_COLOR.to_string())
    }

    /// Models of the given kind, in canonical model order regardless of the
    /// order the table was declared in.
    pub fn models_of_kind(&self, kind: ModelKind) -> Vec<ModelId> {
        ModelId::ALL
            .iter()
            .copied()
            .filter(|model| self.info(*model).map(|info| info.kind) == Some(kind))
            .collect()
    }
}

const DEFAULT_MODEL_COLOR: &str = "#6b7280";

impl Default for ModelMetadata {
    fn default() -> Self {
        Self::new(vec![
            ModelInfo::new(ModelId::Vader, "VADER", "Lexicon-based approach", ModelKind::Lexicon, "#f97316"),
            ModelInfo::new(
                ModelId::NaiveBayes,
                "Naive Bayes",
                "Machine learning algorithm",
                ModelKind::Classifier,
                "#3b82f6",
            ),
            ModelInfo::new(ModelId::Roberta, "RoBERTa", "Deep learning model", ModelKind::Classifier, "#8b5cf6"),
        ])
    }
}

/// Colour per sentiment category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentPalette {
    pub positive: String,
    pub neutral: String,
    pub negative: String,
}

impl SentimentPalette {
    pub fn color(&self, sentiment: Sentiment) -> &str {
        match sentiment {
            Sentiment::Positive => &self.positive,
            Sentiment::Neutral => &self.neutral,
            Sentiment::Negative => &self.negative,
        }
    }
}

impl Default for SentimentPalette {
    fn default() -> Self {
        Self {
            positive: "#10b981".to_string(),
            neutral: "#6b7280".to_string(),
            negative: "#ef4444".to_string(),
        }
    }
}
