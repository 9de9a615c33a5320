//! Aggregates three sentiment classifiers into one consensus verdict and a
//! set of chart-ready datasets.

pub mod adapters;
pub mod charts;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod render;
pub mod scoring;
pub mod validation;
pub mod voting;

pub use config::Config;
pub use error::{ConfigError, SubmitError};
pub use models::{AnalysisResult, Conclusion, ModelId, ModelMetadata, RawAnalysis, Sentiment, SentimentPalette};
pub use pipeline::{AnalysisView, Pipeline};
