//! Analysis endpoint client

use crate::config::Config;
use crate::error::SubmitError;
use crate::models::{ModelId, RawAnalysis};
use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Anything that can turn text into a raw analysis payload.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<RawAnalysis, SubmitError>;
}

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    text: &'a str,
}

// Only the field we need from an error response
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// POSTs `{ "text": ... }` as JSON to the configured endpoint.
pub struct HttpBackend {
    client: Client,
    url: String,
    timeout_secs: u64,
}

impl HttpBackend {
    pub fn new(config: &Config) -> Result<Self, SubmitError> {
        let client = Client::builder().timeout(config.request_timeout()).build()?;

        Ok(Self {
            client,
            url: config.analyze_url.clone(),
            timeout_secs: config.request_timeout_secs,
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> SubmitError {
        if err.is_timeout() {
            SubmitError::Timeout(self.timeout_secs)
        } else {
            SubmitError::Http(err)
        }
    }
}

#[async_trait]
impl AnalysisBackend for HttpBackend {
    async fn analyze(&self, text: &str) -> Result<RawAnalysis, SubmitError> {
        debug!("POST {} ({} chars)", self.url, text.chars().count());

        let response = self
            .client
            .post(&self.url)
            .json(&AnalyzeRequest { text })
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_else(|| "Request failed".to_string());
            error!("Analysis endpoint returned {}: {}", status, message);
            return Err(SubmitError::Status {
                status: status.as_u16(),
                message,
            });
        }

        decode_payload(&body)
    }
}

/// Parse a success body. A body that is not an object, or that carries none
/// of the model entries, is rejected as a whole; individual broken entries
/// are left for validation.
pub fn decode_payload(body: &str) -> Result<RawAnalysis, SubmitError> {
    let value: Value = serde_json::from_str(body).map_err(|e| SubmitError::Decode(e.to_string()))?;

    if !value.is_object() {
        return Err(SubmitError::Decode("expected a JSON object".to_string()));
    }

    let raw: RawAnalysis = serde_json::from_value(value).map_err(|e| SubmitError::Decode(e.to_string()))?;

    if ModelId::ALL.iter().all(|model| raw.entry(*model).is_none()) {
        return Err(SubmitError::Decode("response contains no model results".to_string()));
    }

    Ok(raw)
}

/// Trim and cap the text before it goes out.
pub fn prepare_text(text: &str, max_chars: usize) -> Result<String, SubmitError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(SubmitError::EmptyText);
    }

    // Cut on a char boundary, never inside a multi-byte character
    Ok(match trimmed.char_indices().nth(max_chars) {
        Some((idx, _)) => trimmed[..idx].to_string(),
        None => trimmed.to_string(),
    })
}
