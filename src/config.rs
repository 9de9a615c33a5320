use crate::error::ConfigError;
use std::env;
use std::time::Duration;

const DEFAULT_ANALYZE_URL: &str = "http://127.0.0.1:3000/api/analyze";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
// The endpoint only looks at the first 2048 characters anyway
const DEFAULT_MAX_TEXT_CHARS: usize = 2048;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub analyze_url: String,
    pub request_timeout_secs: u64,
    pub max_text_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            analyze_url: DEFAULT_ANALYZE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_text_chars: DEFAULT_MAX_TEXT_CHARS,
        }
    }
}

impl Config {
    /// Read configuration from the environment. Call `dotenvy::dotenv()`
    /// first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    // Split out so tests don't have to touch the process environment
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let analyze_url = lookup("ANALYZE_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ANALYZE_URL.to_string());

        let request_timeout_secs = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let max_text_chars = parse_or(&lookup, "MAX_TEXT_CHARS", DEFAULT_MAX_TEXT_CHARS)?;

        if request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "REQUEST_TIMEOUT_SECS",
                value: "0".to_string(),
            });
        }
        if max_text_chars == 0 {
            return Err(ConfigError::Invalid {
                name: "MAX_TEXT_CHARS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            analyze_url,
            request_timeout_secs,
            max_text_chars,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
