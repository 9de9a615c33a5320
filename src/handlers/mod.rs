pub mod backend;
pub mod session;

use crate::config::Config;
use crate::error::SubmitError;
use crate::pipeline::Pipeline;
use backend::{AnalysisBackend, prepare_text};
use log::{error, info, warn};
use session::{Completion, DashboardView, RequestToken, Session};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

pub use backend::HttpBackend;

const INTERRUPTED_ERROR: &str = "Request was interrupted";

/// Ties the endpoint client to the session and the aggregation pipeline.
pub struct Dashboard<B> {
    backend: B,
    // Never held across an await
    session: Mutex<Session>,
    pipeline: Pipeline,
    max_text_chars: usize,
    request_timeout: Duration,
}

/// A request that holds the session's pending slot but has not been sent.
#[derive(Debug)]
pub struct Submission {
    token: RequestToken,
    text: String,
}

impl Submission {
    pub fn token(&self) -> &RequestToken {
        &self.token
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

// Fails the request if dispatch never gets to record an outcome
struct PendingGuard<'a> {
    session: &'a Mutex<Session>,
    token: Option<RequestToken>,
}

impl<'a> PendingGuard<'a> {
    fn new(session: &'a Mutex<Session>, token: RequestToken) -> Self {
        Self {
            session,
            token: Some(token),
        }
    }

    fn disarm(mut self) -> Option<RequestToken> {
        self.token.take()
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        let Some(token) = self.token.take() else {
            return;
        };
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        if session.complete(&token, Err(INTERRUPTED_ERROR.to_string())) == Completion::Applied {
            warn!("Request {} was dropped before it completed", token.request_id());
        }
    }
}

impl<B: AnalysisBackend> Dashboard<B> {
    pub fn new(backend: B, pipeline: Pipeline, config: &Config) -> Self {
        Self {
            backend,
            session: Mutex::new(Session::new()),
            pipeline,
            max_text_chars: config.max_text_chars,
            request_timeout: config.request_timeout(),
        }
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claim the pending slot for `text`. Rejected with [`SubmitError::Busy`]
    /// while another request is pending, so callers learn about it before
    /// doing any work.
    pub fn begin(&self, text: &str) -> Result<Submission, SubmitError> {
        let text = prepare_text(text, self.max_text_chars)?;
        let token = self.session().begin()?;
        Ok(Submission { token, text })
    }

    /// Submit text for analysis. Rejected with [`SubmitError::Busy`] while
    /// another request is pending.
    pub async fn submit(&self, text: &str) -> Result<Completion, SubmitError> {
        let submission = self.begin(text)?;
        self.dispatch(submission).await
    }

    /// Submit text, abandoning any request still in flight. Whichever
    /// response belongs to the latest submission wins.
    pub async fn submit_latest(&self, text: &str) -> Result<Completion, SubmitError> {
        let text = prepare_text(text, self.max_text_chars)?;
        let token = self.session().supersede();
        self.dispatch(Submission { token, text }).await
    }

    /// Send a claimed submission to the backend and record the outcome.
    pub async fn dispatch(&self, submission: Submission) -> Result<Completion, SubmitError> {
        let Submission { token, text } = submission;
        info!("Submitting request {} (generation {})", token.request_id(), token.generation());

        let guard = PendingGuard::new(&self.session, token);
        let outcome = match tokio::time::timeout(self.request_timeout, self.backend.analyze(&text)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(SubmitError::Timeout(self.request_timeout.as_secs())),
        };
        let Some(token) = guard.disarm() else {
            return Ok(Completion::Stale);
        };

        let mut session = self.session();
        match outcome {
            Ok(raw) => Ok(session.complete(&token, Ok(raw))),
            Err(e) => match session.complete(&token, Err(e.to_string())) {
                Completion::Stale => Ok(Completion::Stale),
                Completion::Applied => {
                    error!("Request {} failed: {}", token.request_id(), e);
                    Err(e)
                }
            },
        }
    }

    pub fn render(&self) -> DashboardView {
        self.session().render(&self.pipeline)
    }

    pub fn is_pending(&self) -> bool {
        self.session().is_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RawAnalysis, Sentiment};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;

    // Answers by text: "slow" waits before answering, "fail" errors out, "crash" panics
    struct StubBackend;

    #[async_trait]
    impl AnalysisBackend for StubBackend {
        async fn analyze(&self, text: &str) -> Result<RawAnalysis, SubmitError> {
            let label = match text {
                "slow" => {
                    tokio::time::sleep(Duration::from_millis(200)).await;
                    "negative"
                }
                "hang" => {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "neutral"
                }
                "crash" => panic!("model server crashed"),
                "fail" => {
                    return Err(SubmitError::Status {
                        status: 500,
                        message: "model server down".to_string(),
                    });
                }
                _ => "positive",
            };
            let entry = json!({"positive": 0.4, "neutral": 0.3, "negative": 0.3, "sentiment": label});
            Ok(RawAnalysis {
                vader: Some(entry.clone()),
                naive_bayes: Some(entry.clone()),
                roberta: Some(entry),
                conclusion: None,
            })
        }
    }

    fn dashboard() -> Arc<Dashboard<StubBackend>> {
        Arc::new(Dashboard::new(StubBackend, Pipeline::default(), &Config::default()))
    }

    fn final_sentiment(view: &DashboardView) -> Option<Sentiment> {
        view.analysis.conclusion.as_ref().and_then(|c| c.final_sentiment)
    }

    #[tokio::test]
    async fn test_submit_renders_result() {
        let dashboard = dashboard();
        assert_eq!(dashboard.submit("what a lovely day").await.unwrap(), Completion::Applied);

        let view = dashboard.render();
        assert_eq!(final_sentiment(&view), Some(Sentiment::Positive));
        assert_eq!(view.analysis.datasets.radar.len(), 3);
        assert!(view.error.is_none());
    }

    #[tokio::test]
    async fn test_blank_text_never_reaches_backend() {
        let dashboard = dashboard();
        assert!(matches!(dashboard.submit("   ").await, Err(SubmitError::EmptyText)));
        assert!(!dashboard.is_pending());
    }

    #[tokio::test]
    async fn test_busy_while_pending() {
        let dashboard = dashboard();
        let second = Arc::clone(&dashboard);

        let (first, second) = tokio::join!(dashboard.submit("slow"), async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            second.submit("fast").await
        });

        assert_eq!(first.unwrap(), Completion::Applied);
        assert!(matches!(second, Err(SubmitError::Busy)));
        assert_eq!(final_sentiment(&dashboard.render()), Some(Sentiment::Negative));
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let dashboard = dashboard();
        let second = Arc::clone(&dashboard);

        let (slow, fast) = tokio::join!(dashboard.submit_latest("slow"), async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            second.submit_latest("fast").await
        });

        assert_eq!(fast.unwrap(), Completion::Applied);
        assert_eq!(slow.unwrap(), Completion::Stale);
        // The slow negative answer arrived last but must not replace it
        assert_eq!(final_sentiment(&dashboard.render()), Some(Sentiment::Positive));
    }

    #[tokio::test]
    async fn test_backend_failure_is_top_level_error() {
        let dashboard = dashboard();
        let err = dashboard.submit("fail").await.unwrap_err();
        assert_eq!(err.to_string(), "model server down");

        let view = dashboard.render();
        assert_eq!(view.error.as_deref(), Some("model server down"));
        assert!(view.analysis.is_empty());
    }

    #[tokio::test]
    async fn test_timeout_clears_pending() {
        let config = Config {
            request_timeout_secs: 1,
            ..Config::default()
        };
        let dashboard = Dashboard::new(StubBackend, Pipeline::default(), &config);

        assert!(matches!(dashboard.submit("hang").await, Err(SubmitError::Timeout(1))));
        assert!(!dashboard.is_pending());
    }

    #[tokio::test]
    async fn test_back_to_back_submission_is_rejected_up_front() {
        let dashboard = dashboard();

        let first = dashboard.begin("slow").unwrap();
        assert!(dashboard.is_pending());
        // The second line arrives before the first is even sent
        assert!(matches!(dashboard.begin("fast"), Err(SubmitError::Busy)));

        assert_eq!(dashboard.dispatch(first).await.unwrap(), Completion::Applied);
        assert_eq!(final_sentiment(&dashboard.render()), Some(Sentiment::Negative));
        assert!(dashboard.begin("fast").is_ok());
    }

    #[tokio::test]
    async fn test_dropped_request_clears_pending() {
        let dashboard = dashboard();

        let abandoned = tokio::time::timeout(Duration::from_millis(50), dashboard.submit("hang")).await;
        assert!(abandoned.is_err());

        assert!(!dashboard.is_pending());
        assert_eq!(dashboard.render().error.as_deref(), Some(INTERRUPTED_ERROR));
        assert_eq!(dashboard.submit("again").await.unwrap(), Completion::Applied);
    }

    #[tokio::test]
    async fn test_panicking_backend_clears_pending() {
        let dashboard = dashboard();
        let worker = Arc::clone(&dashboard);

        let joined = tokio::spawn(async move { worker.submit("crash").await }).await;
        assert!(joined.is_err());

        assert!(!dashboard.is_pending());
        assert_eq!(dashboard.submit("again").await.unwrap(), Completion::Applied);
    }
}
