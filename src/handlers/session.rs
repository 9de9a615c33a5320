//! Request bookkeeping for the interactive surface
//!
//! Every submission gets a token stamped with a generation number. Only a
//! response carrying the current generation may update what is displayed;
//! anything older is dropped.

use crate::error::SubmitError;
use crate::models::{AnalysisResult, RawAnalysis};
use crate::pipeline::{AnalysisView, Pipeline};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestToken {
    generation: u64,
    request_id: Uuid,
    submitted_at: DateTime<Utc>,
}

impl RequestToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub result: AnalysisResult,
    pub request_id: Uuid,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DisplayState {
    #[default]
    Empty,
    Ready(Snapshot),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Stale,
}

/// What the presentation layer gets on each render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub pending: bool,
    pub error: Option<String>,
    pub analysis: AnalysisView,
}

#[derive(Debug, Default)]
pub struct Session {
    generation: u64,
    pending: Option<RequestToken>,
    state: DisplayState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request unless one is already in flight.
    pub fn begin(&mut self) -> Result<RequestToken, SubmitError> {
        if let Some(pending) = &self.pending {
            warn!("Rejecting submission, request {} still pending", pending.request_id);
            return Err(SubmitError::Busy);
        }
        Ok(self.issue())
    }

    /// Start a request even if one is in flight. The older one becomes stale.
    pub fn supersede(&mut self) -> RequestToken {
        if let Some(pending) = &self.pending {
            info!("Request {} superseded", pending.request_id);
        }
        self.issue()
    }

    fn issue(&mut self) -> RequestToken {
        self.generation += 1;
        let token = RequestToken {
            generation: self.generation,
            request_id: Uuid::new_v4(),
            submitted_at: Utc::now(),
        };
        // A new submission clears whatever was shown before
        self.state = DisplayState::Empty;
        self.pending = Some(token.clone());
        token
    }

    pub fn is_current(&self, token: &RequestToken) -> bool {
        token.generation == self.generation
    }

    /// Record the outcome of a request. Outcomes for anything but the
    /// current generation are discarded.
    pub fn complete(&mut self, token: &RequestToken, outcome: Result<RawAnalysis, String>) -> Completion {
        if !self.is_current(token) {
            debug!(
                "Discarding stale response for request {} (generation {}, current {})",
                token.request_id, token.generation, self.generation
            );
            return Completion::Stale;
        }

        self.pending = None;
        self.state = match outcome {
            Ok(raw) => DisplayState::Ready(Snapshot {
                result: AnalysisResult::from_raw(&raw),
                request_id: token.request_id,
                received_at: Utc::now(),
            }),
            Err(message) => DisplayState::Failed(message),
        };
        Completion::Applied
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn current(&self) -> Option<&AnalysisResult> {
        match &self.state {
            DisplayState::Ready(snapshot) => Some(&snapshot.result),
            _ => None,
        }
    }

    /// Recompute every dataset from the current state. A failed request
    /// shows only its error.
    pub fn render(&self, pipeline: &Pipeline) -> DashboardView {
        let error = match &self.state {
            DisplayState::Failed(message) => Some(message.clone()),
            _ => None,
        };

        DashboardView {
            pending: self.is_pending(),
            error,
            analysis: pipeline.run(self.current()),
        }
    }
}
