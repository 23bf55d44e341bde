//! Best-effort note enrichment through a text-generation backend.
//!
//! # Responsibility
//! - Define the `Enricher` contract consumed by the note service.
//! - Turn two free-text completions into a summary and practice questions.
//!
//! # Invariants
//! - Either completion failing fails the whole enrichment; no partial result.
//! - Unparseable question output degrades to an empty list, never an error.

use crate::model::practice_question::PracticeQuestion;
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

mod backend;
mod openai;
pub mod parse;
pub mod prompt;

pub use backend::{BackendEnricher, CompletionBackend, CompletionRequest, EnrichPolicy};
pub use openai::OpenAiBackend;
pub use parse::{extract_json_array, parse_practice_questions};

/// Output of one successful enrichment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrichment {
    /// Completion text, stored verbatim.
    pub summary: String,
    /// Parsed questions; empty when the backend output was unusable.
    pub practice_questions: Vec<PracticeQuestion>,
}

/// Failure of an enrichment call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichError {
    /// Backend could not be reached or the connection broke.
    Transport(String),
    /// Credential rejected by the backend.
    Unauthorized,
    /// Backend asked us to slow down.
    RateLimited,
    /// Any other non-success response.
    Provider { status: u16, message: String },
    /// Success response with an unexpected body.
    InvalidResponse(String),
    /// Completion did not finish within the configured limit.
    Timeout(Duration),
}

impl EnrichError {
    /// Returns whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) | Self::RateLimited | Self::Timeout(_) => true,
            Self::Provider { status, .. } => *status >= 500,
            Self::Unauthorized | Self::InvalidResponse(_) => false,
        }
    }
}

impl Display for EnrichError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "completion request failed: {message}"),
            Self::Unauthorized => write!(f, "completion backend rejected the API key"),
            Self::RateLimited => write!(f, "completion backend rate limit exceeded"),
            Self::Provider { status, message } => {
                write!(f, "completion backend returned {status}: {message}")
            }
            Self::InvalidResponse(message) => {
                write!(f, "unexpected completion response: {message}")
            }
            Self::Timeout(limit) => {
                write!(f, "completion timed out after {}s", limit.as_secs_f32())
            }
        }
    }
}

impl Error for EnrichError {}

/// Generates a summary and practice questions for note content.
#[async_trait]
pub trait Enricher: Send + Sync {
    async fn enrich(&self, note_title: &str, content: &str) -> Result<Enrichment, EnrichError>;
}

#[cfg(test)]
mod tests {
    use super::EnrichError;
    use std::time::Duration;

    #[test]
    fn transient_errors_are_classified() {
        assert!(EnrichError::RateLimited.is_transient());
        assert!(EnrichError::Timeout(Duration::from_secs(1)).is_transient());
        assert!(EnrichError::Provider {
            status: 503,
            message: "busy".to_string()
        }
        .is_transient());
        assert!(!EnrichError::Provider {
            status: 400,
            message: "bad".to_string()
        }
        .is_transient());
        assert!(!EnrichError::Unauthorized.is_transient());
    }
}
