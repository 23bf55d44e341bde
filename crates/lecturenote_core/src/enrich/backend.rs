//! Completion backend seam and the enricher built on top of it.
//!
//! # Responsibility
//! - Define one chat-completion call as an async trait.
//! - Run the summary and question completions concurrently under a timeout
//!   and a bounded retry budget.
//!
//! # Invariants
//! - If either completion fails after retries, `enrich` fails and the other
//!   completion is dropped (cancelled).
//! - Only transient errors are retried.

use super::parse::parse_practice_questions;
use super::prompt::{questions_request, summary_request};
use super::{EnrichError, Enricher, Enrichment};
use async_trait::async_trait;
use log::{info, warn};
use std::time::{Duration, Instant};

/// One system + user prompt pair sent to the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Text-generation backend performing a single completion.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Returns the completion text (empty when the backend returned none).
    async fn complete(&self, request: &CompletionRequest) -> Result<String, EnrichError>;
}

/// Timeout and retry settings applied to each completion call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrichPolicy {
    /// Upper bound for a single completion attempt.
    pub timeout: Duration,
    /// Extra attempts after a transient failure.
    pub max_retries: u32,
    /// Delay before retry `n` is `retry_backoff * n`.
    pub retry_backoff: Duration,
}

impl Default for EnrichPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            max_retries: 1,
            retry_backoff: Duration::from_millis(500),
        }
    }
}

/// `Enricher` implementation over any `CompletionBackend`.
#[derive(Debug)]
pub struct BackendEnricher<B> {
    backend: B,
    policy: EnrichPolicy,
}

impl<B: CompletionBackend> BackendEnricher<B> {
    pub fn new(backend: B, policy: EnrichPolicy) -> Self {
        Self { backend, policy }
    }

    pub fn policy(&self) -> EnrichPolicy {
        self.policy
    }

    async fn complete_with_policy(
        &self,
        purpose: &'static str,
        request: &CompletionRequest,
    ) -> Result<String, EnrichError> {
        let mut attempt: u32 = 0;
        loop {
            let outcome =
                match tokio::time::timeout(self.policy.timeout, self.backend.complete(request))
                    .await
                {
                    Ok(result) => result,
                    Err(_) => Err(EnrichError::Timeout(self.policy.timeout)),
                };

            match outcome {
                Ok(text) => return Ok(text),
                Err(err) if err.is_transient() && attempt < self.policy.max_retries => {
                    attempt += 1;
                    warn!(
                        "event=completion module=enrich status=retry purpose={} attempt={} error={}",
                        purpose, attempt, err
                    );
                    tokio::time::sleep(self.policy.retry_backoff * attempt).await;
                }
                Err(err) => {
                    warn!(
                        "event=completion module=enrich status=error purpose={} attempts={} error={}",
                        purpose,
                        attempt + 1,
                        err
                    );
                    return Err(err);
                }
            }
        }
    }
}

#[async_trait]
impl<B: CompletionBackend> Enricher for BackendEnricher<B> {
    async fn enrich(&self, note_title: &str, content: &str) -> Result<Enrichment, EnrichError> {
        let started_at = Instant::now();
        info!(
            "event=enrich module=enrich status=start content_chars={}",
            content.chars().count()
        );

        let summary_req = summary_request(note_title, content);
        let questions_req = questions_request(note_title, content);
        let (summary, questions_text) = tokio::try_join!(
            self.complete_with_policy("summary", &summary_req),
            self.complete_with_policy("questions", &questions_req),
        )?;

        let practice_questions = parse_practice_questions(&questions_text);
        info!(
            "event=enrich module=enrich status=ok duration_ms={} questions={}",
            started_at.elapsed().as_millis(),
            practice_questions.len()
        );

        Ok(Enrichment {
            summary,
            practice_questions,
        })
    }
}
