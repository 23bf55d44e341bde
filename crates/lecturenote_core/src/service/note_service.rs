//! Note use-case service.
//!
//! # Responsibility
//! - Provide list/get/create/update/delete APIs over the note store.
//! - Normalize caller input (trimmed titles, id parsing).
//! - Run enrichment and persist its output as one all-or-nothing step.
//!
//! # Invariants
//! - `get_by_id` reports a missing or malformed id as `None`; `update` and
//!   `enrich_and_save` report it as `NoteNotFound`.
//! - A failed enrichment performs no write.
//! - Enrichment writes only `summary` and `practice_questions`, so a
//!   concurrent content edit survives; a concurrent summary edit is
//!   overwritten (last writer wins).
//!
//! Store calls are synchronous SQLite round-trips and run on the blocking
//! thread pool, never on an async worker.

use crate::enrich::{EnrichError, Enricher};
use crate::model::note::{parse_note_id, NewNote, Note, NotePatch, NoteValidationError};
use crate::repo::note_repo::{NoteRepository, RepoError, RepoResult};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Instant;

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Required field missing/blank, sequence < 1 or malformed question.
    Validation(NoteValidationError),
    /// Target note does not exist (or the id is malformed).
    NoteNotFound(String),
    /// Enrichment backend failed; nothing was written.
    Enrichment(EnrichError),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// A store task was cancelled before it produced a result.
    Internal(String),
}

impl NoteServiceError {
    /// Stable machine-readable error category.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NoteNotFound(_) => "NOT_FOUND",
            Self::Enrichment(_) => "ENRICHMENT_FAILED",
            Self::Repo(RepoError::InvalidData(_)) => "INTERNAL",
            Self::Repo(_) => "STORE_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NoteNotFound(_) => write!(f, "Note not found"),
            Self::Enrichment(err) => write!(f, "Failed to generate AI content: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Internal(message) => write!(f, "internal error: {message}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Enrichment(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::NoteNotFound(_) | Self::Internal(_) => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NoteNotFound(id.to_string()),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<NoteValidationError> for NoteServiceError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

pub type ServiceResult<T> = Result<T, NoteServiceError>;

/// Note service facade over a store and an enricher.
#[derive(Clone)]
pub struct NoteService {
    repo: Arc<dyn NoteRepository>,
    enricher: Arc<dyn Enricher>,
}

impl NoteService {
    /// Creates a service from explicitly constructed collaborators.
    pub fn new(repo: Arc<dyn NoteRepository>, enricher: Arc<dyn Enricher>) -> Self {
        Self { repo, enricher }
    }

    /// Lists every note ordered by lecture title, then sequence.
    pub async fn list_all(&self) -> ServiceResult<Vec<Note>> {
        self.with_store(|repo| repo.find_all()).await
    }

    /// Lists notes of one lecture ordered by sequence.
    pub async fn list_by_lecture(&self, lecture_title: &str) -> ServiceResult<Vec<Note>> {
        let lecture_title = lecture_title.to_string();
        self.with_store(move |repo| repo.find_by_lecture(&lecture_title))
            .await
    }

    /// Lists notes that already carry a summary.
    pub async fn list_enriched(&self) -> ServiceResult<Vec<Note>> {
        self.with_store(|repo| repo.find_enriched()).await
    }

    /// Gets one note; `None` for unknown or malformed ids.
    pub async fn get_by_id(&self, id: &str) -> ServiceResult<Option<Note>> {
        match parse_note_id(id) {
            Some(note_id) => self.with_store(move |repo| repo.find_by_id(note_id)).await,
            None => Ok(None),
        }
    }

    /// Returns unique lecture titles in lexicographic order.
    pub async fn list_lecture_titles(&self) -> ServiceResult<Vec<String>> {
        self.with_store(|repo| repo.distinct_lecture_titles())
            .await
    }

    /// Creates a note from caller input.
    ///
    /// Titles are trimmed; `summary`/`practice_questions` are stored as given.
    pub async fn create(&self, input: NewNote) -> ServiceResult<Note> {
        let input = NewNote {
            lecture_title: input.lecture_title.trim().to_string(),
            note_title: input.note_title.trim().to_string(),
            ..input
        };
        let note = self.with_store(move |repo| repo.insert(&input)).await?;
        info!(
            "event=note_create module=service status=ok note_id={} sequence={}",
            note.id, note.sequence
        );
        Ok(note)
    }

    /// Applies a partial update; fields absent from `patch` stay untouched.
    pub async fn update(&self, id: &str, patch: NotePatch) -> ServiceResult<Note> {
        let note_id =
            parse_note_id(id).ok_or_else(|| NoteServiceError::NoteNotFound(id.to_string()))?;
        let patch = NotePatch {
            note_title: patch.note_title.map(|title| title.trim().to_string()),
            ..patch
        };
        patch.validate()?;
        let note = self
            .with_store(move |repo| repo.update(note_id, &patch))
            .await?;
        info!(
            "event=note_update module=service status=ok note_id={}",
            note.id
        );
        Ok(note)
    }

    /// Deletes a note; `false` when nothing matched.
    pub async fn delete(&self, id: &str) -> ServiceResult<bool> {
        let Some(note_id) = parse_note_id(id) else {
            return Ok(false);
        };
        let removed = self.with_store(move |repo| repo.delete(note_id)).await?;
        info!(
            "event=note_delete module=service status=ok note_id={} removed={}",
            note_id, removed
        );
        Ok(removed)
    }

    /// Generates summary + practice questions and stores them on the note.
    ///
    /// # Errors
    /// - `NoteNotFound` when the note does not exist.
    /// - `Enrichment` when the backend fails; the note is left unchanged.
    pub async fn enrich_and_save(&self, id: &str) -> ServiceResult<Note> {
        let note_id =
            parse_note_id(id).ok_or_else(|| NoteServiceError::NoteNotFound(id.to_string()))?;
        let note = self
            .with_store(move |repo| repo.find_by_id(note_id))
            .await?
            .ok_or_else(|| NoteServiceError::NoteNotFound(id.to_string()))?;

        let started_at = Instant::now();
        info!(
            "event=note_enrich module=service status=start note_id={}",
            note_id
        );
        let enrichment = match self.enricher.enrich(&note.note_title, &note.content).await {
            Ok(enrichment) => enrichment,
            Err(err) => {
                error!(
                    "event=note_enrich module=service status=error note_id={} duration_ms={} error={}",
                    note_id,
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(NoteServiceError::Enrichment(err));
            }
        };

        let patch = NotePatch::enrichment(enrichment.summary, enrichment.practice_questions);
        let saved = self
            .with_store(move |repo| repo.update(note_id, &patch))
            .await?;
        info!(
            "event=note_enrich module=service status=ok note_id={} duration_ms={} questions={}",
            note_id,
            started_at.elapsed().as_millis(),
            saved.practice_questions.as_ref().map_or(0, Vec::len)
        );
        Ok(saved)
    }

    /// Runs one store operation on the blocking pool.
    async fn with_store<T, F>(&self, op: F) -> ServiceResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn NoteRepository) -> RepoResult<T> + Send + 'static,
    {
        let repo = Arc::clone(&self.repo);
        match tokio::task::spawn_blocking(move || op(repo.as_ref())).await {
            Ok(result) => Ok(result?),
            Err(err) => match err.try_into_panic() {
                Ok(payload) => std::panic::resume_unwind(payload),
                Err(err) => Err(NoteServiceError::Internal(err.to_string())),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::NoteServiceError;
    use crate::enrich::EnrichError;
    use crate::model::note::NoteValidationError;
    use crate::repo::note_repo::RepoError;
    use uuid::Uuid;

    #[test]
    fn repo_errors_map_to_service_categories() {
        let not_found: NoteServiceError = RepoError::NotFound(Uuid::new_v4()).into();
        assert_eq!(not_found.code(), "NOT_FOUND");

        let invalid: NoteServiceError =
            RepoError::Validation(NoteValidationError::EmptyContent).into();
        assert_eq!(invalid.code(), "VALIDATION_ERROR");

        let corrupt: NoteServiceError = RepoError::InvalidData("bad".to_string()).into();
        assert_eq!(corrupt.code(), "INTERNAL");

        let cancelled = NoteServiceError::Internal("task cancelled".to_string());
        assert_eq!(cancelled.code(), "INTERNAL");
    }

    #[test]
    fn enrichment_error_message_includes_cause() {
        let err = NoteServiceError::Enrichment(EnrichError::RateLimited);
        let message = err.to_string();
        assert!(message.starts_with("Failed to generate AI content"));
        assert!(message.contains("rate limit"));
    }
}
