//! Core domain logic for the lecture notes service.
//! This crate is the single source of truth for note invariants.

pub mod db;
pub mod enrich;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{Database, DbError, DbTarget};
pub use enrich::{
    BackendEnricher, CompletionBackend, CompletionRequest, EnrichError, EnrichPolicy, Enricher,
    Enrichment, OpenAiBackend,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{parse_note_id, NewNote, Note, NoteId, NotePatch, NoteValidationError};
pub use model::practice_question::{Difficulty, PracticeQuestion};
pub use repo::note_repo::{NoteRepository, RepoError, RepoResult, SqliteNoteRepository};
pub use service::note_service::{NoteService, NoteServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
