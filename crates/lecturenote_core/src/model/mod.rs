//! Domain model for lecture notes and their enrichment output.
//!
//! # Responsibility
//! - Define canonical data structures used by store, service and transport.
//! - Own field-level validation rules shared by every write path.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId` assigned at insert time.
//! - Lecture grouping is derived from `lecture_title` equality only.
//! - Deletion is a hard delete; there are no tombstones.

pub mod note;
pub mod practice_question;
