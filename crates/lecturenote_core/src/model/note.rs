//! Lecture note domain model.
//!
//! # Responsibility
//! - Define the persisted `Note` record and its write-side inputs.
//! - Validate required fields before any persistence happens.
//!
//! # Invariants
//! - `lecture_title`, `note_title` and `content` are never blank.
//! - `sequence >= 1`; duplicates inside one lecture are allowed.
//! - `lecture_title` cannot be changed after creation: `NotePatch` has no
//!   field for it.
//! - `summary` and `practice_questions` are independent of the other fields.

use crate::model::practice_question::PracticeQuestion;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a note, assigned by the store.
pub type NoteId = Uuid;

/// Parses an externally supplied note id.
///
/// Returns `None` for malformed values; callers treat that as "no such note".
pub fn parse_note_id(value: &str) -> Option<NoteId> {
    Uuid::parse_str(value.trim()).ok()
}

/// Persisted lecture note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub lecture_title: String,
    pub note_title: String,
    pub content: String,
    /// Display order inside the lecture grouping.
    pub sequence: i32,
    /// `None` until enrichment succeeds or a caller supplies one.
    pub summary: Option<String>,
    /// Same lifecycle as `summary`; always replaced as a whole.
    pub practice_questions: Option<Vec<PracticeQuestion>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Returns whether a summary has been generated or supplied.
    pub fn is_enriched(&self) -> bool {
        self.summary.is_some()
    }
}

/// Fields accepted by the store on insert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewNote {
    pub lecture_title: String,
    pub note_title: String,
    pub content: String,
    pub sequence: i32,
    pub summary: Option<String>,
    pub practice_questions: Option<Vec<PracticeQuestion>>,
}

impl NewNote {
    /// Validates required fields for a new note.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        validate_lecture_title(&self.lecture_title)?;
        validate_note_title(&self.note_title)?;
        validate_content(&self.content)?;
        validate_sequence(self.sequence)?;
        if let Some(questions) = self.practice_questions.as_deref() {
            validate_practice_questions(questions)?;
        }
        Ok(())
    }
}

/// Partial update for an existing note.
///
/// `None` means "leave untouched". There is deliberately no lecture title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub note_title: Option<String>,
    pub content: Option<String>,
    pub sequence: Option<i32>,
    pub summary: Option<String>,
    pub practice_questions: Option<Vec<PracticeQuestion>>,
}

impl NotePatch {
    /// Builds the patch written by a successful enrichment.
    pub fn enrichment(summary: String, practice_questions: Vec<PracticeQuestion>) -> Self {
        Self {
            summary: Some(summary),
            practice_questions: Some(practice_questions),
            ..Self::default()
        }
    }

    /// Returns whether no field is set.
    pub fn is_empty(&self) -> bool {
        self.note_title.is_none()
            && self.content.is_none()
            && self.sequence.is_none()
            && self.summary.is_none()
            && self.practice_questions.is_none()
    }

    /// Validates the fields present in this patch, including the practice
    /// question contract. Used for caller-supplied edits.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        self.validate_fields()?;
        if let Some(questions) = self.practice_questions.as_deref() {
            validate_practice_questions(questions)?;
        }
        Ok(())
    }

    /// Validates the required note fields present in this patch.
    ///
    /// Practice questions are not checked: generated questions are stored
    /// as produced.
    pub fn validate_fields(&self) -> Result<(), NoteValidationError> {
        if let Some(note_title) = self.note_title.as_deref() {
            validate_note_title(note_title)?;
        }
        if let Some(content) = self.content.as_deref() {
            validate_content(content)?;
        }
        if let Some(sequence) = self.sequence {
            validate_sequence(sequence)?;
        }
        Ok(())
    }
}

/// Field-level validation failure for note writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    EmptyLectureTitle,
    EmptyNoteTitle,
    EmptyContent,
    InvalidSequence(i32),
    InvalidPracticeQuestion { index: usize, reason: String },
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyLectureTitle => write!(f, "Lecture title is required"),
            Self::EmptyNoteTitle => write!(f, "Note title is required"),
            Self::EmptyContent => write!(f, "Content is required"),
            Self::InvalidSequence(value) => {
                write!(f, "Sequence number must be at least 1, got {value}")
            }
            Self::InvalidPracticeQuestion { index, reason } => {
                write!(f, "practice question #{} is invalid: {reason}", index + 1)
            }
        }
    }
}

impl Error for NoteValidationError {}

fn validate_lecture_title(value: &str) -> Result<(), NoteValidationError> {
    if value.trim().is_empty() {
        return Err(NoteValidationError::EmptyLectureTitle);
    }
    Ok(())
}

fn validate_note_title(value: &str) -> Result<(), NoteValidationError> {
    if value.trim().is_empty() {
        return Err(NoteValidationError::EmptyNoteTitle);
    }
    Ok(())
}

fn validate_content(value: &str) -> Result<(), NoteValidationError> {
    if value.trim().is_empty() {
        return Err(NoteValidationError::EmptyContent);
    }
    Ok(())
}

fn validate_sequence(value: i32) -> Result<(), NoteValidationError> {
    if value < 1 {
        return Err(NoteValidationError::InvalidSequence(value));
    }
    Ok(())
}

fn validate_practice_questions(questions: &[PracticeQuestion]) -> Result<(), NoteValidationError> {
    for (index, question) in questions.iter().enumerate() {
        question
            .validate()
            .map_err(|reason| NoteValidationError::InvalidPracticeQuestion { index, reason })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{parse_note_id, NewNote, NotePatch, NoteValidationError};
    use crate::model::practice_question::{Difficulty, PracticeQuestion};

    fn valid_new_note() -> NewNote {
        NewNote {
            lecture_title: "Lecture 1".to_string(),
            note_title: "Intro".to_string(),
            content: "hello".to_string(),
            sequence: 1,
            ..NewNote::default()
        }
    }

    #[test]
    fn new_note_requires_titles_content_and_positive_sequence() {
        assert!(valid_new_note().validate().is_ok());

        let mut blank_lecture = valid_new_note();
        blank_lecture.lecture_title = "   ".to_string();
        assert_eq!(
            blank_lecture.validate(),
            Err(NoteValidationError::EmptyLectureTitle)
        );

        let mut zero_sequence = valid_new_note();
        zero_sequence.sequence = 0;
        assert_eq!(
            zero_sequence.validate(),
            Err(NoteValidationError::InvalidSequence(0))
        );

        let mut empty_content = valid_new_note();
        empty_content.content = String::new();
        assert_eq!(empty_content.validate(), Err(NoteValidationError::EmptyContent));
    }

    #[test]
    fn patch_validates_only_present_fields() {
        assert!(NotePatch::default().validate().is_ok());
        assert!(NotePatch::default().is_empty());

        let patch = NotePatch {
            note_title: Some(String::new()),
            ..NotePatch::default()
        };
        assert_eq!(patch.validate(), Err(NoteValidationError::EmptyNoteTitle));
    }

    #[test]
    fn question_contract_is_checked_by_validate_but_not_validate_fields() {
        let generated = PracticeQuestion {
            question: "Which service stores objects?".to_string(),
            options: vec!["A. EC2".into(), "B. S3".into(), "C. VPC".into(), "D. SQS".into()],
            correct_answer: "B".to_string(),
            difficulty: Difficulty::Regular,
            explanation: "S3 is object storage".to_string(),
        };
        let patch = NotePatch::enrichment("summary".to_string(), vec![generated]);

        assert!(patch.validate_fields().is_ok());
        assert!(matches!(
            patch.validate(),
            Err(NoteValidationError::InvalidPracticeQuestion { index: 0, .. })
        ));
    }

    #[test]
    fn parse_note_id_rejects_malformed_values() {
        assert!(parse_note_id("not-a-uuid").is_none());
        assert!(parse_note_id("6f1c2f0e-4b7a-4d4c-9d43-0a1f5d0b8e11").is_some());
    }
}
