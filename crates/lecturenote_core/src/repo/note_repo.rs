//! Note store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert/lookup/list/update/delete over the `lecture_notes` table.
//! - Keep practice question JSON encoding inside the persistence boundary.
//!
//! # Invariants
//! - Listings are ordered by `lecture_title ASC, sequence ASC`, ties broken by
//!   `created_at ASC, id ASC`.
//! - `update` only touches fields present in the patch and always refreshes
//!   `updated_at`.
//! - `delete` is a hard delete and never fails on a missing id.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::{Database, DbError};
use crate::model::note::{NewNote, Note, NoteId, NotePatch, NoteValidationError};
use crate::model::practice_question::PracticeQuestion;
use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use uuid::Uuid;

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    lecture_title,
    note_title,
    content,
    sequence,
    summary,
    practice_questions,
    created_at,
    updated_at
FROM lecture_notes";

const NOTE_ORDER_SQL: &str = "ORDER BY lecture_title ASC, sequence ASC, created_at ASC, id ASC";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(NoteValidationError),
    Db(DbError),
    NotFound(NoteId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<NoteValidationError> for RepoError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Note store contract.
///
/// Every call is a round-trip to durable storage; implementations keep no
/// read cache.
pub trait NoteRepository: Send + Sync {
    /// Validates and stores a new note, assigning id and timestamps.
    fn insert(&self, note: &NewNote) -> RepoResult<Note>;
    /// Point lookup; `None` when nothing matches.
    fn find_by_id(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// All notes, grouped by lecture and ordered by sequence.
    fn find_all(&self) -> RepoResult<Vec<Note>>;
    /// Notes of one lecture (exact title match), ordered by sequence.
    fn find_by_lecture(&self, lecture_title: &str) -> RepoResult<Vec<Note>>;
    /// Notes that carry a summary, in `find_all` order.
    fn find_enriched(&self) -> RepoResult<Vec<Note>>;
    /// Unique lecture titles, lexicographically sorted.
    fn distinct_lecture_titles(&self) -> RepoResult<Vec<String>>;
    /// Applies the present fields of `patch` and returns the stored note.
    ///
    /// Checks required fields only; practice questions are stored as given.
    fn update(&self, id: NoteId, patch: &NotePatch) -> RepoResult<Note>;
    /// Removes a note; `false` when nothing matched.
    fn delete(&self, id: NoteId) -> RepoResult<bool>;
}

/// SQLite-backed note repository.
#[derive(Debug, Clone)]
pub struct SqliteNoteRepository {
    db: Arc<Database>,
}

impl SqliteNoteRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }
}

impl NoteRepository for SqliteNoteRepository {
    fn insert(&self, note: &NewNote) -> RepoResult<Note> {
        note.validate()?;

        let id = Uuid::new_v4();
        let now_ms = Utc::now().timestamp_millis();
        let now = millis_to_datetime(now_ms)?;
        let questions_json = encode_questions(note.practice_questions.as_deref())?;

        self.db.with_connection(|conn| {
            conn.execute(
                "INSERT INTO lecture_notes (
                    id,
                    lecture_title,
                    note_title,
                    content,
                    sequence,
                    summary,
                    practice_questions,
                    created_at,
                    updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8);",
                params![
                    id.to_string(),
                    note.lecture_title.as_str(),
                    note.note_title.as_str(),
                    note.content.as_str(),
                    note.sequence,
                    note.summary.as_deref(),
                    questions_json,
                    now_ms,
                ],
            )?;
            Ok::<(), RepoError>(())
        })?;

        Ok(Note {
            id,
            lecture_title: note.lecture_title.clone(),
            note_title: note.note_title.clone(),
            content: note.content.clone(),
            sequence: note.sequence,
            summary: note.summary.clone(),
            practice_questions: note.practice_questions.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    fn find_by_id(&self, id: NoteId) -> RepoResult<Option<Note>> {
        self.db
            .with_connection(|conn| load_note(conn, &id.to_string()))
    }

    fn find_all(&self) -> RepoResult<Vec<Note>> {
        self.db.with_connection(|conn| {
            query_notes(conn, &format!("{NOTE_SELECT_SQL} {NOTE_ORDER_SQL};"), Vec::new())
        })
    }

    fn find_by_lecture(&self, lecture_title: &str) -> RepoResult<Vec<Note>> {
        self.db.with_connection(|conn| {
            query_notes(
                conn,
                &format!("{NOTE_SELECT_SQL} WHERE lecture_title = ? {NOTE_ORDER_SQL};"),
                vec![Value::Text(lecture_title.to_string())],
            )
        })
    }

    fn find_enriched(&self) -> RepoResult<Vec<Note>> {
        self.db.with_connection(|conn| {
            query_notes(
                conn,
                &format!("{NOTE_SELECT_SQL} WHERE summary IS NOT NULL {NOTE_ORDER_SQL};"),
                Vec::new(),
            )
        })
    }

    fn distinct_lecture_titles(&self) -> RepoResult<Vec<String>> {
        self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT DISTINCT lecture_title
                 FROM lecture_notes
                 ORDER BY lecture_title ASC;",
            )?;
            let mut rows = stmt.query([])?;
            let mut titles = Vec::new();
            while let Some(row) = rows.next()? {
                titles.push(row.get::<_, String>(0)?);
            }
            Ok(titles)
        })
    }

    fn update(&self, id: NoteId, patch: &NotePatch) -> RepoResult<Note> {
        patch.validate_fields()?;

        let mut assignments: Vec<&'static str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(note_title) = patch.note_title.as_ref() {
            assignments.push("note_title = ?");
            bind_values.push(Value::Text(note_title.clone()));
        }
        if let Some(content) = patch.content.as_ref() {
            assignments.push("content = ?");
            bind_values.push(Value::Text(content.clone()));
        }
        if let Some(sequence) = patch.sequence {
            assignments.push("sequence = ?");
            bind_values.push(Value::Integer(i64::from(sequence)));
        }
        if let Some(summary) = patch.summary.as_ref() {
            assignments.push("summary = ?");
            bind_values.push(Value::Text(summary.clone()));
        }
        if let Some(questions) = patch.practice_questions.as_deref() {
            assignments.push("practice_questions = ?");
            bind_values.push(Value::Text(encode_question_list(questions)?));
        }
        assignments.push("updated_at = ?");
        bind_values.push(Value::Integer(Utc::now().timestamp_millis()));

        let id_text = id.to_string();
        bind_values.push(Value::Text(id_text.clone()));
        let sql = format!(
            "UPDATE lecture_notes SET {} WHERE id = ?;",
            assignments.join(", ")
        );

        self.db.with_connection(|conn| {
            let changed = conn.execute(&sql, params_from_iter(bind_values))?;
            if changed == 0 {
                return Err(RepoError::NotFound(id));
            }
            load_note(conn, &id_text)?.ok_or(RepoError::NotFound(id))
        })
    }

    fn delete(&self, id: NoteId) -> RepoResult<bool> {
        self.db.with_connection(|conn| {
            let changed = conn.execute(
                "DELETE FROM lecture_notes WHERE id = ?1;",
                [id.to_string()],
            )?;
            Ok(changed > 0)
        })
    }
}

fn load_note(conn: &Connection, id: &str) -> RepoResult<Option<Note>> {
    let mut stmt = conn.prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_note_row(row)?));
    }
    Ok(None)
}

fn query_notes(conn: &Connection, sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<Note>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params_from_iter(bind_values))?;
    let mut notes = Vec::new();
    while let Some(row) = rows.next()? {
        notes.push(parse_note_row(row)?);
    }
    Ok(notes)
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in lecture_notes.id"))
    })?;

    let questions_json: Option<String> = row.get("practice_questions")?;
    let practice_questions = match questions_json {
        Some(json) => Some(
            serde_json::from_str::<Vec<PracticeQuestion>>(&json).map_err(|err| {
                RepoError::InvalidData(format!(
                    "practice_questions of note {id} is not valid JSON: {err}"
                ))
            })?,
        ),
        None => None,
    };

    Ok(Note {
        id,
        lecture_title: row.get("lecture_title")?,
        note_title: row.get("note_title")?,
        content: row.get("content")?,
        sequence: row.get("sequence")?,
        summary: row.get("summary")?,
        practice_questions,
        created_at: millis_to_datetime(row.get("created_at")?)?,
        updated_at: millis_to_datetime(row.get("updated_at")?)?,
    })
}

fn encode_questions(questions: Option<&[PracticeQuestion]>) -> RepoResult<Option<String>> {
    questions.map(encode_question_list).transpose()
}

fn encode_question_list(questions: &[PracticeQuestion]) -> RepoResult<String> {
    serde_json::to_string(questions).map_err(|err| {
        RepoError::InvalidData(format!("failed to encode practice questions: {err}"))
    })
}

fn millis_to_datetime(value: i64) -> RepoResult<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(value)
        .ok_or_else(|| RepoError::InvalidData(format!("timestamp out of range: {value}")))
}
