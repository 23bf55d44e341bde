//! GraphQL schema: object types, inputs and resolvers.
//!
//! Field names follow the camelCase wire format (`lectureTitle`,
//! `practiceQuestions`, ...). Timestamps are ISO-8601 strings and ids are
//! strings.

use crate::error::{service_error, validation_error};
use async_graphql::{
    Context, EmptySubscription, InputObject, Object, Result as GqlResult, Schema, SimpleObject, ID,
};
use chrono::{DateTime, SecondsFormat, Utc};
use lecturenote_core::{NewNote, Note, NotePatch, NoteService, PracticeQuestion};

/// Schema served at the GraphQL endpoint.
pub type NotesSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Builds the schema around an explicitly constructed service.
pub fn build_schema(service: NoteService) -> NotesSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(service)
        .finish()
}

/// Practice question as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, SimpleObject)]
#[graphql(name = "PracticeQuestion")]
pub struct GqlPracticeQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    /// `Regular` or `Difficult (imp)`.
    pub difficulty: String,
    pub explanation: String,
}

impl From<PracticeQuestion> for GqlPracticeQuestion {
    fn from(value: PracticeQuestion) -> Self {
        Self {
            question: value.question,
            options: value.options,
            correct_answer: value.correct_answer,
            difficulty: value.difficulty.as_str().to_string(),
            explanation: value.explanation,
        }
    }
}

/// Lecture note as returned to callers.
#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "LectureNote")]
pub struct GqlLectureNote {
    pub id: ID,
    pub lecture_title: String,
    pub note_title: String,
    pub content: String,
    pub sequence: i32,
    pub summary: Option<String>,
    pub practice_questions: Option<Vec<GqlPracticeQuestion>>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Note> for GqlLectureNote {
    fn from(note: Note) -> Self {
        Self {
            id: ID(note.id.to_string()),
            lecture_title: note.lecture_title,
            note_title: note.note_title,
            content: note.content,
            sequence: note.sequence,
            summary: note.summary,
            practice_questions: note
                .practice_questions
                .map(|questions| questions.into_iter().map(Into::into).collect()),
            created_at: iso_timestamp(note.created_at),
            updated_at: iso_timestamp(note.updated_at),
        }
    }
}

fn iso_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Practice question supplied by a caller (import or manual edit).
#[derive(Debug, Clone, InputObject)]
pub struct PracticeQuestionInput {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub difficulty: String,
    pub explanation: String,
}

impl TryFrom<PracticeQuestionInput> for PracticeQuestion {
    type Error = String;

    fn try_from(value: PracticeQuestionInput) -> Result<Self, Self::Error> {
        Ok(Self {
            question: value.question,
            options: value.options,
            correct_answer: value.correct_answer,
            difficulty: value.difficulty.parse()?,
            explanation: value.explanation,
        })
    }
}

/// Input for `createNote`.
#[derive(Debug, Clone, InputObject)]
pub struct CreateNoteInput {
    pub lecture_title: String,
    pub note_title: String,
    pub content: String,
    pub sequence: i32,
    pub summary: Option<String>,
    pub practice_questions: Option<Vec<PracticeQuestionInput>>,
}

/// Input for `updateNote`. The lecture title cannot be changed.
#[derive(Debug, Clone, Default, InputObject)]
pub struct UpdateNoteInput {
    pub note_title: Option<String>,
    pub content: Option<String>,
    pub sequence: Option<i32>,
    pub summary: Option<String>,
    pub practice_questions: Option<Vec<PracticeQuestionInput>>,
}

fn convert_questions(
    questions: Option<Vec<PracticeQuestionInput>>,
) -> GqlResult<Option<Vec<PracticeQuestion>>> {
    questions
        .map(|items| {
            items
                .into_iter()
                .enumerate()
                .map(|(index, item)| {
                    PracticeQuestion::try_from(item).map_err(|reason| {
                        validation_error(format!(
                            "practice question #{} is invalid: {reason}",
                            index + 1
                        ))
                    })
                })
                .collect::<GqlResult<Vec<_>>>()
        })
        .transpose()
}

impl CreateNoteInput {
    fn into_new_note(self) -> GqlResult<NewNote> {
        Ok(NewNote {
            lecture_title: self.lecture_title,
            note_title: self.note_title,
            content: self.content,
            sequence: self.sequence,
            summary: self.summary,
            practice_questions: convert_questions(self.practice_questions)?,
        })
    }
}

impl UpdateNoteInput {
    fn into_patch(self) -> GqlResult<NotePatch> {
        Ok(NotePatch {
            note_title: self.note_title,
            content: self.content,
            sequence: self.sequence,
            summary: self.summary,
            practice_questions: convert_questions(self.practice_questions)?,
        })
    }
}

fn to_gql_notes(notes: Vec<Note>) -> Vec<GqlLectureNote> {
    notes.into_iter().map(Into::into).collect()
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// All notes, ordered by lecture title then sequence.
    async fn get_all_notes(&self, ctx: &Context<'_>) -> GqlResult<Vec<GqlLectureNote>> {
        let service = ctx.data::<NoteService>()?;
        let notes = service.list_all().await.map_err(service_error)?;
        Ok(to_gql_notes(notes))
    }

    /// Notes of one lecture, ordered by sequence.
    async fn get_notes_by_lecture(
        &self,
        ctx: &Context<'_>,
        lecture_title: String,
    ) -> GqlResult<Vec<GqlLectureNote>> {
        let service = ctx.data::<NoteService>()?;
        let notes = service
            .list_by_lecture(&lecture_title)
            .await
            .map_err(service_error)?;
        Ok(to_gql_notes(notes))
    }

    /// One note, or null when the id does not resolve.
    async fn get_note_by_id(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> GqlResult<Option<GqlLectureNote>> {
        let service = ctx.data::<NoteService>()?;
        let note = service.get_by_id(&id).await.map_err(service_error)?;
        Ok(note.map(Into::into))
    }

    /// Unique lecture titles, sorted.
    async fn get_lecture_titles(&self, ctx: &Context<'_>) -> GqlResult<Vec<String>> {
        let service = ctx.data::<NoteService>()?;
        service.list_lecture_titles().await.map_err(service_error)
    }

    /// Notes that already have a summary.
    async fn get_enriched_notes(&self, ctx: &Context<'_>) -> GqlResult<Vec<GqlLectureNote>> {
        let service = ctx.data::<NoteService>()?;
        let notes = service.list_enriched().await.map_err(service_error)?;
        Ok(to_gql_notes(notes))
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_note(
        &self,
        ctx: &Context<'_>,
        input: CreateNoteInput,
    ) -> GqlResult<GqlLectureNote> {
        let service = ctx.data::<NoteService>()?;
        let note = service
            .create(input.into_new_note()?)
            .await
            .map_err(service_error)?;
        Ok(note.into())
    }

    /// Partial update; fails with `NOT_FOUND` for unknown ids.
    async fn update_note(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: UpdateNoteInput,
    ) -> GqlResult<GqlLectureNote> {
        let service = ctx.data::<NoteService>()?;
        let note = service
            .update(&id, input.into_patch()?)
            .await
            .map_err(service_error)?;
        Ok(note.into())
    }

    /// `true` when a note was removed.
    async fn delete_note(&self, ctx: &Context<'_>, id: ID) -> GqlResult<bool> {
        let service = ctx.data::<NoteService>()?;
        service.delete(&id).await.map_err(service_error)
    }

    /// Generates and stores summary + practice questions for a note.
    #[graphql(name = "generateAIContent")]
    async fn generate_ai_content(&self, ctx: &Context<'_>, id: ID) -> GqlResult<GqlLectureNote> {
        let service = ctx.data::<NoteService>()?;
        let note = service.enrich_and_save(&id).await.map_err(service_error)?;
        Ok(note.into())
    }
}

#[cfg(test)]
mod tests {
    use super::{iso_timestamp, GqlLectureNote, PracticeQuestionInput};
    use chrono::{TimeZone, Utc};
    use lecturenote_core::{Difficulty, Note, PracticeQuestion};
    use uuid::Uuid;

    #[test]
    fn timestamps_render_as_iso_8601_with_millis() {
        let value = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(iso_timestamp(value), "2023-11-14T22:13:20.123Z");
    }

    #[test]
    fn note_conversion_keeps_null_questions_and_string_id() {
        let now = Utc::now();
        let id = Uuid::new_v4();
        let note = Note {
            id,
            lecture_title: "Lecture 1".to_string(),
            note_title: "Intro".to_string(),
            content: "hello".to_string(),
            sequence: 1,
            summary: None,
            practice_questions: None,
            created_at: now,
            updated_at: now,
        };
        let gql: GqlLectureNote = note.into();
        assert_eq!(gql.id.0, id.to_string());
        assert!(gql.practice_questions.is_none());
        assert_eq!(gql.created_at, gql.updated_at);
    }

    #[test]
    fn question_input_parses_difficulty_label() {
        let input = PracticeQuestionInput {
            question: "Q".to_string(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_answer: "a".to_string(),
            difficulty: "Difficult (imp)".to_string(),
            explanation: "e".to_string(),
        };
        let parsed = PracticeQuestion::try_from(input.clone()).unwrap();
        assert_eq!(parsed.difficulty, Difficulty::Difficult);

        let invalid = PracticeQuestionInput {
            difficulty: "Easy".to_string(),
            ..input
        };
        assert!(PracticeQuestion::try_from(invalid).is_err());
    }
}
