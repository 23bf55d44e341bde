//! GraphQL transport for the lecture notes service.
//!
//! # Responsibility
//! - Map note service operations to named GraphQL queries and mutations.
//! - Translate service errors into `{errors: [{message, extensions}]}`.
//! - Expose the HTTP router serving the endpoint.
//!
//! # Invariants
//! - No business logic lives here; every resolver delegates to `NoteService`.

mod error;
mod router;
mod schema;

pub use error::{service_error, validation_error};
pub use router::{router, GRAPHQL_PATH, HEALTH_PATH};
pub use schema::{
    build_schema, CreateNoteInput, GqlLectureNote, GqlPracticeQuestion, MutationRoot,
    NotesSchema, PracticeQuestionInput, QueryRoot, UpdateNoteInput,
};
