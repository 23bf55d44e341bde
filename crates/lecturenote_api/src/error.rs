//! Service error translation for GraphQL responses.
//!
//! Every error carries `extensions.code` so callers can tell a rejected input
//! from an unavailable store.

use async_graphql::{Error, ErrorExtensions};
use lecturenote_core::NoteServiceError;
use log::{error, warn};

/// Converts a service failure into a GraphQL error entry.
pub fn service_error(err: NoteServiceError) -> Error {
    let code = err.code();
    match &err {
        NoteServiceError::Validation(_) | NoteServiceError::NoteNotFound(_) => {
            warn!("event=graphql_error module=api status=rejected code={code} error={err}");
        }
        NoteServiceError::Enrichment(_)
        | NoteServiceError::Repo(_)
        | NoteServiceError::Internal(_) => {
            error!("event=graphql_error module=api status=error code={code} error={err}");
        }
    }
    with_code(Error::new(err.to_string()), code)
}

/// Builds a validation error for input rejected before reaching the service.
pub fn validation_error(message: impl Into<String>) -> Error {
    with_code(Error::new(message.into()), "VALIDATION_ERROR")
}

fn with_code(err: Error, code: &'static str) -> Error {
    err.extend_with(|_, extensions| extensions.set("code", code.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{service_error, validation_error};
    use lecturenote_core::{NoteServiceError, NoteValidationError};

    fn code_of(err: &async_graphql::Error) -> Option<String> {
        let extensions = err.extensions.as_ref()?;
        match extensions.get("code")? {
            async_graphql::Value::String(code) => Some(code.clone()),
            _ => None,
        }
    }

    #[test]
    fn service_errors_keep_message_and_code() {
        let err = service_error(NoteServiceError::NoteNotFound("abc".to_string()));
        assert_eq!(err.message, "Note not found");
        assert_eq!(code_of(&err).as_deref(), Some("NOT_FOUND"));

        let err = service_error(NoteServiceError::Validation(
            NoteValidationError::EmptyContent,
        ));
        assert_eq!(err.message, "Content is required");
        assert_eq!(code_of(&err).as_deref(), Some("VALIDATION_ERROR"));
    }

    #[test]
    fn validation_error_is_tagged() {
        let err = validation_error("bad difficulty");
        assert_eq!(code_of(&err).as_deref(), Some("VALIDATION_ERROR"));
    }
}
