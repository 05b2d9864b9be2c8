//! Maps core errors onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use kvnotes_core::NotesError;
use serde::Serialize;

/// A [`NotesError`] on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub NotesError);

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            NotesError::Unauthorized => StatusCode::UNAUTHORIZED,
            NotesError::CategoryNotFound(_) | NotesError::NoteNotFound(_) => StatusCode::NOT_FOUND,
            NotesError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            NotesError::InvalidSession(_)
            | NotesError::Backend(_)
            | NotesError::Io(_)
            | NotesError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<NotesError> for ApiError {
    fn from(e: NotesError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("request failed: {}", self.0);
        } else {
            log::debug!("request rejected ({status}): {}", self.0);
        }
        let body = ErrorBody {
            error: self.0.user_message(),
        };
        (status, Json(body)).into_response()
    }
}
