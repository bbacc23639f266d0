use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::dto::ErrorResponse;

#[derive(Debug, thiserror::Error)]
pub enum NoteError {
    #[error("{0}")]
    BadRequest(String),

    #[error("not found")]
    NotFound,

    #[error("Note store is unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl NoteError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::StoreUnavailable(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<tokio_postgres::Error> for NoteError {
    fn from(e: tokio_postgres::Error) -> Self {
        if e.is_closed() {
            Self::StoreUnavailable(e.to_string())
        } else {
            Self::Internal(e.to_string())
        }
    }
}

impl IntoResponse for NoteError {
    fn into_response(self) -> Response {
        // Server-side details go to the log, not to the client
        let message = match &self {
            Self::BadRequest(msg) => msg.clone(),
            Self::NotFound => "not found".to_string(),
            Self::StoreUnavailable(_) => {
                tracing::error!("{self}");
                "store unavailable".to_string()
            }
            Self::Internal(_) => {
                tracing::error!("{self}");
                "internal server error".to_string()
            }
        };

        (self.status(), Json(ErrorResponse { error: message })).into_response()
    }
}
