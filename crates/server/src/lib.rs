//! Career Guide Server
//!
//! HTTP endpoints for the assessment chat, content lookup and bookmarks.

pub mod bookmarks;
pub mod http;
pub mod metrics;
pub mod session;
pub mod state;

pub use bookmarks::InMemoryBookmarkStore;
pub use http::create_router;
pub use crate::metrics::{
    init_metrics, record_exchange, record_fallback, record_session_count, record_transition,
};
pub use session::{InMemoryConversationStore, Session, SessionManager};
pub use state::AppState;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Session error: {0}")]
    Session(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Max sessions reached")]
    Capacity,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<&ServerError> for StatusCode {
    fn from(err: &ServerError) -> Self {
        match err {
            ServerError::Session(_) => StatusCode::NOT_FOUND,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Capacity => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Engine(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = StatusCode::from(&self);
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<career_guide_core::Error> for ServerError {
    fn from(err: career_guide_core::Error) -> Self {
        match err {
            career_guide_core::Error::NotFound(what) => ServerError::NotFound(what),
            career_guide_core::Error::Storage(msg) => ServerError::Storage(msg),
            other => ServerError::Engine(other.to_string()),
        }
    }
}

impl From<career_guide_agent::AgentError> for ServerError {
    fn from(err: career_guide_agent::AgentError) -> Self {
        ServerError::Engine(err.to_string())
    }
}
