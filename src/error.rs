//! Error taxonomy for the daily-game core.
//!
//! Catalog/configuration errors are fatal at startup; backend trouble is
//! absorbed at the store boundary and never fails a player-facing request.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    /// The puzzle catalog is empty or failed to load. Deployment
    /// misconfiguration: fail loudly, never serve.
    #[error("puzzle catalog is empty")]
    EmptyCatalog,

    /// Transient storage-backend failure. Absorbed internally by the store
    /// implementations; surfaces only from administrative operations.
    #[error("storage backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Administrative operation rejected by policy (e.g. force-pinning
    /// while the remote backend is configured).
    #[error("forbidden")]
    Forbidden,

    /// Malformed request body or parameters. No state was mutated.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Administrative pin referenced an id not present in the catalog.
    #[error("unknown puzzle id {0}")]
    UnknownPuzzleId(u32),
}

impl GameError {
    pub fn status(&self) -> StatusCode {
        match self {
            GameError::EmptyCatalog => StatusCode::INTERNAL_SERVER_ERROR,
            GameError::BackendUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            GameError::Forbidden => StatusCode::FORBIDDEN,
            GameError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            GameError::UnknownPuzzleId(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for GameError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}
