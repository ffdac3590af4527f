use api_types::ErrorBody;
use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

pub use server::{ServerOptions, app, run, run_with_listener, spawn_with_listener};
pub use storage::{
    Documents, FileStorage, MirroredStorage, ObjectStore, S3Object, S3Settings, Storage,
    StorageError,
};

mod categories;
mod extract;
mod links;
mod server;
mod state;
pub mod storage;

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    Storage(StorageError),
    Generic(String),
    /// The request body could not be read at all (too large, aborted).
    Body(StatusCode, String),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Validation(_) | EngineError::InvalidImport(_) | EngineError::Json(_) => {
            StatusCode::BAD_REQUEST
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(EngineError::KeyNotFound(id)) => {
                (StatusCode::NOT_FOUND, format!("Not found: {id}"))
            }
            ServerError::Engine(err) => (status_for_engine_error(&err), err.to_string()),
            ServerError::Storage(err) => {
                tracing::error!("storage error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "failed to access stored data".to_string(),
                )
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
            ServerError::Body(status, err) => (status, err),
        };

        (status, Json(ErrorBody { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<StorageError> for ServerError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}
