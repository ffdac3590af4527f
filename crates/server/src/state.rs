//! Whole-document endpoints.

use api_types::{Ack, state::StateView};
use axum::{Json, extract::State};
use engine::Library;
use serde_json::Value;

use crate::{
    ServerError, categories::map_category, extract::JsonBody, links::map_link,
    server::ServerState,
};

pub async fn get(State(state): State<ServerState>) -> Result<Json<StateView>, ServerError> {
    let library = state.documents.read().await?;
    Ok(Json(StateView {
        categories: library.categories.iter().map(map_category).collect(),
        links: library.links.iter().map(map_link).collect(),
    }))
}

/// Replace the document. Both `categories` and `links` must be arrays of
/// well-formed entries.
pub async fn replace(
    State(state): State<ServerState>,
    JsonBody(payload): JsonBody<Value>,
) -> Result<Json<Ack>, ServerError> {
    let is_array = |field: &str| payload.get(field).is_some_and(Value::is_array);
    if !is_array("categories") || !is_array("links") {
        return Err(ServerError::Generic("Invalid state payload".to_string()));
    }

    let library: Library = serde_json::from_value(payload)
        .map_err(|err| ServerError::Generic(format!("Invalid state payload: {err}")))?;
    tracing::debug!(
        "replacing state with {} categories and {} links",
        library.categories.len(),
        library.links.len()
    );
    state.documents.replace(library).await?;
    Ok(Json(Ack::OK))
}
