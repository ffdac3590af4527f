//! Categories API endpoints.

use api_types::{
    Ack,
    category::{CategoryCreate, CategoryUpdate, CategoryView},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Category, CategoryPatch};
use uuid::Uuid;

use crate::{ServerError, extract::JsonBody, server::ServerState};

pub(crate) fn map_category(category: &Category) -> CategoryView {
    CategoryView {
        id: category.id.clone(),
        name: category.name.clone(),
    }
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<CategoryView>>, ServerError> {
    let library = state.documents.read().await?;
    Ok(Json(library.categories.iter().map(map_category).collect()))
}

pub async fn create(
    State(state): State<ServerState>,
    JsonBody(payload): JsonBody<CategoryCreate>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let Some(name) = payload.name else {
        return Err(ServerError::Generic("name is required".to_string()));
    };

    let category = Category::new(Uuid::new_v4().to_string(), name);
    let created = state
        .documents
        .update(move |library| library.add_category(category).map(map_category))
        .await?;
    tracing::debug!("created category {}", created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

/// Sparse rename: an absent or empty `name` leaves the category as is.
pub async fn update(
    State(state): State<ServerState>,
    Path(category_id): Path<String>,
    JsonBody(payload): JsonBody<CategoryUpdate>,
) -> Result<Json<CategoryView>, ServerError> {
    let patch = CategoryPatch { name: payload.name };
    let category = state
        .documents
        .update(move |library| {
            library
                .update_category(&category_id, patch)
                .map(map_category)
        })
        .await?;
    Ok(Json(category))
}

/// Deletes the category together with every link inside it.
pub async fn delete(
    State(state): State<ServerState>,
    Path(category_id): Path<String>,
) -> Result<Json<Ack>, ServerError> {
    let removed = state
        .documents
        .update(move |library| library.remove_category(&category_id))
        .await?;
    tracing::debug!("category deleted with {} links", removed.len());
    Ok(Json(Ack::OK))
}
