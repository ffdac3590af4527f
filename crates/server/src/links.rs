//! Links API endpoints.

use api_types::{
    Ack,
    link::{LinkCreate, LinkFilter, LinkUpdate, LinkView},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{Icon, Link, LinkPatch};
use uuid::Uuid;

use crate::{ServerError, extract::JsonBody, server::ServerState};

pub(crate) fn map_link(link: &Link) -> LinkView {
    LinkView {
        id: link.id.clone(),
        name: link.name.clone(),
        url: link.url.clone(),
        alias: link.alias.clone(),
        category_id: link.category_id.clone(),
        favicon: link.favicon.clone(),
        icon_type: link.icon_type.clone(),
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, ServerError> {
    value.ok_or_else(|| ServerError::Generic(format!("{field} is required")))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<LinkFilter>,
) -> Result<Json<Vec<LinkView>>, ServerError> {
    let library = state.documents.read().await?;
    let category_id = filter.category_id.as_deref().filter(|id| !id.is_empty());
    let links = library
        .links
        .iter()
        .filter(|link| category_id.is_none_or(|id| link.category_id == id))
        .map(map_link)
        .collect();
    Ok(Json(links))
}

/// New links get a fresh id and, when none was sent, the default icon.
pub async fn create(
    State(state): State<ServerState>,
    JsonBody(payload): JsonBody<LinkCreate>,
) -> Result<(StatusCode, Json<LinkView>), ServerError> {
    let link = Link {
        id: Uuid::new_v4().to_string(),
        name: required(payload.name, "name")?,
        url: required(payload.url, "url")?,
        category_id: required(payload.category_id, "categoryId")?,
        alias: payload.alias,
        favicon: payload.favicon,
        icon_type: Some(
            payload
                .icon_type
                .unwrap_or_else(|| Icon::DEFAULT.as_str().to_string()),
        ),
    };

    let created = state
        .documents
        .update(move |library| library.add_link(link).map(map_link))
        .await?;
    tracing::debug!("created link {} in {}", created.id, created.category_id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(link_id): Path<String>,
    JsonBody(payload): JsonBody<LinkUpdate>,
) -> Result<Json<LinkView>, ServerError> {
    let patch = LinkPatch {
        name: payload.name,
        url: payload.url,
        alias: payload.alias,
        category_id: payload.category_id,
        favicon: payload.favicon,
        icon_type: payload.icon_type,
    };
    let link = state
        .documents
        .update(move |library| library.update_link(&link_id, patch).map(map_link))
        .await?;
    Ok(Json(link))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(link_id): Path<String>,
) -> Result<Json<Ack>, ServerError> {
    state
        .documents
        .update(move |library| library.remove_link(&link_id).map(|_| ()))
        .await?;
    Ok(Json(Ack::OK))
}
