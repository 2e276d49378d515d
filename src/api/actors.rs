//! Actor endpoints. Create and update take multipart bodies so a photo can
//! travel with the fields.

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use super::forms::actor_form;
use super::validation::validate_id;
use super::{ActorDto, ApiError, ApiResponse, AppState, Paged};
use crate::catalog::{PageRequest, PatchOperation};
use crate::domain::EntityKind;

/// `GET /api/actors?page=&records_per_page=`
pub async fn list_actors(
    State(state): State<Arc<AppState>>,
    Query(request): Query<PageRequest>,
) -> Result<Paged<ActorDto>, ApiError> {
    let page = state.actor_service().list(request).await?;
    Ok(page.into())
}

/// `GET /api/actors/{id}`
pub async fn get_actor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ActorDto>>, ApiError> {
    let id = validate_id(EntityKind::Actor, id)?;
    let actor = state.actor_service().get(id).await?;
    Ok(Json(ApiResponse::success(actor.into())))
}

/// `POST /api/actors` with fields `name`, `birth_date` and an optional
/// `photo` file.
pub async fn create_actor(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let (input, photo) = actor_form(multipart).await?;
    let actor = state.actor_service().create(input, photo).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ActorDto::from(actor))),
    ))
}

/// `PUT /api/actors/{id}`
pub async fn update_actor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<StatusCode, ApiError> {
    let id = validate_id(EntityKind::Actor, id)?;
    let (input, photo) = actor_form(multipart).await?;
    state.actor_service().update(id, input, photo).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `PATCH /api/actors/{id}`
pub async fn patch_actor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(operations): Json<Vec<PatchOperation>>,
) -> Result<StatusCode, ApiError> {
    let id = validate_id(EntityKind::Actor, id)?;
    state.actor_service().patch(id, &operations).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/actors/{id}`
pub async fn delete_actor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let id = validate_id(EntityKind::Actor, id)?;
    state.actor_service().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
