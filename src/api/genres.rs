use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use super::validation::validate_id;
use super::{ApiError, ApiResponse, AppState, GenreDto};
use crate::domain::EntityKind;
use crate::models::genre::GenreInput;

/// `GET /api/genres`
pub async fn list_genres(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<GenreDto>>>, ApiError> {
    let genres = state.genre_service().list().await?;
    Ok(Json(ApiResponse::success(
        genres.into_iter().map(GenreDto::from).collect(),
    )))
}

/// `GET /api/genres/{id}`
pub async fn get_genre(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<GenreDto>>, ApiError> {
    let id = validate_id(EntityKind::Genre, id)?;
    let genre = state.genre_service().get(id).await?;
    Ok(Json(ApiResponse::success(genre.into())))
}

/// `POST /api/genres`
pub async fn create_genre(
    State(state): State<Arc<AppState>>,
    Json(input): Json<GenreInput>,
) -> Result<impl IntoResponse, ApiError> {
    let genre = state.genre_service().create(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(GenreDto::from(genre))),
    ))
}

/// `PUT /api/genres/{id}`
pub async fn update_genre(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(input): Json<GenreInput>,
) -> Result<StatusCode, ApiError> {
    let id = validate_id(EntityKind::Genre, id)?;
    state.genre_service().update(id, input).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/genres/{id}`
pub async fn delete_genre(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let id = validate_id(EntityKind::Genre, id)?;
    state.genre_service().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
