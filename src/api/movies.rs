use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use super::forms::movie_form;
use super::validation::validate_id;
use super::{
    ApiError, ApiResponse, AppState, MovieDetailsDto, MovieDto, MovieIndexDto, MovieSearchQuery,
    Paged,
};
use crate::catalog::PatchOperation;
use crate::domain::EntityKind;

/// Returns the landing page sections.
///
/// # Endpoint
/// `GET /api/movies`
pub async fn movie_index(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<MovieIndexDto>>, ApiError> {
    let index = state.movie_service().index().await?;
    Ok(Json(ApiResponse::success(index.into())))
}

/// Searches movies.
///
/// # Endpoint
/// `GET /api/movies/filter?title=&in_theaters=&upcoming_only=&genre_id=&page=&records_per_page=`
///
/// Totals are returned in the `x-total-count` and `x-total-pages` headers.
pub async fn filter_movies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MovieSearchQuery>,
) -> Result<Paged<MovieDto>, ApiError> {
    let (filter, request) = query.split();
    let page = state.movie_service().filter(filter, request).await?;
    Ok(page.into())
}

/// `GET /api/movies/{id}`
pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MovieDetailsDto>>, ApiError> {
    let id = validate_id(EntityKind::Movie, id)?;
    let details = state.movie_service().get(id).await?;
    Ok(Json(ApiResponse::success(details.into())))
}

/// Creates a movie.
///
/// # Endpoint
/// `POST /api/movies` (multipart)
///
/// Fields: `title`, `in_theaters`, `release_date`, `genre_ids` (JSON array),
/// `actors` (JSON array of `{actor_id, character}`) and an optional `poster`
/// file. Cast order follows the order of `actors`.
pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let (input, poster) = movie_form(multipart).await?;
    let details = state.movie_service().create(input, poster).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(MovieDetailsDto::from(details))),
    ))
}

/// `PUT /api/movies/{id}` (multipart, same fields as create)
pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<StatusCode, ApiError> {
    let id = validate_id(EntityKind::Movie, id)?;
    let (input, poster) = movie_form(multipart).await?;
    state.movie_service().update(id, input, poster).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `PATCH /api/movies/{id}`
pub async fn patch_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(operations): Json<Vec<PatchOperation>>,
) -> Result<StatusCode, ApiError> {
    let id = validate_id(EntityKind::Movie, id)?;
    state.movie_service().patch(id, &operations).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/movies/{id}`
pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let id = validate_id(EntityKind::Movie, id)?;
    state.movie_service().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
