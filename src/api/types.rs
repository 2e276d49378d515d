use axum::{
    Json,
    http::{HeaderName, HeaderValue},
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::{FieldViolation, MovieFilter, Page, PageRequest};
use crate::catalog::params::{lenient, lenient_flag};
use crate::models::actor::Actor;
use crate::models::genre::Genre;
use crate::models::movie::{CastCredit, Movie, MovieDetails, MovieIndex};

pub const TOTAL_COUNT_HEADER: &str = "x-total-count";
pub const TOTAL_PAGES_HEADER: &str = "x-total-pages";

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<FieldViolation>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            violations: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            violations: Vec::new(),
        }
    }

    pub fn rejected(message: impl Into<String>, violations: Vec<FieldViolation>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            violations,
        }
    }
}

/// One page of a listing. The records go in the body, the totals in the
/// `x-total-count` and `x-total-pages` headers.
#[derive(Debug)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub total_pages: u64,
}

impl<T, U: From<T>> From<Page<T>> for Paged<U> {
    fn from(page: Page<T>) -> Self {
        let total_pages = page.total_pages();
        Self {
            total: page.total,
            total_pages,
            items: page.items.into_iter().map(U::from).collect(),
        }
    }
}

impl<T: Serialize> IntoResponse for Paged<T> {
    fn into_response(self) -> Response {
        let mut response = Json(ApiResponse::success(self.items)).into_response();
        let headers = response.headers_mut();
        headers.insert(
            HeaderName::from_static(TOTAL_COUNT_HEADER),
            HeaderValue::from(self.total),
        );
        headers.insert(
            HeaderName::from_static(TOTAL_PAGES_HEADER),
            HeaderValue::from(self.total_pages),
        );
        response
    }
}

#[derive(Debug, Serialize)]
pub struct GenreDto {
    pub id: i32,
    pub name: String,
}

impl From<Genre> for GenreDto {
    fn from(genre: Genre) -> Self {
        Self {
            id: genre.id,
            name: genre.name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ActorDto {
    pub id: i32,
    pub name: String,
    pub birth_date: NaiveDate,
    pub photo: Option<String>,
}

impl From<Actor> for ActorDto {
    fn from(actor: Actor) -> Self {
        Self {
            id: actor.id,
            name: actor.name,
            birth_date: actor.birth_date,
            photo: actor.photo,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MovieDto {
    pub id: i32,
    pub title: String,
    pub in_theaters: bool,
    pub release_date: NaiveDate,
    pub poster: Option<String>,
}

impl From<Movie> for MovieDto {
    fn from(movie: Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title,
            in_theaters: movie.in_theaters,
            release_date: movie.release_date,
            poster: movie.poster,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CastCreditDto {
    pub actor_id: i32,
    pub name: String,
    pub photo: Option<String>,
    pub character: String,
    pub order: i32,
}

impl From<CastCredit> for CastCreditDto {
    fn from(credit: CastCredit) -> Self {
        Self {
            actor_id: credit.actor_id,
            name: credit.name,
            photo: credit.photo,
            character: credit.character,
            order: credit.order,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MovieDetailsDto {
    #[serde(flatten)]
    pub movie: MovieDto,
    pub cast: Vec<CastCreditDto>,
    pub genres: Vec<GenreDto>,
}

impl From<MovieDetails> for MovieDetailsDto {
    fn from(details: MovieDetails) -> Self {
        Self {
            movie: MovieDto::from(details.movie),
            cast: details.cast.into_iter().map(CastCreditDto::from).collect(),
            genres: details.genres.into_iter().map(GenreDto::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MovieIndexDto {
    pub upcoming_releases: Vec<MovieDto>,
    pub in_theaters: Vec<MovieDto>,
}

impl From<MovieIndex> for MovieIndexDto {
    fn from(index: MovieIndex) -> Self {
        Self {
            upcoming_releases: index
                .upcoming_releases
                .into_iter()
                .map(MovieDto::from)
                .collect(),
            in_theaters: index.in_theaters.into_iter().map(MovieDto::from).collect(),
        }
    }
}

/// Query string of `GET /api/movies/filter`.
#[derive(Debug, Default, Deserialize)]
pub struct MovieSearchQuery {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub in_theaters: Option<bool>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub upcoming_only: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub genre_id: Option<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub records_per_page: Option<i64>,
}

impl MovieSearchQuery {
    #[must_use]
    pub fn split(self) -> (MovieFilter, PageRequest) {
        (
            MovieFilter {
                title: self.title,
                in_theaters: self.in_theaters,
                upcoming_only: self.upcoming_only,
                genre_id: self.genre_id,
            },
            PageRequest {
                page: self.page,
                records_per_page: self.records_per_page,
            },
        )
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: bool,
    pub version: &'static str,
    pub uptime_seconds: u64,
}
