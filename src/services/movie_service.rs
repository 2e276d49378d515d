//! Domain service for movies.
//!
//! Every write goes through the same sequence: load (or start fresh), apply
//! fields, validate fields and references, write the poster, reconcile
//! associations, persist in one transaction. Nothing is written to the asset
//! store until the request is known to be valid, and a poster written for a
//! write that then fails to persist is deleted again.

use crate::assets::AssetUpload;
use crate::catalog::{MovieFilter, Page, PageRequest, PatchOperation};
use crate::models::movie::{Movie, MovieDetails, MovieIndex, MovieInput};
use crate::services::error::CatalogError;

#[async_trait::async_trait]
pub trait MovieService: Send + Sync {
    /// Upcoming releases and movies currently in theaters.
    async fn index(&self) -> Result<MovieIndex, CatalogError>;

    /// Filtered, paginated listing ordered by id.
    async fn filter(
        &self,
        filter: MovieFilter,
        request: PageRequest,
    ) -> Result<Page<Movie>, CatalogError>;

    /// The movie with its ordered cast and genres.
    async fn get(&self, id: i32) -> Result<MovieDetails, CatalogError>;

    async fn create(
        &self,
        input: MovieInput,
        poster: Option<AssetUpload>,
    ) -> Result<MovieDetails, CatalogError>;

    /// Full update. Lists left out of `input` keep their stored associations;
    /// an empty list clears them.
    async fn update(
        &self,
        id: i32,
        input: MovieInput,
        poster: Option<AssetUpload>,
    ) -> Result<(), CatalogError>;

    /// Applies field operations to `title`, `in_theaters` and
    /// `release_date`. Associations and the poster are untouched.
    async fn patch(&self, id: i32, operations: &[PatchOperation]) -> Result<(), CatalogError>;

    async fn delete(&self, id: i32) -> Result<(), CatalogError>;
}
