//! Domain service for the genre lookup table.

use crate::models::genre::{Genre, GenreInput};
use crate::services::error::CatalogError;

#[async_trait::async_trait]
pub trait GenreService: Send + Sync {
    /// Lists every genre by name.
    async fn list(&self) -> Result<Vec<Genre>, CatalogError>;

    async fn get(&self, id: i32) -> Result<Genre, CatalogError>;

    async fn create(&self, input: GenreInput) -> Result<Genre, CatalogError>;

    async fn update(&self, id: i32, input: GenreInput) -> Result<(), CatalogError>;

    /// Deletes the genre. Movies lose the membership but are kept.
    async fn delete(&self, id: i32) -> Result<(), CatalogError>;
}
