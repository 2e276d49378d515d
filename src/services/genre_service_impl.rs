//! `SeaORM` implementation of the `GenreService` trait.

use crate::catalog::validation;
use crate::db::Store;
use crate::domain::EntityKind;
use crate::models::genre::{Genre, GenreInput};
use crate::services::error::CatalogError;
use crate::services::genre_service::GenreService;
use async_trait::async_trait;
use tracing::info;

pub struct SeaOrmGenreService {
    store: Store,
}

impl SeaOrmGenreService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl GenreService for SeaOrmGenreService {
    async fn list(&self) -> Result<Vec<Genre>, CatalogError> {
        Ok(self.store.list_genres().await?)
    }

    async fn get(&self, id: i32) -> Result<Genre, CatalogError> {
        self.store
            .get_genre(id)
            .await?
            .ok_or_else(|| CatalogError::not_found(EntityKind::Genre, id))
    }

    async fn create(&self, input: GenreInput) -> Result<Genre, CatalogError> {
        let name = input.name.trim();
        CatalogError::check(validation::genre_name(name))?;

        let genre = self.store.add_genre(name).await?;

        metrics::counter!("catalog_writes_total", "entity" => "genre", "operation" => "create")
            .increment(1);
        info!(genre_id = genre.id, name = %genre.name, "Genre created");
        Ok(genre)
    }

    async fn update(&self, id: i32, input: GenreInput) -> Result<(), CatalogError> {
        let name = input.name.trim();
        CatalogError::check(validation::genre_name(name))?;

        if !self.store.rename_genre(id, name).await? {
            return Err(CatalogError::not_found(EntityKind::Genre, id));
        }

        metrics::counter!("catalog_writes_total", "entity" => "genre", "operation" => "update")
            .increment(1);
        info!(genre_id = id, name, "Genre updated");
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<(), CatalogError> {
        if !self.store.remove_genre(id).await? {
            return Err(CatalogError::not_found(EntityKind::Genre, id));
        }

        metrics::counter!("catalog_writes_total", "entity" => "genre", "operation" => "delete")
            .increment(1);
        info!(genre_id = id, "Genre deleted");
        Ok(())
    }
}
