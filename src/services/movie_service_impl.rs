//! `SeaORM` implementation of the `MovieService` trait.

use crate::assets::{AssetStore, AssetUpload, MOVIE_CONTAINER};
use crate::catalog::associations::{distinct_genre_ids, reconcile_cast, reconcile_genres};
use crate::catalog::patch::materialize;
use crate::catalog::{MovieFilter, Page, PageRequest, PageWindow, PatchOperation};
use crate::config::PaginationConfig;
use crate::constants::limits::INDEX_SECTION_SIZE;
use crate::db::Store;
use crate::domain::EntityKind;
use crate::models::movie::{Movie, MovieDetails, MovieIndex, MovieInput, MoviePatch};
use crate::services::error::{CatalogError, missing_ids};
use crate::services::movie_service::MovieService;
use crate::services::uploads;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info};

pub struct SeaOrmMovieService {
    store: Store,
    assets: Arc<dyn AssetStore>,
    pagination: PaginationConfig,
    max_upload_bytes: usize,
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

impl SeaOrmMovieService {
    #[must_use]
    pub fn new(
        store: Store,
        assets: Arc<dyn AssetStore>,
        pagination: PaginationConfig,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            store,
            assets,
            pagination,
            max_upload_bytes,
        }
    }

    fn validate(&self, input: &MovieInput, poster: Option<&AssetUpload>) -> Result<(), CatalogError> {
        let mut violations = input.validate();
        violations.extend(uploads::validate("poster", poster, self.max_upload_bytes));
        CatalogError::check(violations)
    }

    /// Every submitted actor and genre must exist.
    async fn check_references(&self, input: &MovieInput) -> Result<(), CatalogError> {
        if let Some(cast) = &input.cast {
            let requested: Vec<i32> = cast.iter().map(|entry| entry.actor_id).collect();
            let found = self.store.existing_actor_ids(&requested).await?;
            let missing = missing_ids(&requested, &found);
            if !missing.is_empty() {
                return Err(CatalogError::InvalidReference {
                    kind: EntityKind::Actor,
                    ids: missing,
                });
            }
        }

        if let Some(genre_ids) = &input.genre_ids {
            let requested = distinct_genre_ids(genre_ids);
            let found = self.store.existing_genre_ids(&requested).await?;
            let missing = missing_ids(&requested, &found);
            if !missing.is_empty() {
                return Err(CatalogError::InvalidReference {
                    kind: EntityKind::Genre,
                    ids: missing,
                });
            }
        }

        Ok(())
    }

    async fn details(&self, id: i32) -> Result<MovieDetails, CatalogError> {
        self.store
            .get_movie_details(id)
            .await?
            .ok_or_else(|| CatalogError::not_found(EntityKind::Movie, id))
    }

    async fn discard_poster(&self, reference: Option<&str>) {
        if let Some(reference) = reference {
            uploads::compensate(self.assets.as_ref(), reference, MOVIE_CONTAINER).await;
        }
    }
}

#[async_trait]
impl MovieService for SeaOrmMovieService {
    async fn index(&self) -> Result<MovieIndex, CatalogError> {
        Ok(self.store.movie_index(today(), INDEX_SECTION_SIZE).await?)
    }

    async fn filter(
        &self,
        filter: MovieFilter,
        request: PageRequest,
    ) -> Result<Page<Movie>, CatalogError> {
        let window = PageWindow::normalize(request, &self.pagination);
        debug!(?filter, page = window.page(), size = window.size(), "Filtering movies");
        Ok(self.store.filter_movies(&filter, today(), window).await?)
    }

    async fn get(&self, id: i32) -> Result<MovieDetails, CatalogError> {
        self.details(id).await
    }

    async fn create(
        &self,
        input: MovieInput,
        poster: Option<AssetUpload>,
    ) -> Result<MovieDetails, CatalogError> {
        self.validate(&input, poster.as_ref())?;
        self.check_references(&input).await?;

        let mut movie = Movie {
            id: 0,
            title: String::new(),
            in_theaters: false,
            release_date: input.release_date,
            poster: None,
        };
        input.apply_to(&mut movie);

        if let Some(upload) = &poster {
            movie.poster = Some(
                self.assets
                    .store(
                        &upload.content,
                        &upload.extension,
                        MOVIE_CONTAINER,
                        &upload.content_type,
                    )
                    .await?,
            );
        }

        let cast = input.cast.unwrap_or_default();
        let genre_ids = distinct_genre_ids(&input.genre_ids.unwrap_or_default());

        let created = match self.store.add_movie(&movie, &cast, &genre_ids).await {
            Ok(created) => created,
            Err(e) => {
                self.discard_poster(movie.poster.as_deref()).await;
                return Err(e.into());
            }
        };

        metrics::counter!("catalog_writes_total", "entity" => "movie", "operation" => "create")
            .increment(1);
        info!(
            movie_id = created.id,
            title = %created.title,
            cast = cast.len(),
            genres = genre_ids.len(),
            "Movie created"
        );

        self.details(created.id).await
    }

    async fn update(
        &self,
        id: i32,
        input: MovieInput,
        poster: Option<AssetUpload>,
    ) -> Result<(), CatalogError> {
        let aggregate = self
            .store
            .get_movie_aggregate(id)
            .await?
            .ok_or_else(|| CatalogError::not_found(EntityKind::Movie, id))?;

        let mut movie = aggregate.movie;
        input.apply_to(&mut movie);

        self.validate(&input, poster.as_ref())?;
        self.check_references(&input).await?;

        // The previous poster stays in place until the new reference is committed
        let previous = movie.poster.clone();
        let written = match &poster {
            Some(upload) => {
                let reference = self
                    .assets
                    .store(
                        &upload.content,
                        &upload.extension,
                        MOVIE_CONTAINER,
                        &upload.content_type,
                    )
                    .await?;
                movie.poster = Some(reference.clone());
                Some(reference)
            }
            None => None,
        };

        let cast_plan = input
            .cast
            .as_deref()
            .map(|submitted| reconcile_cast(&aggregate.cast, submitted));
        let genre_plan = input
            .genre_ids
            .as_deref()
            .map(|submitted| reconcile_genres(&aggregate.genre_ids, submitted));

        let outcome = match self
            .store
            .save_movie(&movie, cast_plan.as_ref(), genre_plan.as_ref())
            .await
        {
            Ok(true) => Ok(()),
            Ok(false) => Err(CatalogError::not_found(EntityKind::Movie, id)),
            Err(e) => Err(CatalogError::from(e)),
        };

        if outcome.is_err() {
            self.discard_poster(written.as_deref()).await;
            return outcome;
        }

        if written.is_some() {
            uploads::release(self.assets.as_ref(), previous.as_deref(), MOVIE_CONTAINER).await;
        }

        metrics::counter!("catalog_writes_total", "entity" => "movie", "operation" => "update")
            .increment(1);
        info!(
            movie_id = id,
            poster_replaced = written.is_some(),
            cast_submitted = cast_plan.is_some(),
            genres_submitted = genre_plan.is_some(),
            "Movie updated"
        );
        Ok(())
    }

    async fn patch(&self, id: i32, operations: &[PatchOperation]) -> Result<(), CatalogError> {
        let mut movie = self
            .store
            .get_movie(id)
            .await?
            .ok_or_else(|| CatalogError::not_found(EntityKind::Movie, id))?;

        let patched = materialize(MoviePatch::from(&movie), operations)
            .map_err(CatalogError::ValidationFailed)?;
        patched.merge_into(&mut movie);

        if !self.store.save_movie(&movie, None, None).await? {
            return Err(CatalogError::not_found(EntityKind::Movie, id));
        }

        metrics::counter!("catalog_writes_total", "entity" => "movie", "operation" => "patch")
            .increment(1);
        info!(movie_id = id, operations = operations.len(), "Movie patched");
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<(), CatalogError> {
        let movie = self
            .store
            .remove_movie(id)
            .await?
            .ok_or_else(|| CatalogError::not_found(EntityKind::Movie, id))?;

        uploads::release(self.assets.as_ref(), movie.poster.as_deref(), MOVIE_CONTAINER).await;

        metrics::counter!("catalog_writes_total", "entity" => "movie", "operation" => "delete")
            .increment(1);
        info!(movie_id = id, "Movie deleted");
        Ok(())
    }
}
