//! `SeaORM` implementation of the `ActorService` trait.

use crate::assets::{ACTOR_CONTAINER, AssetStore, AssetUpload};
use crate::catalog::patch::materialize;
use crate::catalog::{Page, PageRequest, PageWindow, PatchOperation};
use crate::config::PaginationConfig;
use crate::db::Store;
use crate::domain::EntityKind;
use crate::models::actor::{Actor, ActorInput, ActorPatch};
use crate::services::actor_service::ActorService;
use crate::services::error::CatalogError;
use crate::services::uploads;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

pub struct SeaOrmActorService {
    store: Store,
    assets: Arc<dyn AssetStore>,
    pagination: PaginationConfig,
    max_upload_bytes: usize,
}

impl SeaOrmActorService {
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

    async fn load(&self, id: i32) -> Result<Actor, CatalogError> {
        self.store
            .get_actor(id)
            .await?
            .ok_or_else(|| CatalogError::not_found(EntityKind::Actor, id))
    }

    /// Persists `actor`, discarding `written` when that fails.
    async fn persist(&self, actor: &Actor, written: Option<&str>) -> Result<(), CatalogError> {
        let outcome = match self.store.save_actor(actor).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(CatalogError::not_found(EntityKind::Actor, actor.id)),
            Err(e) => Err(CatalogError::from(e)),
        };

        if let (Err(_), Some(reference)) = (&outcome, written) {
            uploads::compensate(self.assets.as_ref(), reference, ACTOR_CONTAINER).await;
        }

        outcome
    }
}

#[async_trait]
impl ActorService for SeaOrmActorService {
    async fn list(&self, request: PageRequest) -> Result<Page<Actor>, CatalogError> {
        let window = PageWindow::normalize(request, &self.pagination);
        Ok(self.store.list_actors(window).await?)
    }

    async fn get(&self, id: i32) -> Result<Actor, CatalogError> {
        self.load(id).await
    }

    async fn create(
        &self,
        input: ActorInput,
        photo: Option<AssetUpload>,
    ) -> Result<Actor, CatalogError> {
        let mut violations = input.validate();
        violations.extend(uploads::validate(
            "photo",
            photo.as_ref(),
            self.max_upload_bytes,
        ));
        CatalogError::check(violations)?;

        let reference = match &photo {
            Some(upload) => Some(
                self.assets
                    .store(
                        &upload.content,
                        &upload.extension,
                        ACTOR_CONTAINER,
                        &upload.content_type,
                    )
                    .await?,
            ),
            None => None,
        };

        let actor = match self.store.add_actor(&input, reference.clone()).await {
            Ok(actor) => actor,
            Err(e) => {
                if let Some(reference) = &reference {
                    uploads::compensate(self.assets.as_ref(), reference, ACTOR_CONTAINER).await;
                }
                return Err(e.into());
            }
        };

        metrics::counter!("catalog_writes_total", "entity" => "actor", "operation" => "create")
            .increment(1);
        info!(actor_id = actor.id, name = %actor.name, "Actor created");
        Ok(actor)
    }

    async fn update(
        &self,
        id: i32,
        input: ActorInput,
        photo: Option<AssetUpload>,
    ) -> Result<Actor, CatalogError> {
        let mut actor = self.load(id).await?;

        let mut violations = input.validate();
        violations.extend(uploads::validate(
            "photo",
            photo.as_ref(),
            self.max_upload_bytes,
        ));
        CatalogError::check(violations)?;

        actor.name = input.name;
        actor.birth_date = input.birth_date;

        let previous = actor.photo.clone();
        let written = match &photo {
            Some(upload) => {
                let reference = self
                    .assets
                    .store(
                        &upload.content,
                        &upload.extension,
                        ACTOR_CONTAINER,
                        &upload.content_type,
                    )
                    .await?;
                actor.photo = Some(reference.clone());
                Some(reference)
            }
            None => None,
        };

        self.persist(&actor, written.as_deref()).await?;

        if written.is_some() {
            uploads::release(self.assets.as_ref(), previous.as_deref(), ACTOR_CONTAINER).await;
        }

        metrics::counter!("catalog_writes_total", "entity" => "actor", "operation" => "update")
            .increment(1);
        info!(actor_id = id, photo_replaced = written.is_some(), "Actor updated");
        Ok(actor)
    }

    async fn patch(&self, id: i32, operations: &[PatchOperation]) -> Result<Actor, CatalogError> {
        let mut actor = self.load(id).await?;

        let patched =
            materialize(ActorPatch::from(&actor), operations).map_err(CatalogError::ValidationFailed)?;
        actor.name = patched.name;
        actor.birth_date = patched.birth_date;

        self.persist(&actor, None).await?;

        metrics::counter!("catalog_writes_total", "entity" => "actor", "operation" => "patch")
            .increment(1);
        info!(actor_id = id, operations = operations.len(), "Actor patched");
        Ok(actor)
    }

    async fn delete(&self, id: i32) -> Result<(), CatalogError> {
        let actor = self
            .store
            .remove_actor(id)
            .await?
            .ok_or_else(|| CatalogError::not_found(EntityKind::Actor, id))?;

        uploads::release(self.assets.as_ref(), actor.photo.as_deref(), ACTOR_CONTAINER).await;

        metrics::counter!("catalog_writes_total", "entity" => "actor", "operation" => "delete")
            .increment(1);
        info!(actor_id = id, "Actor deleted");
        Ok(())
    }
}
