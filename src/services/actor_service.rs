//! Domain service for actors and their photos.

use crate::assets::AssetUpload;
use crate::catalog::{Page, PageRequest, PatchOperation};
use crate::models::actor::{Actor, ActorInput};
use crate::services::error::CatalogError;

#[async_trait::async_trait]
pub trait ActorService: Send + Sync {
    /// Lists actors by name, one page at a time.
    async fn list(&self, request: PageRequest) -> Result<Page<Actor>, CatalogError>;

    async fn get(&self, id: i32) -> Result<Actor, CatalogError>;

    /// Creates an actor, storing the photo first when one is given.
    async fn create(
        &self,
        input: ActorInput,
        photo: Option<AssetUpload>,
    ) -> Result<Actor, CatalogError>;

    /// Replaces the actor's fields. A new photo replaces the stored one;
    /// without one the photo reference is kept.
    async fn update(
        &self,
        id: i32,
        input: ActorInput,
        photo: Option<AssetUpload>,
    ) -> Result<Actor, CatalogError>;

    /// Applies field operations to `name` and `birth_date`.
    async fn patch(&self, id: i32, operations: &[PatchOperation]) -> Result<Actor, CatalogError>;

    /// Deletes the actor, closes the gap it leaves in every cast and releases
    /// its photo.
    async fn delete(&self, id: i32) -> Result<(), CatalogError>;
}
