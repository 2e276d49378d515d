use std::sync::Arc;
use tokio::sync::RwLock;

use crate::assets::{AssetStore, LocalAssetStore};
use crate::config::Config;
use crate::db::Store;
use crate::services::{
    ActorService, GenreService, MovieService, SeaOrmActorService, SeaOrmGenreService,
    SeaOrmMovieService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub assets: Arc<dyn AssetStore>,

    pub genre_service: Arc<dyn GenreService>,

    pub actor_service: Arc<dyn ActorService>,

    pub movie_service: Arc<dyn MovieService>,
}

impl SharedState {
    /// Connects the database and opens the local asset directory named in
    /// the configuration.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let assets = LocalAssetStore::new(
            &config.assets.root_path,
            config.assets.public_base_url.clone(),
        )
        .await?;
        Self::with_asset_store(config, Arc::new(assets)).await
    }

    pub async fn with_asset_store(
        config: Config,
        assets: Arc<dyn AssetStore>,
    ) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let genre_service: Arc<dyn GenreService> =
            Arc::new(SeaOrmGenreService::new(store.clone()));

        let actor_service: Arc<dyn ActorService> = Arc::new(SeaOrmActorService::new(
            store.clone(),
            assets.clone(),
            config.pagination.clone(),
            config.assets.max_upload_bytes,
        ));

        let movie_service: Arc<dyn MovieService> = Arc::new(SeaOrmMovieService::new(
            store.clone(),
            assets.clone(),
            config.pagination.clone(),
            config.assets.max_upload_bytes,
        ));

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            store,
            assets,
            genre_service,
            actor_service,
            movie_service,
        })
    }
}
