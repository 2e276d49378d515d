use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::get,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::SharedState;

mod actors;
mod error;
mod forms;
mod genres;
mod movies;
mod observability;
mod system;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

use tokio::sync::RwLock;

use crate::services::{ActorService, GenreService, MovieService};
use metrics_exporter_prometheus::PrometheusHandle;

/// Room for the non-file parts of a multipart body on top of the largest
/// accepted upload.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn genre_service(&self) -> &Arc<dyn GenreService> {
        &self.shared.genre_service
    }

    #[must_use]
    pub fn actor_service(&self) -> &Arc<dyn ActorService> {
        &self.shared.actor_service
    }

    #[must_use]
    pub fn movie_service(&self) -> &Arc<dyn MovieService> {
        &self.shared.movie_service
    }
}

pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub async fn router(state: Arc<AppState>) -> Router {
    let (assets_root, assets_url, cors_origins, max_upload_bytes) = {
        let config = state.config().read().await;
        (
            config.assets.root_path.clone(),
            config.assets.public_base_url.clone(),
            config.server.cors_allowed_origins.clone(),
            config.assets.max_upload_bytes,
        )
    };

    let api_router = create_api_router()
        .route_layer(middleware::from_fn(observability::logging_middleware))
        .layer(DefaultBodyLimit::max(
            max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES),
        ))
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    let mut app = Router::new().nest("/api", api_router);

    // Only locally stored assets can be served; remote base URLs are left alone.
    if assets_url.starts_with('/') {
        app = app.nest_service(assets_url.trim_end_matches('/'), ServeDir::new(assets_root));
    }

    app.layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/genres",
            get(genres::list_genres).post(genres::create_genre),
        )
        .route(
            "/genres/{id}",
            get(genres::get_genre)
                .put(genres::update_genre)
                .delete(genres::delete_genre),
        )
        .route(
            "/actors",
            get(actors::list_actors).post(actors::create_actor),
        )
        .route(
            "/actors/{id}",
            get(actors::get_actor)
                .put(actors::update_actor)
                .patch(actors::patch_actor)
                .delete(actors::delete_actor),
        )
        .route(
            "/movies",
            get(movies::movie_index).post(movies::create_movie),
        )
        .route("/movies/filter", get(movies::filter_movies))
        .route(
            "/movies/{id}",
            get(movies::get_movie)
                .put(movies::update_movie)
                .patch(movies::patch_movie)
                .delete(movies::delete_movie),
        )
        .route("/health", get(system::health))
        .route("/metrics", get(observability::get_metrics))
}
