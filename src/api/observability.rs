//! Request telemetry and the Prometheus endpoint.

use crate::api::AppState;
use axum::{
    extract::{MatchedPath, Request, State},
    http::{HeaderName, HeaderValue, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

static REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

pub async fn get_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.prometheus_handle.as_ref().map_or_else(
        || "Metrics not enabled or failed to initialize".to_string(),
        metrics_exporter_prometheus::PrometheusHandle::render,
    )
}

/// What a request does to the catalog, derived from its matched route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogRoute {
    pub entity: &'static str,
    pub operation: &'static str,
}

impl CatalogRoute {
    /// Classifies a route template such as `/movies/{id}`. The `/api` prefix
    /// is optional. Unknown routes fall under `other`.
    #[must_use]
    pub fn classify(method: &Method, route: Option<&str>) -> Self {
        let route = route.unwrap_or_default();
        let route = route.strip_prefix("/api").unwrap_or(route);
        let mut segments = route.trim_matches('/').split('/');

        let entity = match segments.next() {
            Some("movies") => "movie",
            Some("actors") => "actor",
            Some("genres") => "genre",
            Some("health" | "metrics") => "system",
            _ => "other",
        };
        let rest = segments.next();

        let operation = match (entity, rest, method.as_str()) {
            ("system", _, _) if route.contains("health") => "health",
            ("system", _, _) => "metrics",
            ("other", _, _) => "other",
            ("movie", Some("filter"), "GET") => "filter",
            ("movie", None, "GET") => "index",
            (_, None, "GET") => "list",
            (_, None, "POST") => "create",
            (_, Some(_), "GET") => "get",
            (_, Some(_), "PUT") => "update",
            (_, Some(_), "PATCH") => "patch",
            (_, Some(_), "DELETE") => "delete",
            _ => "other",
        };

        Self { entity, operation }
    }
}

const fn status_class(status: u16) -> &'static str {
    match status {
        500.. => "5xx",
        400..=499 => "4xx",
        300..=399 => "3xx",
        _ => "2xx",
    }
}

pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = Uuid::new_v4().to_string();

    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string());
    let catalog = CatalogRoute::classify(req.method(), route.as_deref());

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %req.method(),
        path = %req.uri().path(),
        entity = catalog.entity,
        operation = catalog.operation,
    );

    async move {
        let mut response = next.run(req).await;

        let elapsed = start.elapsed();
        let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        let status = response.status().as_u16();
        let class = status_class(status);

        metrics::counter!(
            "catalog_http_requests_total",
            "entity" => catalog.entity,
            "operation" => catalog.operation,
            "status" => class,
        )
        .increment(1);
        metrics::histogram!(
            "catalog_http_request_duration_seconds",
            "entity" => catalog.entity,
            "operation" => catalog.operation,
        )
        .record(elapsed.as_secs_f64());

        if status >= 500 {
            warn!(status, duration_ms, "Request failed");
        } else {
            info!(status, duration_ms, "Request finished");
        }

        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert(REQUEST_ID.clone(), value);
        }
        response
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(method: Method, route: &str) -> (&'static str, &'static str) {
        let route = CatalogRoute::classify(&method, Some(route));
        (route.entity, route.operation)
    }

    #[test]
    fn movie_routes() {
        assert_eq!(classify(Method::GET, "/api/movies"), ("movie", "index"));
        assert_eq!(classify(Method::GET, "/api/movies/filter"), ("movie", "filter"));
        assert_eq!(classify(Method::GET, "/api/movies/{id}"), ("movie", "get"));
        assert_eq!(classify(Method::POST, "/api/movies"), ("movie", "create"));
        assert_eq!(classify(Method::PUT, "/api/movies/{id}"), ("movie", "update"));
        assert_eq!(classify(Method::PATCH, "/movies/{id}"), ("movie", "patch"));
        assert_eq!(classify(Method::DELETE, "/movies/{id}"), ("movie", "delete"));
    }

    #[test]
    fn other_routes() {
        assert_eq!(classify(Method::GET, "/api/actors"), ("actor", "list"));
        assert_eq!(classify(Method::POST, "/api/genres"), ("genre", "create"));
        assert_eq!(classify(Method::GET, "/api/health"), ("system", "health"));
        assert_eq!(classify(Method::GET, "/api/metrics"), ("system", "metrics"));
        assert_eq!(classify(Method::GET, "/assets/movies/x.png"), ("other", "other"));

        let unmatched = CatalogRoute::classify(&Method::GET, None);
        assert_eq!(unmatched.operation, "other");
    }

    #[test]
    fn status_classes() {
        assert_eq!(status_class(201), "2xx");
        assert_eq!(status_class(404), "4xx");
        assert_eq!(status_class(503), "5xx");
    }
}
