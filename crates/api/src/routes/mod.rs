//! API routes

pub mod brands;
pub mod health;
pub mod pages;

use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::ApiError, routing::brand_edge_middleware, state::AppState};

/// Create all routes
pub fn create_router(state: AppState) -> Router {
    // Health check routes (at root level for infrastructure monitoring)
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness));

    // Server-rendered pages
    let page_routes = Router::new()
        .route("/", get(pages::root_page))
        .route(&state.config.error_route, get(pages::error_page));

    // Brand lookups - under /api/v1
    let api_v1_routes = Router::new()
        .route("/brands", get(brands::list_brands))
        .route("/brands/:brand_id", get(brands::get_brand))
        .route("/brands/:brand_id/theme", get(brands::get_brand_theme))
        .route("/brand/bootstrap", get(brands::bootstrap));

    // Combine all routes; the edge interceptor sees every request and
    // decides for itself which paths to touch
    Router::new()
        .merge(health_routes)
        .merge(page_routes)
        .nest("/api/v1", api_v1_routes)
        .fallback(|| async { ApiError::NotFound })
        .layer(middleware::from_fn_with_state(
            state.clone(),
            brand_edge_middleware,
        ))
        .layer(cors_layer(&state))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy: explicit origins when configured, permissive only outside production
fn cors_layer(state: &AppState) -> CorsLayer {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if !origins.is_empty() {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET])
            .allow_credentials(true)
    } else if state.config.environment.is_production() {
        CorsLayer::new()
    } else {
        CorsLayer::permissive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> Router {
        create_router(AppState::with_builtin_brands().unwrap())
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_list_brands_in_registration_order() {
        let (status, body) = get_json("/api/v1/brands").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["default_brand_id"], "mybrand");

        let ids: Vec<&str> = body["brands"]
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["mybrand", "zumar", "connectwise"]);
    }

    #[tokio::test]
    async fn test_get_brand_and_not_found() {
        let (status, body) = get_json("/api/v1/brands/zumar").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["display_name"], "eSIM Go");
        assert_eq!(body["color_scheme"]["primary"], "#7c3aed");

        let (status, body) = get_json("/api/v1/brands/not-a-real-brand").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "BRAND_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_brand_theme() {
        let (status, body) = get_json("/api/v1/brands/mybrand/theme").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["--brand-primary"], "#1e293b");
        assert_eq!(body["--brand-primary-rgb"], "30, 41, 59");
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let (status, body) = get_json("/api/v1/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["brands"], 3);
        assert_eq!(body["default_brand"], "mybrand");
    }

    #[tokio::test]
    async fn test_error_page_is_reachable() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/error")
                    .header("host", "zumar.local")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("Something went wrong"));
    }
}
