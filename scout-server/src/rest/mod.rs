pub mod controllers;

pub use controllers::{AgiController, AnalyzeController, CacheController};

use crate::ServerConfig;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    routing::{delete, get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Build CORS layer based on security configuration
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if config.security.allowed_origins.is_empty() {
        cors.allow_origin(AllowOrigin::any())
    } else {
        let origins: Vec<HeaderValue> =
            config.security.allowed_origins.iter().filter_map(|o| o.parse().ok()).collect();
        cors.allow_origin(origins)
    }
}

/// Create the router with every `/api` route and the security layers.
pub fn create_app(config: ServerConfig) -> Router {
    let analyze_controller =
        AnalyzeController::new(config.pipeline.clone(), config.security.expose_error_details);
    let agi_controller = AgiController::new(config.search.clone(), config.connection_test_timeout);
    let cache_controller = CacheController::new(config.cache().clone());

    let api_router = Router::new()
        .route(
            "/analyze",
            get(controllers::analyze::analyze_status).post(controllers::analyze::analyze),
        )
        .route("/analyze/live", post(controllers::analyze::analyze_live))
        .with_state(analyze_controller)
        .route("/test-agi", get(controllers::agi::test_agi))
        .route("/pool", get(controllers::agi::pool_status))
        .with_state(agi_controller)
        .route("/cache/stats", get(controllers::cache::cache_stats))
        .route("/cache", delete(controllers::cache::clear_cache))
        .with_state(cache_controller);

    let app = Router::new().route("/health", get(health_check)).nest("/api", api_router);

    if config.security.allowed_origins.is_empty() {
        tracing::warn!("CORS allows any origin; configure allowed origins for production");
    }
    let cors_layer = build_cors_layer(&config);

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::with_status_code(
                axum::http::StatusCode::REQUEST_TIMEOUT,
                config.security.request_timeout,
            ))
            .layer(DefaultBodyLimit::max(config.security.max_body_size))
            .layer(cors_layer)
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_FRAME_OPTIONS,
                HeaderValue::from_static("DENY"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_XSS_PROTECTION,
                HeaderValue::from_static("1; mode=block"),
            )),
    )
}

async fn health_check() -> &'static str {
    "OK"
}
