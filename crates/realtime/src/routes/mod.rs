//! API routes

pub mod health;
pub mod notify;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{state::AppState, websocket::ws_handler};

/// Create all API routes
pub fn create_router(state: AppState) -> Router {
    // Health check routes (at root level for infrastructure monitoring)
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness));

    // WebSocket routes (auth handled in handler via query parameter)
    let websocket_routes = Router::new().route("/ws", get(ws_handler));

    // Internal service-to-service routes (token check inside the handler)
    let internal_routes = Router::new().route(
        "/internal/notify/meeting-started",
        post(notify::meeting_started),
    );

    let cors = cors_layer(&state.config.client_origin);

    Router::new()
        .merge(health_routes)
        .merge(websocket_routes)
        .merge(internal_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// CORS restricted to the configured client origin
fn cors_layer(client_origin: &str) -> CorsLayer {
    match client_origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        Err(_) => {
            tracing::warn!(
                origin = client_origin,
                "CLIENT_ORIGIN is not a valid origin, allowing any"
            );
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}
