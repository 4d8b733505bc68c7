/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Layout
 *
 * 1. WebSocket liveness endpoint at `/`
 * 2. API routes under `/api`
 * 3. Fallback: JSON 404 for everything else
 *
 * CORS and request tracing wrap the whole router.
 */

use axum::{http::HeaderValue, routing::get, Router};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::backend::error::BackendError;
use crate::backend::liveness::ws_handler;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new().route("/", get(ws_handler));

    let router = configure_api_routes(router, &app_state);

    let router = router.fallback(|| async { BackendError::not_found("Endpoint not found") });

    let cors = cors_layer(&app_state.config.cors_origin);

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// CORS for the configured origin; `*` allows any
fn cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = match origin {
        "*" => AllowOrigin::any(),
        exact => match HeaderValue::from_str(exact) {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", exact);
                AllowOrigin::list(Vec::<HeaderValue>::new())
            }
        },
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}
