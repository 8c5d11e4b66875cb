pub mod cors;
pub mod request_tracing;

use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

/// Largest request body accepted. Block trees are JSON and stay well below this.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Wrap `router` in the shared middleware stack, bottom-up: body limit,
/// request tracing, CORS.
pub fn apply(router: Router) -> Router {
    router
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(request_tracing::trace_layer())
        .layer(cors::cors_layer())
}
