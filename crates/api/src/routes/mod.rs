pub mod editor;
pub mod events;
pub mod health;
pub mod pages;
pub mod site;

use axum::Router;

use crate::middleware;
use crate::state::AppState;

/// Assemble the full router with all route groups.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(pages::routes())
        .merge(site::routes())
        .merge(editor::routes())
        .with_state(state)
}

/// The router wrapped in the shared middleware stack. Used by the binary and
/// the integration tests alike.
pub fn build_app(state: AppState) -> Router {
    middleware::apply(build_router(state))
}
