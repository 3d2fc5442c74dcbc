//! Scriptwright HTTP gateway: REST routes over the store and the agent
//! registry, plus the boot path and CLI shared by the `scriptwright` binary.

pub mod api;
pub mod bootstrap;
pub mod cli;
pub mod cors;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Default bound on in-flight requests when `SW_MAX_CONCURRENT_REQUESTS`
/// is unset or unparsable.
pub const DEFAULT_MAX_CONCURRENT: usize = 256;

/// The full application: API routes with CORS, request tracing and a
/// global concurrency limit, bound to `state`.
pub fn app(state: AppState, max_concurrent: usize) -> Router {
    let cors_layer = cors::build_cors_layer(&state.config.server.cors);
    api::router()
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .layer(tower::limit::ConcurrencyLimitLayer::new(max_concurrent))
        .with_state(state)
}

/// Read `SW_MAX_CONCURRENT_REQUESTS`, falling back to the default.
pub fn max_concurrent_from_env() -> usize {
    std::env::var("SW_MAX_CONCURRENT_REQUESTS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_MAX_CONCURRENT)
}
