pub mod configuration;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::configuration::ServerSettings;
use crate::state::AppState;

/// Assemble the full application: routes, CORS and request tracing
pub fn build_app(state: AppState, settings: &ServerSettings) -> Router {
    // Create router with CORS support
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes::configure(state, settings)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
