// Export route modules
pub mod ask;
pub mod index;

use axum::Router;

use crate::configuration::ServerSettings;
use crate::error::ApiError;
use crate::state::AppState;

// Function to configure all routes
pub fn configure(state: AppState, settings: &ServerSettings) -> Router {
    Router::new()
        .merge(ask::routes(state, settings.max_body_bytes))
        .merge(index::routes())
        .fallback(not_found)
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}
