//! API Routes
//!
//! - `POST /api/translate` - Run the translation job named by `documentId`
//! - `GET /api/health` - Health check

pub mod health;
pub mod translate;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::middleware::apply_cors;
use crate::models::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let allowed_origins = state.config.server.cors_allowed_origins.clone();
    let router = Router::new()
        .merge(translate::router(state))
        .merge(health::router())
        .layer(TraceLayer::new_for_http());

    apply_cors(router, &allowed_origins)
}
