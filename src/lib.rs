// Doc Translator - runs document translation jobs stored in Supabase

pub mod config;
pub mod db;
pub mod models;
pub mod types;
pub mod agents;
pub mod llm;
pub mod storage;
pub mod supabase;  // Shared Supabase REST client
pub mod queue;
pub mod entry;     // JSON job entry point
pub mod routes;
pub mod middleware;
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;
pub use types::{AppError, AppResult};

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
