use std::sync::Arc;

use crate::config::Config;
use crate::queue::workers::TranslationWorker;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub worker: Arc<TranslationWorker>,
}

/// Result of a successfully processed job
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TranslationOutcome {
    pub success: bool,
    pub document_id: String,
    pub translated_file_path: String,
}

impl TranslationOutcome {
    pub fn completed(document_id: impl Into<String>, translated_file_path: impl Into<String>) -> Self {
        Self {
            success: true,
            document_id: document_id.into(),
            translated_file_path: translated_file_path.into(),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}
