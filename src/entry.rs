//! Job entry point
//!
//! Takes the serialized arguments `{documentId, supabaseUrl, supabaseKey}`,
//! runs one job and reports the outcome as JSON. Every failure is absorbed
//! here and reported as `{"error": message}`.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::error;
use validator::Validate;

use crate::agents::{delegate_from_config, TranslationDelegate};
use crate::config::Config;
use crate::models::TranslationOutcome;
use crate::queue::TranslationWorker;
use crate::supabase::SupabaseClient;
use crate::types::{AppError, AppResult};

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JobArgs {
    #[validate(length(min = 1, message = "documentId is required"))]
    pub document_id: String,
    #[validate(url(message = "supabaseUrl must be a valid URL"))]
    pub supabase_url: String,
    #[validate(length(min = 1, message = "supabaseKey is required"))]
    pub supabase_key: String,
}

impl JobArgs {
    pub fn parse(args: &str) -> AppResult<Self> {
        let parsed: JobArgs = serde_json::from_str(args)
            .map_err(|e| AppError::InvalidRequest(format!("malformed job arguments: {}", e)))?;
        parsed
            .validate()
            .map_err(|e| AppError::InvalidRequest(e.to_string()))?;
        Ok(parsed)
    }
}

/// Run one job and return its outcome, propagating failures
pub async fn try_run_translation(
    args: &str,
    translator: Arc<dyn TranslationDelegate>,
) -> AppResult<TranslationOutcome> {
    let args = JobArgs::parse(args)?;
    let client = SupabaseClient::new(&args.supabase_url, &args.supabase_key)?;
    TranslationWorker::from_supabase(client, translator)
        .process_job(&args.document_id)
        .await
}

/// Run one job and report the outcome as JSON
pub async fn run_translation(args: &str, translator: Arc<dyn TranslationDelegate>) -> Value {
    match try_run_translation(args, translator).await {
        Ok(outcome) => serde_json::to_value(&outcome)
            .unwrap_or_else(|e| json!({ "error": e.to_string() })),
        Err(e) => {
            error!(error = %e, "Translation job failed");
            json!({ "error": e.to_string() })
        }
    }
}

/// Run one job with the translator named by a freshly loaded configuration.
///
/// A configuration that failed to load is reported like a failed job.
pub async fn run_translation_with_config(args: &str, config: anyhow::Result<Config>) -> Value {
    let translator = match config.and_then(|config| Ok(delegate_from_config(&config.llm)?)) {
        Ok(translator) => translator,
        Err(e) => {
            let message = format!("{:#}", e);
            error!(error = %message, "Translation job could not start");
            return json!({ "error": message });
        }
    };
    run_translation(args, translator).await
}
