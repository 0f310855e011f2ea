// Translation job worker
// fetch → processing → download → translate → upload → completed (or error)

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Datelike;
use tracing::{error, info, warn};

use crate::agents::translator::{invoke_translation, TranslationDelegate};
use crate::db::{RecordStore, TranslationRecords};
use crate::models::TranslationOutcome;
use crate::queue::jobs::{JobStatus, StatusUpdate, TranslationInputs, TranslationJob};
use crate::storage::{self, BlobStore, SupabaseStorage};
use crate::supabase::SupabaseClient;
use crate::types::{AppError, AppResult};

pub struct TranslationWorker {
    records: Arc<dyn RecordStore>,
    blobs: Arc<dyn BlobStore>,
    translator: Arc<dyn TranslationDelegate>,
    temp_dir: Option<PathBuf>,
}

impl TranslationWorker {
    pub fn new(
        records: Arc<dyn RecordStore>,
        blobs: Arc<dyn BlobStore>,
        translator: Arc<dyn TranslationDelegate>,
    ) -> Self {
        Self {
            records,
            blobs,
            translator,
            temp_dir: None,
        }
    }

    /// Worker over the default `translations` table and `documents` bucket
    pub fn from_supabase(client: SupabaseClient, translator: Arc<dyn TranslationDelegate>) -> Self {
        Self::new(
            Arc::new(TranslationRecords::new(client.clone())),
            Arc::new(SupabaseStorage::new(client)),
            translator,
        )
    }

    /// Stage upload files in `dir` instead of the system temp directory
    pub fn with_temp_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.temp_dir = dir;
        self
    }

    /// Run one job to completion.
    ///
    /// A failed lookup is returned before any status write. Once the job is
    /// marked `processing`, every failure is recorded on the job as `error`
    /// and the original error is returned.
    pub async fn process_job(&self, job_id: &str) -> AppResult<TranslationOutcome> {
        if job_id.trim().is_empty() {
            return Err(AppError::InvalidRequest("Document ID is required".to_string()));
        }

        let job = self.records.fetch_job(job_id).await?;
        if !job.status.can_transition_to(JobStatus::Processing) {
            warn!(job_id, status = %job.status, "Reprocessing translation job that is not pending");
        }

        info!(
            job_id,
            source = %job.source_language,
            target = %job.target_language,
            topic = %job.topic(),
            "Processing translation job"
        );

        match self.run_stages(&job).await {
            Ok(translated_file_path) => {
                info!(job_id, path = %translated_file_path, "Translation job completed");

                Ok(TranslationOutcome::completed(job_id, translated_file_path))
            }
            Err(e) => {
                error!(job_id, error = %e, "Error processing translation");
                self.record_failure(job_id, &e).await;
                Err(e)
            }
        }
    }

    async fn run_stages(&self, job: &TranslationJob) -> AppResult<String> {
        self.update_status(&job.id, StatusUpdate::processing()).await?;

        let source_text = storage::download_text(self.blobs.as_ref(), &job.source_file_id).await?;

        let inputs = TranslationInputs::for_job(job, source_text, chrono::Utc::now().year());
        let translated = invoke_translation(self.translator.as_ref(), &inputs).await?;

        let translated_file_path = storage::upload_text(
            self.blobs.as_ref(),
            &job.translated_path(),
            &translated,
            self.temp_dir.as_deref(),
        )
        .await?;

        self.update_status(&job.id, StatusUpdate::completed(&translated_file_path))
            .await?;
        Ok(translated_file_path)
    }

    async fn update_status(&self, job_id: &str, update: StatusUpdate) -> AppResult<()> {
        self.records.update_job(job_id, &update).await
    }

    // A failing error write is logged; the caller still returns the original error.
    async fn record_failure(&self, job_id: &str, cause: &AppError) {
        if let Err(update_err) = self
            .update_status(job_id, StatusUpdate::failed(cause.to_string()))
            .await
        {
            error!(
                job_id,
                error = %update_err,
                original_error = %cause,
                "Failed to record error status on translation job"
            );
        }
    }
}
