// Job record store

use async_trait::async_trait;

use crate::queue::jobs::{StatusUpdate, TranslationJob};
use crate::types::AppResult;

pub use operations::*;

pub mod operations;

/// Remote table holding translation job rows
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch exactly one job by id. Zero rows or a failed call is `AppError::NotFound`.
    async fn fetch_job(&self, job_id: &str) -> AppResult<TranslationJob>;

    /// Partially update the mutable fields of a job row.
    async fn update_job(&self, job_id: &str, update: &StatusUpdate) -> AppResult<()>;
}
