// Blob storage layer (Supabase storage buckets)

use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::{debug, info};

use crate::types::{AppError, AppResult};

pub mod supabase_storage;

pub use supabase_storage::*;

/// Remote object storage keyed by path
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Download the raw bytes of an object. Failures are `AppError::Download`.
    async fn download(&self, reference: &str) -> AppResult<Bytes>;

    /// Upload `data` to `path`. Failures are `AppError::Upload`.
    async fn upload(&self, path: &str, data: Bytes, content_type: &str, upsert: bool) -> AppResult<()>;
}

/// Download an object and decode it as UTF-8 text.
///
/// Invalid sequences are replaced rather than rejected. An empty object is an error.
pub async fn download_text(store: &dyn BlobStore, reference: &str) -> AppResult<String> {
    let data = store.download(reference).await?;
    if data.is_empty() {
        return Err(AppError::Download(format!("{} has no content", reference)));
    }

    debug!(reference, bytes = data.len(), "Downloaded source file");
    Ok(String::from_utf8_lossy(&data).into_owned())
}

/// Stage `text` in a temporary file and upload its bytes to `path` as
/// `text/plain`, overwriting any existing object.
///
/// The temporary file is deleted before this returns, on every path.
pub async fn upload_text(
    store: &dyn BlobStore,
    path: &str,
    text: &str,
    temp_dir: Option<&Path>,
) -> AppResult<String> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("translation-").suffix(".txt");
    let temp_file = match temp_dir {
        Some(dir) => builder.tempfile_in(dir),
        None => builder.tempfile(),
    }
    .map_err(|e| AppError::Upload(format!("failed to create temporary file: {}", e)))?;

    fs::write(temp_file.path(), text.as_bytes())
        .await
        .map_err(|e| AppError::Upload(format!("failed to write temporary file: {}", e)))?;
    let data = fs::read(temp_file.path())
        .await
        .map_err(|e| AppError::Upload(format!("failed to read temporary file: {}", e)))?;

    store
        .upload(path, Bytes::from(data), mime::TEXT_PLAIN.as_ref(), true)
        .await?;

    temp_file
        .close()
        .map_err(|e| AppError::Upload(format!("failed to remove temporary file: {}", e)))?;

    info!(path, bytes = text.len(), "Uploaded translated file");
    Ok(path.to_string())
}
