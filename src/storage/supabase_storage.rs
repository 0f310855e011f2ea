// Supabase storage client for a single bucket

use async_trait::async_trait;
use bytes::Bytes;

use crate::storage::BlobStore;
use crate::supabase::{error_message, SupabaseClient};
use crate::types::{AppError, AppResult};

pub const DEFAULT_BUCKET: &str = "documents";

pub struct SupabaseStorage {
    client: SupabaseClient,
    bucket: String,
}

impl SupabaseStorage {
    pub fn new(client: SupabaseClient) -> Self {
        Self::with_bucket(client, DEFAULT_BUCKET)
    }

    pub fn with_bucket(client: SupabaseClient, bucket: &str) -> Self {
        Self {
            client,
            bucket: bucket.to_string(),
        }
    }
}

#[async_trait]
impl BlobStore for SupabaseStorage {
    async fn download(&self, reference: &str) -> AppResult<Bytes> {
        let response = self
            .client
            .get(&self.client.object_url(&self.bucket, reference))
            .send()
            .await
            .map_err(|e| AppError::Download(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Download(error_message(status, &body)));
        }

        response
            .bytes()
            .await
            .map_err(|e| AppError::Download(format!("failed to read body: {}", e)))
    }

    async fn upload(&self, path: &str, data: Bytes, content_type: &str, upsert: bool) -> AppResult<()> {
        let response = self
            .client
            .post(&self.client.object_url(&self.bucket, path))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("x-upsert", if upsert { "true" } else { "false" })
            .body(data)
            .send()
            .await
            .map_err(|e| AppError::Upload(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upload(error_message(status, &body)));
        }

        Ok(())
    }
}
