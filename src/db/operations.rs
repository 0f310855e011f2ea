use async_trait::async_trait;
use tracing::debug;

use crate::db::RecordStore;
use crate::queue::jobs::{StatusUpdate, TranslationJob};
use crate::supabase::{error_message, SupabaseClient};
use crate::types::{AppError, AppResult};

pub const DEFAULT_TABLE: &str = "translations";

/// PostgREST-backed access to the translations table
pub struct TranslationRecords {
    client: SupabaseClient,
    table: String,
}

impl TranslationRecords {
    pub fn new(client: SupabaseClient) -> Self {
        Self::with_table(client, DEFAULT_TABLE)
    }

    pub fn with_table(client: SupabaseClient, table: &str) -> Self {
        Self {
            client,
            table: table.to_string(),
        }
    }

    fn id_filter(job_id: &str) -> (&'static str, String) {
        ("id", format!("eq.{}", job_id))
    }
}

#[async_trait]
impl RecordStore for TranslationRecords {
    async fn fetch_job(&self, job_id: &str) -> AppResult<TranslationJob> {
        debug!(job_id, table = %self.table, "Fetching translation job");

        let response = self
            .client
            .get(&self.client.rest_url(&self.table))
            .query(&[Self::id_filter(job_id), ("select", "*".to_string())])
            .send()
            .await
            .map_err(|e| AppError::NotFound(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::NotFound(error_message(status, &body)));
        }

        let rows: Vec<TranslationJob> = response
            .json()
            .await
            .map_err(|e| AppError::NotFound(format!("invalid job record: {}", e)))?;

        if rows.len() > 1 {
            return Err(AppError::NotFound(format!(
                "expected one translation job with id {}, found {}",
                job_id,
                rows.len()
            )));
        }

        rows.into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("no translation job with id {}", job_id)))
    }

    async fn update_job(&self, job_id: &str, update: &StatusUpdate) -> AppResult<()> {
        debug!(job_id, status = %update.status, "Updating translation job");

        let response = self
            .client
            .patch(&self.client.rest_url(&self.table))
            .query(&[Self::id_filter(job_id)])
            .header("Prefer", "return=minimal")
            .json(update)
            .send()
            .await
            .map_err(|e| AppError::StatusUpdate(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::StatusUpdate(error_message(status, &body)));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::jobs::JobStatus;
    use mockito::Matcher;
    use serde_json::json;

    fn records(server: &mockito::ServerGuard) -> TranslationRecords {
        TranslationRecords::new(SupabaseClient::new(&server.url(), "service-key").unwrap())
    }

    #[tokio::test]
    async fn test_fetch_job() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v1/translations")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("id".into(), "eq.d1".into()),
                Matcher::UrlEncoded("select".into(), "*".into()),
            ]))
            .match_header("apikey", "service-key")
            .match_header("authorization", "Bearer service-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!([{
                    "id": "d1",
                    "source_file_id": "uploads/u1/a.txt",
                    "source_language": "en",
                    "target_language": "de",
                    "topic": "Legal",
                    "user_id": "u1",
                    "status": "pending"
                }])
                .to_string(),
            )
            .create_async()
            .await;

        let job = records(&server).fetch_job("d1").await.unwrap();
        assert_eq!(job.id, "d1");
        assert_eq!(job.topic(), "Legal");
        assert_eq!(job.status, JobStatus::Pending);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_job_no_rows() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/v1/translations")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let err = records(&server).fetch_job("missing").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(err.to_string().contains("missing"));
    }

    #[tokio::test]
    async fn test_fetch_job_remote_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/v1/translations")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"message":"Invalid API key"}"#)
            .create_async()
            .await;

        let err = records(&server).fetch_job("d1").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(err.to_string().contains("Invalid API key"));
    }

    #[tokio::test]
    async fn test_update_job_sends_partial_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PATCH", "/rest/v1/translations")
            .match_query(Matcher::UrlEncoded("id".into(), "eq.d1".into()))
            .match_body(Matcher::Json(json!({
                "status": "completed",
                "translated_file_path": "translated/u1/d1.txt"
            })))
            .with_status(204)
            .create_async()
            .await;

        records(&server)
            .update_job("d1", &StatusUpdate::completed("translated/u1/d1.txt"))
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_update_job_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PATCH", "/rest/v1/translations")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let err = records(&server)
            .update_job("d1", &StatusUpdate::processing())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::StatusUpdate(_)));
    }
}
