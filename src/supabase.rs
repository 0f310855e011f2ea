// Supabase project client
// Shared by the PostgREST record store and the storage blob store.

use reqwest::{Client, RequestBuilder};

use crate::types::{AppError, AppResult};

#[derive(Clone)]
pub struct SupabaseClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl SupabaseClient {
    pub fn new(url: &str, api_key: &str) -> AppResult<Self> {
        let base_url = url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(AppError::Supabase(format!("Invalid Supabase URL: {}", url)));
        }
        if api_key.trim().is_empty() {
            return Err(AppError::Supabase("Supabase key is required".to_string()));
        }

        Ok(Self {
            http: Client::new(),
            base_url,
            api_key: api_key.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/rest/v1/{table}`
    pub fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// `{base}/storage/v1/object/{bucket}/{path}`
    pub fn object_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url,
            bucket,
            path.trim_start_matches('/')
        )
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.authorized(self.http.get(url))
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        self.authorized(self.http.post(url))
    }

    pub fn patch(&self, url: &str) -> RequestBuilder {
        self.authorized(self.http.patch(url))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }
}

/// Pull a human-readable message out of a Supabase error body.
///
/// PostgREST uses `message`, storage uses `message` or `error`.
pub(crate) fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .and_then(|m| m.as_str())
                .map(|m| m.to_string())
        })
        .unwrap_or_else(|| body.trim().to_string());

    if detail.is_empty() {
        format!("HTTP {}", status)
    } else {
        format!("HTTP {}: {}", status, detail)
    }
}
