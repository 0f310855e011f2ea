//! Translation job records and their status lifecycle.
//!
//! Jobs are created elsewhere in `pending` and only ever move forward:
//!
//! ```text
//! pending ──▶ processing ──┬──▶ completed
//!                          └──▶ error
//! ```

use serde::{Deserialize, Serialize};

pub const DEFAULT_TOPIC: &str = "General";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Error,
}

impl JobStatus {
    /// Whether moving from `self` to `next` is a forward step
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Pending, JobStatus::Processing)
                | (JobStatus::Processing, JobStatus::Completed)
                | (JobStatus::Processing, JobStatus::Error)
        )
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Processing => write!(f, "processing"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Error => write!(f, "error"),
        }
    }
}

/// A row of the translations table. Unknown columns are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationJob {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    pub source_file_id: String,
    pub source_language: String,
    pub target_language: String,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(deserialize_with = "opaque_id")]
    pub user_id: String,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub translated_file_path: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl TranslationJob {
    pub fn topic(&self) -> &str {
        self.topic
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(DEFAULT_TOPIC)
    }

    /// Blob path the translated text is stored under
    pub fn translated_path(&self) -> String {
        translated_path(&self.user_id, &self.id)
    }
}

// Identifiers are opaque; bigint keys come back from PostgREST as numbers.
pub(crate) fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number identifier, got {}",
            other
        ))),
    }
}

pub fn translated_path(user_id: &str, job_id: &str) -> String {
    format!("translated/{}/{}.txt", user_id, job_id)
}

/// Partial update written back to a job row.
///
/// `translated_file_path` and `error` are left out of the body when unset so
/// existing values are never overwritten with null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translated_file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusUpdate {
    pub fn processing() -> Self {
        Self {
            status: JobStatus::Processing,
            translated_file_path: None,
            error: None,
        }
    }

    pub fn completed(translated_file_path: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Completed,
            translated_file_path: Some(translated_file_path.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Error,
            translated_file_path: None,
            error: Some(error.into()),
        }
    }
}

/// Payload handed to the translation agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationInputs {
    pub source_text: String,
    pub source_language: String,
    pub target_language: String,
    pub topic: String,
    pub current_year: String,
}

impl TranslationInputs {
    pub fn for_job(job: &TranslationJob, source_text: String, current_year: i32) -> Self {
        Self {
            source_text,
            source_language: job.source_language.clone(),
            target_language: job.target_language.clone(),
            topic: job.topic().to_string(),
            current_year: current_year.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_row() -> serde_json::Value {
        json!({
            "id": "d1",
            "source_file_id": "uploads/u1/report.txt",
            "source_language": "en",
            "target_language": "fr",
            "user_id": "u1",
            "status": "pending",
            "created_at": "2026-01-01T00:00:00Z"
        })
    }

    #[test]
    fn test_transitions_are_forward_only() {
        assert!(JobStatus::Pending.can_transition_to(JobStatus::Processing));
        assert!(JobStatus::Processing.can_transition_to(JobStatus::Completed));
        assert!(JobStatus::Processing.can_transition_to(JobStatus::Error));

        assert!(!JobStatus::Completed.can_transition_to(JobStatus::Processing));
        assert!(!JobStatus::Error.can_transition_to(JobStatus::Completed));
        assert!(!JobStatus::Pending.can_transition_to(JobStatus::Completed));
    }

    #[test]
    fn test_row_deserializes_with_extra_columns() {
        let job: TranslationJob = serde_json::from_value(sample_row()).unwrap();
        assert_eq!(job.id, "d1");
        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.topic(), DEFAULT_TOPIC);
        assert!(job.error.is_none());
    }

    #[test]
    fn test_null_topic_defaults_to_general() {
        let mut row = sample_row();
        row["topic"] = serde_json::Value::Null;
        let job: TranslationJob = serde_json::from_value(row).unwrap();
        assert_eq!(job.topic(), "General");

        let mut row = sample_row();
        row["topic"] = json!("Medicine");
        let job: TranslationJob = serde_json::from_value(row).unwrap();
        assert_eq!(job.topic(), "Medicine");
    }

    #[test]
    fn test_numeric_ids_are_accepted() {
        let mut row = sample_row();
        row["id"] = json!(42);
        let job: TranslationJob = serde_json::from_value(row).unwrap();
        assert_eq!(job.id, "42");

        let mut row = sample_row();
        row["user_id"] = json!(null);
        assert!(serde_json::from_value::<TranslationJob>(row).is_err());
    }

    #[test]
    fn test_translated_path_format() {
        assert_eq!(translated_path("u1", "d1"), "translated/u1/d1.txt");
        let job: TranslationJob = serde_json::from_value(sample_row()).unwrap();
        assert_eq!(job.translated_path(), "translated/u1/d1.txt");
    }

    #[test]
    fn test_status_update_body_omits_unset_fields() {
        let body = serde_json::to_value(StatusUpdate::processing()).unwrap();
        assert_eq!(body, json!({ "status": "processing" }));

        let body = serde_json::to_value(StatusUpdate::completed("translated/u1/d1.txt")).unwrap();
        assert_eq!(
            body,
            json!({ "status": "completed", "translated_file_path": "translated/u1/d1.txt" })
        );

        let body = serde_json::to_value(StatusUpdate::failed("boom")).unwrap();
        assert_eq!(body, json!({ "status": "error", "error": "boom" }));
    }

    #[test]
    fn test_inputs_for_job() {
        let job: TranslationJob = serde_json::from_value(sample_row()).unwrap();
        let inputs = TranslationInputs::for_job(&job, "Hello".to_string(), 2026);
        assert_eq!(inputs.source_language, "en");
        assert_eq!(inputs.target_language, "fr");
        assert_eq!(inputs.topic, "General");
        assert_eq!(inputs.current_year, "2026");
    }
}
