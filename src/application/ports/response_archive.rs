use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::RepositoryError;

/// One archived (survey, response, question) answer row. The triple
/// `(survey_id, response_id, question_title)` is the upsert key.
#[derive(Debug, Clone)]
pub struct ArchivedAnswer {
    pub survey_id: String,
    pub response_id: String,
    pub question_title: String,
    pub question_text: String,
    pub answer: String,
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Generic archive of completed remote responses, written by the richer
/// sync path. Re-running the sync updates answer text and submit date in
/// place.
#[async_trait]
pub trait ResponseArchive: Send + Sync {
    async fn count_for_survey(&self, survey_id: &str) -> Result<usize, RepositoryError>;

    async fn upsert_answer(&self, row: &ArchivedAnswer) -> Result<(), RepositoryError>;
}
