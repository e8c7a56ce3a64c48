use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::QuestionType;

/// Short-lived credential issued by the survey provider. Must be released
/// exactly once when a sync run finishes, on success and failure alike;
/// the provider caps concurrently open sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionKey(pub String);

/// A survey as listed by the remote provider.
#[derive(Debug, Clone)]
pub struct RemoteSurvey {
    pub external_id: String,
    pub title: String,
}

/// One question of a remote survey.
#[derive(Debug, Clone)]
pub struct RemoteQuestion {
    /// Provider-internal question id, needed for property lookups.
    pub qid: String,
    /// Short column title used as the answer key in exported responses.
    pub title: String,
    pub text: String,
    pub question_type: QuestionType,
}

/// One completed response exported from the remote provider: the raw
/// per-question-title answer codes plus export bookkeeping.
#[derive(Debug, Clone)]
pub struct RemoteResponse {
    pub response_id: String,
    pub submitted_at: Option<DateTime<Utc>>,
    pub answers: HashMap<String, Option<String>>,
}

/// Session-keyed RPC surface of the remote survey provider.
#[async_trait]
pub trait SurveyProvider: Send + Sync {
    async fn acquire_session(&self) -> Result<SessionKey, SurveyProviderError>;

    async fn list_surveys(
        &self,
        session: &SessionKey,
    ) -> Result<Vec<RemoteSurvey>, SurveyProviderError>;

    async fn list_questions(
        &self,
        session: &SessionKey,
        external_id: &str,
    ) -> Result<Vec<RemoteQuestion>, SurveyProviderError>;

    async fn export_responses(
        &self,
        session: &SessionKey,
        external_id: &str,
    ) -> Result<Vec<RemoteResponse>, SurveyProviderError>;

    /// `{code: label}` answer options for one list-type question.
    async fn question_answer_options(
        &self,
        session: &SessionKey,
        qid: &str,
    ) -> Result<HashMap<String, String>, SurveyProviderError>;

    async fn release_session(&self, session: &SessionKey) -> Result<bool, SurveyProviderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SurveyProviderError {
    #[error("session rejected: {0}")]
    SessionRejected(String),
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("rpc error: {0}")]
    Rpc(String),
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}
