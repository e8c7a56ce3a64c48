use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::ports::{
    RemoteQuestion, RemoteResponse, RemoteSurvey, SessionKey, SurveyProvider, SurveyProviderError,
};

/// Scriptable in-memory survey provider for sync tests. Records session
/// acquire/release calls so tests can assert the release-exactly-once
/// discipline.
#[derive(Default)]
pub struct MockSurveyProvider {
    pub surveys: Vec<RemoteSurvey>,
    pub questions: HashMap<String, Vec<RemoteQuestion>>,
    pub responses: HashMap<String, Vec<RemoteResponse>>,
    pub answer_options: HashMap<String, HashMap<String, String>>,
    pub reject_session: bool,
    pub fail_list_questions: bool,
    acquired: AtomicUsize,
    released: Mutex<Vec<SessionKey>>,
}

impl MockSurveyProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquired_count(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released_sessions(&self) -> Vec<SessionKey> {
        self.released.lock().unwrap().clone()
    }
}

#[async_trait]
impl SurveyProvider for MockSurveyProvider {
    async fn acquire_session(&self) -> Result<SessionKey, SurveyProviderError> {
        if self.reject_session {
            return Err(SurveyProviderError::SessionRejected(
                "invalid credentials".to_string(),
            ));
        }
        let n = self.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(SessionKey(format!("session-{}", n)))
    }

    async fn list_surveys(
        &self,
        _session: &SessionKey,
    ) -> Result<Vec<RemoteSurvey>, SurveyProviderError> {
        Ok(self.surveys.clone())
    }

    async fn list_questions(
        &self,
        _session: &SessionKey,
        external_id: &str,
    ) -> Result<Vec<RemoteQuestion>, SurveyProviderError> {
        if self.fail_list_questions {
            return Err(SurveyProviderError::ApiRequestFailed(
                "list_questions down".to_string(),
            ));
        }
        Ok(self.questions.get(external_id).cloned().unwrap_or_default())
    }

    async fn export_responses(
        &self,
        _session: &SessionKey,
        external_id: &str,
    ) -> Result<Vec<RemoteResponse>, SurveyProviderError> {
        Ok(self.responses.get(external_id).cloned().unwrap_or_default())
    }

    async fn question_answer_options(
        &self,
        _session: &SessionKey,
        qid: &str,
    ) -> Result<HashMap<String, String>, SurveyProviderError> {
        Ok(self.answer_options.get(qid).cloned().unwrap_or_default())
    }

    async fn release_session(&self, session: &SessionKey) -> Result<bool, SurveyProviderError> {
        self.released.lock().unwrap().push(session.clone());
        Ok(true)
    }
}
