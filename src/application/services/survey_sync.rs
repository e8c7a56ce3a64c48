use std::sync::Arc;

use crate::application::ports::{
    ReportRepository, RepositoryError, SessionKey, SurveyProvider, SurveyProviderError,
};
use crate::domain::{Question, Report};

/// Counts reported by one directory sync run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub imported_reports: usize,
    pub imported_questions: usize,
    pub skipped: usize,
}

/// Imports survey and question definitions from the remote provider into
/// local storage. Idempotent by external survey id: a report that already
/// exists is skipped untouched (first-sync-wins), so re-running against an
/// unchanged remote set changes nothing.
pub struct SurveyDirectorySync<P>
where
    P: SurveyProvider,
{
    provider: Arc<P>,
    report_repository: Arc<dyn ReportRepository>,
}

impl<P> SurveyDirectorySync<P>
where
    P: SurveyProvider,
{
    pub fn new(provider: Arc<P>, report_repository: Arc<dyn ReportRepository>) -> Self {
        Self {
            provider,
            report_repository,
        }
    }

    /// Run one full sync. The session key is released exactly once on
    /// every path; a release failure is logged, never allowed to mask the
    /// import's own result.
    #[tracing::instrument(skip(self))]
    pub async fn run(&self) -> Result<SyncReport, SyncError> {
        let session = self.provider.acquire_session().await?;

        let result = self.import(&session).await;

        if let Err(e) = self.provider.release_session(&session).await {
            tracing::error!(error = %e, "Failed to release survey provider session");
        }

        result
    }

    async fn import(&self, session: &SessionKey) -> Result<SyncReport, SyncError> {
        let surveys = self.provider.list_surveys(session).await?;
        let mut report = SyncReport::default();

        for survey in surveys {
            // Explicit exists check; absence is an answer, not an error.
            let existing = self
                .report_repository
                .find_by_external_id(&survey.external_id)
                .await?;
            if existing.is_some() {
                report.skipped += 1;
                continue;
            }

            let remote_questions = self
                .provider
                .list_questions(session, &survey.external_id)
                .await?;

            let new_report = Report::new(survey.external_id.clone(), survey.title.clone(), String::new());
            let questions: Vec<Question> = remote_questions
                .iter()
                .map(|q| Question::new(new_report.id, q.text.clone()))
                .collect();

            self.report_repository
                .create_report_with_questions(&new_report, &questions)
                .await?;

            tracing::info!(
                external_id = %survey.external_id,
                questions = questions.len(),
                "Imported survey"
            );
            report.imported_reports += 1;
            report.imported_questions += questions.len();
        }

        Ok(report)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("survey provider: {0}")]
    Provider(#[from] SurveyProviderError),
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
}
