use async_trait::async_trait;

use crate::domain::{Question, Report, ReportId};

use super::RepositoryError;

#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn find_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<Report>, RepositoryError>;

    /// Persist a report together with its imported questions in one
    /// transaction.
    async fn create_report_with_questions(
        &self,
        report: &Report,
        questions: &[Question],
    ) -> Result<(), RepositoryError>;

    async fn get_report(&self, id: ReportId) -> Result<Option<Report>, RepositoryError>;

    async fn list_reports(&self) -> Result<Vec<Report>, RepositoryError>;

    /// Questions of one report in creation order, oldest first. Callers
    /// relying on last-match-wins tie-breaking depend on this ordering.
    async fn questions_for_report(
        &self,
        report_id: ReportId,
    ) -> Result<Vec<Question>, RepositoryError>;
}
