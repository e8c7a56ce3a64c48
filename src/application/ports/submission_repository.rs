use async_trait::async_trait;

use crate::domain::{Answer, Submission};

use super::RepositoryError;

#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// Persist a submission and all of its answers atomically. If any
    /// insert fails, nothing becomes visible; a half-populated submission
    /// must never be observable.
    async fn create_submission(
        &self,
        submission: &Submission,
        answers: &[Answer],
    ) -> Result<(), RepositoryError>;
}
