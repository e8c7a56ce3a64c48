use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use crate::application::ports::{RepositoryError, SubmissionRepository};
use crate::domain::{Answer, Submission};

pub struct PgSubmissionRepository {
    pool: PgPool,
}

impl PgSubmissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubmissionRepository for PgSubmissionRepository {
    #[instrument(skip(self, submission, answers), fields(submission_id = %submission.id.as_uuid(), answers = answers.len()))]
    async fn create_submission(
        &self,
        submission: &Submission,
        answers: &[Answer],
    ) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO submissions (id, report_id, user_id, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(submission.id.as_uuid())
        .bind(submission.report_id.as_uuid())
        .bind(submission.user_id.as_i64())
        .bind(submission.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        for answer in answers {
            sqlx::query(
                r#"
                INSERT INTO answers (id, submission_id, question_id, text, created_at)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(answer.id.as_uuid())
            .bind(answer.submission_id.as_uuid())
            .bind(answer.question_id.as_uuid())
            .bind(&answer.text)
            .bind(answer.created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }
}
