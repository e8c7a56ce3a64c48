use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::instrument;

use crate::application::ports::{ArchivedAnswer, RepositoryError, ResponseArchive};

pub struct PgResponseArchive {
    pool: PgPool,
}

impl PgResponseArchive {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResponseArchive for PgResponseArchive {
    #[instrument(skip(self))]
    async fn count_for_survey(&self, survey_id: &str) -> Result<usize, RepositoryError> {
        let count: i64 =
            sqlx::query("SELECT COUNT(*) AS n FROM archived_answers WHERE survey_id = $1")
                .bind(survey_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?
                .get("n");

        Ok(count as usize)
    }

    #[instrument(skip(self, row), fields(survey_id = %row.survey_id, response_id = %row.response_id))]
    async fn upsert_answer(&self, row: &ArchivedAnswer) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO archived_answers
                (survey_id, response_id, question_title, question_text, answer, submitted_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (survey_id, response_id, question_title) DO UPDATE
            SET answer = EXCLUDED.answer, submitted_at = EXCLUDED.submitted_at
            "#,
        )
        .bind(&row.survey_id)
        .bind(&row.response_id)
        .bind(&row.question_title)
        .bind(&row.question_text)
        .bind(&row.answer)
        .bind(row.submitted_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }
}
