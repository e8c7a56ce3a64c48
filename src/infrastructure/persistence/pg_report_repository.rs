use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::instrument;

use crate::application::ports::{ReportRepository, RepositoryError};
use crate::domain::{Question, QuestionId, Report, ReportId};

pub struct PgReportRepository {
    pool: PgPool,
}

impl PgReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn report_from_row(row: &sqlx::postgres::PgRow) -> Report {
    Report {
        id: ReportId::from_uuid(row.get("id")),
        external_id: row.get("external_id"),
        name: row.get("name"),
        description: row.get("description"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl ReportRepository for PgReportRepository {
    #[instrument(skip(self))]
    async fn find_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<Report>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, external_id, name, description, created_at
            FROM reports
            WHERE external_id = $1
            "#,
        )
        .bind(external_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(row.as_ref().map(report_from_row))
    }

    #[instrument(skip(self, report, questions), fields(report_id = %report.id.as_uuid(), questions = questions.len()))]
    async fn create_report_with_questions(
        &self,
        report: &Report,
        questions: &[Question],
    ) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO reports (id, external_id, name, description, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(report.id.as_uuid())
        .bind(&report.external_id)
        .bind(&report.name)
        .bind(&report.description)
        .bind(report.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        for question in questions {
            sqlx::query(
                r#"
                INSERT INTO questions (id, report_id, text, created_at)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(question.id.as_uuid())
            .bind(question.report_id.as_uuid())
            .bind(&question.text)
            .bind(question.created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    #[instrument(skip(self), fields(report_id = %id.as_uuid()))]
    async fn get_report(&self, id: ReportId) -> Result<Option<Report>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, external_id, name, description, created_at
            FROM reports
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(row.as_ref().map(report_from_row))
    }

    #[instrument(skip(self))]
    async fn list_reports(&self) -> Result<Vec<Report>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id, external_id, name, description, created_at
            FROM reports
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(rows.iter().map(report_from_row).collect())
    }

    #[instrument(skip(self), fields(report_id = %report_id.as_uuid()))]
    async fn questions_for_report(
        &self,
        report_id: ReportId,
    ) -> Result<Vec<Question>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id, report_id, text, created_at
            FROM questions
            WHERE report_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(report_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(rows
            .iter()
            .map(|row| Question {
                id: QuestionId::from_uuid(row.get("id")),
                report_id: ReportId::from_uuid(row.get("report_id")),
                text: row.get("text"),
                created_at: row.get("created_at"),
            })
            .collect())
    }
}
