use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::instrument;

use crate::application::ports::{RepositoryError, VoiceStore, VoiceStoreOutcome};
use crate::domain::{SubmissionId, UserId, VoiceNote, VOICE_QUOTA};

pub struct PgVoiceStore {
    pool: PgPool,
}

impl PgVoiceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VoiceStore for PgVoiceStore {
    #[instrument(skip(self, audio), fields(user_id = %user_id, submission_id = %submission_id.as_uuid(), bytes = audio.len()))]
    async fn store(
        &self,
        user_id: UserId,
        submission_id: SubmissionId,
        audio: &[u8],
    ) -> Result<VoiceStoreOutcome, RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        // Serialize concurrent stores for one user so two submissions
        // cannot both pass the count check before either inserts.
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(user_id.as_i64())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM voice_notes WHERE user_id = $1")
            .bind(user_id.as_i64())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?
            .get("n");

        if count as usize >= VOICE_QUOTA {
            tx.rollback()
                .await
                .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
            return Ok(VoiceStoreOutcome::QuotaExceeded);
        }

        let note = VoiceNote::new(submission_id, user_id, audio.len() as u64);
        sqlx::query(
            r#"
            INSERT INTO voice_notes (id, submission_id, user_id, audio, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(note.id.as_uuid())
        .bind(note.submission_id.as_uuid())
        .bind(note.user_id.as_i64())
        .bind(audio)
        .bind(note.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(VoiceStoreOutcome::Stored(note.id))
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn count_for_user(&self, user_id: UserId) -> Result<usize, RepositoryError> {
        let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM voice_notes WHERE user_id = $1")
            .bind(user_id.as_i64())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?
            .get("n");

        Ok(count as usize)
    }
}
