use std::sync::Arc;

use crate::application::ports::{
    LlmClient, ReportRepository, RepositoryError, SubmissionRepository, TranscriptionEngine,
    VoiceStore, VoiceStoreOutcome,
};
use crate::domain::{Report, ReportId, SubmissionId, UserId};

use super::answer_extraction::{AnswerExtraction, ExtractionError};
use super::reconciliation::reconcile;
use super::transcript_correction::TranscriptCorrection;

/// Terminal state of one ingestion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestionOutcome {
    /// Extraction and reconciliation committed. `voice_stored` is false
    /// when the per-user quota rejected the audio blob; the submission
    /// stays committed either way.
    Completed {
        submission_id: SubmissionId,
        answers: usize,
        voice_stored: bool,
    },
    /// The transcription provider rejected the audio. Soft failure:
    /// nothing was persisted, the boundary tells the user to retry.
    TranscriptionFailed,
}

/// Orchestrates one voice submission end to end: transcribe, extract,
/// reconcile, then attempt quota-gated audio storage. Strictly sequential;
/// reconciliation only begins after extraction fully succeeded, so a
/// failed run never leaves a partial submission behind.
pub struct IngestionService<T: ?Sized, L>
where
    T: TranscriptionEngine,
    L: LlmClient,
{
    transcription: Arc<T>,
    correction: TranscriptCorrection<L>,
    extraction: AnswerExtraction<L>,
    report_repository: Arc<dyn ReportRepository>,
    submission_repository: Arc<dyn SubmissionRepository>,
    voice_store: Arc<dyn VoiceStore>,
}

impl<T: ?Sized, L> IngestionService<T, L>
where
    T: TranscriptionEngine,
    L: LlmClient,
{
    pub fn new(
        transcription: Arc<T>,
        llm_client: Arc<L>,
        report_repository: Arc<dyn ReportRepository>,
        submission_repository: Arc<dyn SubmissionRepository>,
        voice_store: Arc<dyn VoiceStore>,
    ) -> Self {
        Self {
            transcription,
            correction: TranscriptCorrection::new(Arc::clone(&llm_client)),
            extraction: AnswerExtraction::new(llm_client),
            report_repository,
            submission_repository,
            voice_store,
        }
    }

    #[tracing::instrument(skip(self, audio), fields(report_id = %report_id.as_uuid(), user_id = %user_id, bytes = audio.len()))]
    pub async fn handle(
        &self,
        report_id: ReportId,
        audio: &[u8],
        filename_hint: &str,
        user_id: UserId,
    ) -> Result<IngestionOutcome, IngestionError> {
        let report = self
            .report_repository
            .get_report(report_id)
            .await?
            .ok_or(IngestionError::UnknownReport(report_id))?;

        let transcript = match self.transcription.transcribe(audio, filename_hint).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "Transcription failed; aborting run");
                return Ok(IngestionOutcome::TranscriptionFailed);
            }
        };

        // Speech-to-text output arrives without punctuation; the cleanup
        // pass is best-effort and keeps the raw transcript on failure.
        let transcript = self.correction.correct(&transcript).await;

        // Question set is re-read on every run; re-sync can grow it
        // between submissions.
        let questions = self.report_repository.questions_for_report(report.id).await?;
        let extracted = self.extraction.extract(&transcript, &questions).await?;

        let reconciled = reconcile(&report, &extracted, user_id, &questions);
        self.submission_repository
            .create_submission(&reconciled.submission, &reconciled.answers)
            .await?;

        let voice_stored = self.store_voice(&report, user_id, reconciled.submission.id, audio).await;

        tracing::info!(
            submission_id = %reconciled.submission.id.as_uuid(),
            answers = reconciled.answers.len(),
            dropped = reconciled.dropped,
            voice_stored = voice_stored,
            "Voice submission ingested"
        );

        Ok(IngestionOutcome::Completed {
            submission_id: reconciled.submission.id,
            answers: reconciled.answers.len(),
            voice_stored,
        })
    }

    /// Audio storage runs after the submission committed and never rolls
    /// it back; a quota rejection or store error only loses the raw blob.
    async fn store_voice(
        &self,
        report: &Report,
        user_id: UserId,
        submission_id: SubmissionId,
        audio: &[u8],
    ) -> bool {
        match self.voice_store.store(user_id, submission_id, audio).await {
            Ok(VoiceStoreOutcome::Stored(_)) => true,
            Ok(VoiceStoreOutcome::QuotaExceeded) => {
                tracing::info!(
                    report_id = %report.id.as_uuid(),
                    user_id = %user_id,
                    "Voice quota reached; answers kept, audio dropped"
                );
                false
            }
            Err(e) => {
                tracing::error!(
                    report_id = %report.id.as_uuid(),
                    user_id = %user_id,
                    error = %e,
                    "Voice store failed; answers kept"
                );
                false
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IngestionError {
    #[error("unknown report {}", .0.as_uuid())]
    UnknownReport(ReportId),
    #[error("extraction: {0}")]
    Extraction(#[from] ExtractionError),
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
}
