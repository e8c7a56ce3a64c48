mod answer_extraction;
mod ingestion_service;
mod reconciliation;
mod response_archive_sync;
mod survey_sync;
mod transcript_correction;

pub use answer_extraction::{
    parse_extraction, placeholder_map, validate_key_set, AnswerExtraction, ExtractionError,
    UNANSWERED,
};
pub use ingestion_service::{IngestionError, IngestionOutcome, IngestionService};
pub use reconciliation::{reconcile, Reconciled};
pub use response_archive_sync::{ArchiveDelta, ResponseArchiveSync};
pub use survey_sync::{SurveyDirectorySync, SyncError, SyncReport};
pub use transcript_correction::TranscriptCorrection;
