mod llm_client;
mod report_repository;
mod repository_error;
mod response_archive;
mod submission_repository;
mod survey_provider;
mod transcription_engine;
mod voice_store;

pub use llm_client::{LlmClient, LlmClientError};
pub use report_repository::ReportRepository;
pub use repository_error::RepositoryError;
pub use response_archive::{ArchivedAnswer, ResponseArchive};
pub use submission_repository::SubmissionRepository;
pub use survey_provider::{
    RemoteQuestion, RemoteResponse, RemoteSurvey, SessionKey, SurveyProvider, SurveyProviderError,
};
pub use transcription_engine::{TranscriptionEngine, TranscriptionError};
pub use voice_store::{VoiceStore, VoiceStoreOutcome};
