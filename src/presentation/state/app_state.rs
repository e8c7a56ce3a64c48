use std::sync::Arc;

use crate::application::ports::{LlmClient, ReportRepository, SurveyProvider, TranscriptionEngine};
use crate::application::services::{IngestionService, ResponseArchiveSync, SurveyDirectorySync};

pub struct AppState<T: ?Sized, L, P>
where
    T: TranscriptionEngine,
    L: LlmClient,
    P: SurveyProvider,
{
    pub ingestion_service: Arc<IngestionService<T, L>>,
    pub survey_sync: Arc<SurveyDirectorySync<P>>,
    pub archive_sync: Arc<ResponseArchiveSync<P>>,
    pub report_repository: Arc<dyn ReportRepository>,
}

impl<T: ?Sized, L, P> Clone for AppState<T, L, P>
where
    T: TranscriptionEngine,
    L: LlmClient,
    P: SurveyProvider,
{
    fn clone(&self) -> Self {
        Self {
            ingestion_service: Arc::clone(&self.ingestion_service),
            survey_sync: Arc::clone(&self.survey_sync),
            archive_sync: Arc::clone(&self.archive_sync),
            report_repository: Arc::clone(&self.report_repository),
        }
    }
}
