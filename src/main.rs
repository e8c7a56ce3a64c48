use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use payesh::application::ports::{
    ReportRepository, ResponseArchive, SubmissionRepository, TranscriptionEngine, VoiceStore,
};
use payesh::application::services::{IngestionService, ResponseArchiveSync, SurveyDirectorySync};
use payesh::infrastructure::audio::{AvanegarTranscriptionEngine, WhisperTranscriptionEngine};
use payesh::infrastructure::limesurvey::LimeSurveyClient;
use payesh::infrastructure::llm::OpenAiChatClient;
use payesh::infrastructure::observability::{init_tracing, TracingConfig};
use payesh::infrastructure::persistence::{
    create_pool, PgReportRepository, PgResponseArchive, PgSubmissionRepository, PgVoiceStore,
};
use payesh::presentation::{create_router, AppState, Settings, TranscriptionProviderSetting};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env();
    init_tracing(TracingConfig::default(), settings.server.port);

    let pool = create_pool(&settings.database.url, settings.database.max_connections)
        .await
        .map_err(|e| anyhow::anyhow!("database: {}", e))?;
    if settings.database.run_migrations {
        sqlx::migrate!().run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    let report_repository: Arc<dyn ReportRepository> =
        Arc::new(PgReportRepository::new(pool.clone()));
    let submission_repository: Arc<dyn SubmissionRepository> =
        Arc::new(PgSubmissionRepository::new(pool.clone()));
    let voice_store: Arc<dyn VoiceStore> =
        Arc::new(PgVoiceStore::new(pool.clone()));
    let response_archive: Arc<dyn ResponseArchive> =
        Arc::new(PgResponseArchive::new(pool.clone()));

    let transcription: Arc<dyn TranscriptionEngine> = match settings.transcription.provider {
        TranscriptionProviderSetting::Whisper => Arc::new(WhisperTranscriptionEngine::new(
            settings.transcription.api_key.clone(),
            settings.transcription.base_url.clone(),
            settings.transcription.model.clone(),
            settings.transcription.language.clone(),
        )),
        TranscriptionProviderSetting::Avanegar => Arc::new(AvanegarTranscriptionEngine::new(
            settings.transcription.avanegar_endpoint.clone(),
        )),
    };

    let llm_client = Arc::new(OpenAiChatClient::new(
        settings.llm.api_key.clone(),
        settings.llm.base_url.clone(),
        settings.llm.chat_model.clone(),
    ));

    let survey_provider = Arc::new(LimeSurveyClient::new(
        settings.limesurvey.endpoint.clone(),
        settings.limesurvey.username.clone(),
        settings.limesurvey.password.clone(),
    ));

    let ingestion_service = Arc::new(IngestionService::new(
        Arc::clone(&transcription),
        Arc::clone(&llm_client),
        Arc::clone(&report_repository),
        Arc::clone(&submission_repository),
        Arc::clone(&voice_store),
    ));

    let survey_sync = Arc::new(SurveyDirectorySync::new(
        Arc::clone(&survey_provider),
        Arc::clone(&report_repository),
    ));

    let archive_sync = Arc::new(ResponseArchiveSync::new(
        Arc::clone(&survey_provider),
        response_archive,
    ));

    let state = AppState {
        ingestion_service,
        survey_sync,
        archive_sync,
        report_repository,
    };

    let router = create_router(state);

    let addr = SocketAddr::new(settings.server.host.parse()?, settings.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
