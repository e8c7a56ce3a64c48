use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::application::ports::{LlmClient, SurveyProvider, TranscriptionEngine};
use crate::application::services::SyncError;
use crate::presentation::state::AppState;

use super::ErrorResponse;

#[derive(Serialize)]
pub struct SyncSurveysResponse {
    pub imported_reports: usize,
    pub imported_questions: usize,
    pub skipped: usize,
}

#[derive(Serialize)]
pub struct SyncResponsesResponse {
    pub new_rows: usize,
    pub total_rows: usize,
}

/// Trigger the idempotent survey directory import.
#[tracing::instrument(skip(state))]
pub async fn sync_surveys_handler<T, L, P>(
    State(state): State<AppState<T, L, P>>,
) -> impl IntoResponse
where
    T: TranscriptionEngine + 'static + ?Sized,
    L: LlmClient + 'static,
    P: SurveyProvider + 'static,
{
    match state.survey_sync.run().await {
        Ok(report) => (
            StatusCode::OK,
            Json(SyncSurveysResponse {
                imported_reports: report.imported_reports,
                imported_questions: report.imported_questions,
                skipped: report.skipped,
            }),
        )
            .into_response(),
        Err(e) => sync_error_response(e),
    }
}

/// Trigger the archive sync for one survey; the response's delta lets an
/// operator tell "nothing new" from "N new answers".
#[tracing::instrument(skip(state))]
pub async fn sync_responses_handler<T, L, P>(
    State(state): State<AppState<T, L, P>>,
    Path(survey_id): Path<String>,
) -> impl IntoResponse
where
    T: TranscriptionEngine + 'static + ?Sized,
    L: LlmClient + 'static,
    P: SurveyProvider + 'static,
{
    match state.archive_sync.run_for_survey(&survey_id).await {
        Ok(delta) => (
            StatusCode::OK,
            Json(SyncResponsesResponse {
                new_rows: delta.new_rows,
                total_rows: delta.total_rows,
            }),
        )
            .into_response(),
        Err(e) => sync_error_response(e),
    }
}

fn sync_error_response(e: SyncError) -> axum::response::Response {
    tracing::error!(error = %e, "Survey sync failed");
    (
        StatusCode::BAD_GATEWAY,
        Json(ErrorResponse {
            error: "Survey provider sync failed".to_string(),
        }),
    )
        .into_response()
}
