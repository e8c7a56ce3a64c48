use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::application::ports::{LlmClient, SurveyProvider, TranscriptionEngine};
use crate::presentation::state::AppState;

use super::ErrorResponse;

#[derive(Serialize)]
pub struct ReportSummary {
    pub id: String,
    pub external_id: String,
    pub name: String,
    pub description: String,
}

pub async fn list_reports_handler<T, L, P>(
    State(state): State<AppState<T, L, P>>,
) -> impl IntoResponse
where
    T: TranscriptionEngine + 'static + ?Sized,
    L: LlmClient + 'static,
    P: SurveyProvider + 'static,
{
    match state.report_repository.list_reports().await {
        Ok(reports) => {
            let summaries: Vec<ReportSummary> = reports
                .into_iter()
                .map(|r| ReportSummary {
                    id: r.id.as_uuid().to_string(),
                    external_id: r.external_id,
                    name: r.name,
                    description: r.description,
                })
                .collect();
            (StatusCode::OK, Json(summaries)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to list reports");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Something went wrong, please try again".to_string(),
                }),
            )
                .into_response()
        }
    }
}
