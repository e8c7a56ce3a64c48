use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::application::ports::{LlmClient, SurveyProvider, TranscriptionEngine};
use crate::application::services::{IngestionError, IngestionOutcome};
use crate::domain::{ReportId, UserId};
use crate::presentation::state::AppState;

use super::ErrorResponse;

#[derive(Serialize)]
pub struct SubmitVoiceResponse {
    pub submission_id: String,
    pub answers: usize,
    pub voice_stored: bool,
}

/// One voice note in, one structured submission out. The upload is fully
/// buffered before the pipeline runs; user identity arrives in the
/// `x-user-id` header (authentication is the gateway's concern).
#[tracing::instrument(skip(state, headers, multipart), fields(report_id = %report_id))]
pub async fn submit_voice_handler<T, L, P>(
    State(state): State<AppState<T, L, P>>,
    Path(report_id): Path<Uuid>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> impl IntoResponse
where
    T: TranscriptionEngine + 'static + ?Sized,
    L: LlmClient + 'static,
    P: SurveyProvider + 'static,
{
    let user_id = match headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<i64>().ok())
    {
        Some(id) => UserId::new(id),
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Missing or invalid x-user-id header".to_string(),
                }),
            )
                .into_response();
        }
    };

    // The audio arrives in the `file` field; anything else is skipped.
    let field = loop {
        match multipart.next_field().await {
            Ok(Some(f)) if f.name() == Some("file") => break f,
            Ok(Some(_)) => continue,
            Ok(None) => {
                tracing::warn!("Voice submission without a file field");
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: "No audio file uploaded".to_string(),
                    }),
                )
                    .into_response();
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to read multipart");
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: "Failed to read upload".to_string(),
                    }),
                )
                    .into_response();
            }
        }
    };

    let filename = field.file_name().unwrap_or("voice.ogg").to_string();
    let data = match field.bytes().await {
        Ok(d) => d,
        Err(e) => {
            tracing::error!(error = %e, "Failed to read audio bytes");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Failed to read upload".to_string(),
                }),
            )
                .into_response();
        }
    };

    tracing::debug!(filename = %filename, bytes = data.len(), "Audio upload received");

    let outcome = state
        .ingestion_service
        .handle(ReportId::from_uuid(report_id), &data, &filename, user_id)
        .await;

    match outcome {
        Ok(IngestionOutcome::Completed {
            submission_id,
            answers,
            voice_stored,
        }) => (
            StatusCode::CREATED,
            Json(SubmitVoiceResponse {
                submission_id: submission_id.as_uuid().to_string(),
                answers,
                voice_stored,
            }),
        )
            .into_response(),
        Ok(IngestionOutcome::TranscriptionFailed) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse {
                error: "Your voice note could not be processed, please try again".to_string(),
            }),
        )
            .into_response(),
        Err(IngestionError::UnknownReport(_)) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Report not found".to_string(),
            }),
        )
            .into_response(),
        Err(IngestionError::Extraction(e)) => {
            tracing::error!(error = %e, "Answer extraction failed");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse {
                    error: "Your voice note could not be processed, please try again".to_string(),
                }),
            )
                .into_response()
        }
        Err(IngestionError::Repository(e)) => {
            // Raw database error text never reaches the user.
            tracing::error!(error = %e, user_id = %user_id, "Database failure during ingestion");
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
