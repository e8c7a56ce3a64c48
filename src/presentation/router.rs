use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::application::ports::{LlmClient, SurveyProvider, TranscriptionEngine};
use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    health_handler, list_reports_handler, submit_voice_handler, sync_responses_handler,
    sync_surveys_handler,
};
use crate::presentation::state::AppState;

pub fn create_router<T, L, P>(state: AppState<T, L, P>) -> Router
where
    T: TranscriptionEngine + 'static + ?Sized,
    L: LlmClient + 'static,
    P: SurveyProvider + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/reports", get(list_reports_handler::<T, L, P>))
        .route(
            "/api/v1/reports/{report_id}/voice",
            post(submit_voice_handler::<T, L, P>),
        )
        .route("/api/v1/sync/surveys", post(sync_surveys_handler::<T, L, P>))
        .route(
            "/api/v1/sync/responses/{survey_id}",
            post(sync_responses_handler::<T, L, P>),
        )
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
