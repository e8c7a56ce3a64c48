use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use payesh::application::ports::{LlmClient, LlmClientError};
use payesh::infrastructure::llm::OpenAiChatClient;

async fn start_mock_chat_server(
    response_status: u16,
    response_body: &'static str,
) -> (String, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let app = Router::new().route(
        "/chat/completions",
        post(move || async move {
            let status = axum::http::StatusCode::from_u16(response_status).unwrap();
            (
                status,
                [("content-type", "application/json")],
                response_body,
            )
                .into_response()
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (base_url, shutdown_tx)
}

#[tokio::test]
async fn given_valid_completion_when_completing_then_returns_first_choice_content() {
    let body = r#"{"choices": [{"message": {"content": "{\"فشار خون\": \"بله\"}"}}]}"#;
    let (base_url, shutdown_tx) = start_mock_chat_server(200, body).await;

    let client = OpenAiChatClient::new(
        "test-key".to_string(),
        base_url,
        "gpt-4o-mini".to_string(),
    );

    let result = client.complete("extract answers", "transcript goes here").await;

    assert_eq!(result.unwrap(), r#"{"فشار خون": "بله"}"#);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_server_error_when_completing_then_api_request_failed() {
    let (base_url, shutdown_tx) = start_mock_chat_server(500, "internal error").await;

    let client = OpenAiChatClient::new("test-key".to_string(), base_url, "gpt-4o-mini".to_string());

    let err = client.complete("system", "user").await.unwrap_err();

    assert!(matches!(err, LlmClientError::ApiRequestFailed(_)));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_rate_limit_status_when_completing_then_rate_limited() {
    let (base_url, shutdown_tx) = start_mock_chat_server(429, "slow down").await;

    let client = OpenAiChatClient::new("test-key".to_string(), base_url, "gpt-4o-mini".to_string());

    let err = client.complete("system", "user").await.unwrap_err();

    assert!(matches!(err, LlmClientError::RateLimited));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_blank_content_when_completing_then_empty_completion() {
    let body = r#"{"choices": [{"message": {"content": "   "}}]}"#;
    let (base_url, shutdown_tx) = start_mock_chat_server(200, body).await;

    let client = OpenAiChatClient::new("test-key".to_string(), base_url, "gpt-4o-mini".to_string());

    let err = client.complete("system", "user").await.unwrap_err();

    assert!(matches!(err, LlmClientError::EmptyCompletion));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_no_choices_when_completing_then_empty_completion() {
    let body = r#"{"choices": []}"#;
    let (base_url, shutdown_tx) = start_mock_chat_server(200, body).await;

    let client = OpenAiChatClient::new("test-key".to_string(), base_url, "gpt-4o-mini".to_string());

    let err = client.complete("system", "user").await.unwrap_err();

    assert!(matches!(err, LlmClientError::EmptyCompletion));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_malformed_payload_when_completing_then_invalid_response() {
    let (base_url, shutdown_tx) = start_mock_chat_server(200, "not json at all").await;

    let client = OpenAiChatClient::new("test-key".to_string(), base_url, "gpt-4o-mini".to_string());

    let err = client.complete("system", "user").await.unwrap_err();

    assert!(matches!(err, LlmClientError::InvalidResponse(_)));
    shutdown_tx.send(()).ok();
}
