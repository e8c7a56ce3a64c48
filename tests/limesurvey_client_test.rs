use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use payesh::application::ports::{SessionKey, SurveyProvider, SurveyProviderError};
use payesh::domain::QuestionType;
use payesh::infrastructure::limesurvey::LimeSurveyClient;

/// Single RemoteControl endpoint dispatching on the `method` field, the way
/// LimeSurvey's JSON-RPC interface does.
async fn start_mock_limesurvey(
    handler: fn(&str, &[Value]) -> Value,
) -> (String, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let app = Router::new().route(
        "/admin/remotecontrol",
        post(move |Json(body): Json<Value>| async move {
            let method = body["method"].as_str().unwrap_or("").to_string();
            let params = body["params"].as_array().cloned().unwrap_or_default();
            Json(handler(&method, &params))
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let endpoint = format!("http://{}/admin/remotecontrol", addr);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (endpoint, shutdown_tx)
}

fn client(endpoint: String) -> LimeSurveyClient {
    LimeSurveyClient::new(endpoint, "admin".to_string(), "secret".to_string())
}

#[tokio::test]
async fn given_valid_credentials_when_acquiring_session_then_key_is_returned() {
    let (endpoint, shutdown_tx) = start_mock_limesurvey(|method, params| match method {
        "get_session_key" => {
            assert_eq!(params[0], json!("admin"));
            assert_eq!(params[1], json!("secret"));
            json!({"result": "session-key-123", "error": null})
        }
        _ => json!({"result": null, "error": "unexpected method"}),
    })
    .await;

    let session = client(endpoint).acquire_session().await.unwrap();

    assert_eq!(session.0, "session-key-123");
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_bad_credentials_when_acquiring_session_then_session_rejected() {
    // LimeSurvey answers 200 with a status object instead of the key string.
    let (endpoint, shutdown_tx) = start_mock_limesurvey(|method, _| match method {
        "get_session_key" => json!({"result": {"status": "Invalid user name or password"}, "error": null}),
        _ => json!({"result": null, "error": "unexpected method"}),
    })
    .await;

    let err = client(endpoint).acquire_session().await.unwrap_err();

    assert!(matches!(err, SurveyProviderError::SessionRejected(_)));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_rpc_error_when_listing_surveys_then_rpc_error_is_surfaced() {
    let (endpoint, shutdown_tx) = start_mock_limesurvey(|method, _| match method {
        "list_surveys" => json!({"result": null, "error": "No surveys found"}),
        _ => json!({"result": null, "error": "unexpected method"}),
    })
    .await;

    let err = client(endpoint)
        .list_surveys(&SessionKey("sk".to_string()))
        .await
        .unwrap_err();

    assert!(matches!(err, SurveyProviderError::Rpc(_)));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_survey_rows_when_listing_surveys_then_numeric_sids_are_stringified() {
    let (endpoint, shutdown_tx) = start_mock_limesurvey(|method, _| match method {
        "list_surveys" => json!({
            "result": [
                {"sid": 123456, "surveyls_title": "پایش سلامت هفتگی"},
                {"sid": "654321", "surveyls_title": "غربالگری فشار خون"},
            ],
            "error": null,
        }),
        _ => json!({"result": null, "error": "unexpected method"}),
    })
    .await;

    let surveys = client(endpoint)
        .list_surveys(&SessionKey("sk".to_string()))
        .await
        .unwrap();

    assert_eq!(surveys.len(), 2);
    assert_eq!(surveys[0].external_id, "123456");
    assert_eq!(surveys[0].title, "پایش سلامت هفتگی");
    assert_eq!(surveys[1].external_id, "654321");
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_question_rows_when_listing_questions_then_type_codes_are_mapped() {
    let (endpoint, shutdown_tx) = start_mock_limesurvey(|method, _| match method {
        "list_questions" => json!({
            "result": [
                {"qid": 10, "title": "BP", "question": "فشار خون دارید؟", "type": "Y"},
                {"qid": 11, "title": "MOOD", "question": "حال عمومی", "type": "L"},
                {"qid": 12, "title": "NOTE", "question": "توضیحات", "type": "T"},
            ],
            "error": null,
        }),
        _ => json!({"result": null, "error": "unexpected method"}),
    })
    .await;

    let questions = client(endpoint)
        .list_questions(&SessionKey("sk".to_string()), "123456")
        .await
        .unwrap();

    assert_eq!(questions.len(), 3);
    assert_eq!(questions[0].qid, "10");
    assert_eq!(questions[0].question_type, QuestionType::YesNo);
    assert_eq!(questions[1].question_type, QuestionType::List);
    assert_eq!(
        questions[2].question_type,
        QuestionType::Other("T".to_string())
    );
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_base64_string_export_when_exporting_then_rows_are_decoded() {
    let (endpoint, shutdown_tx) = start_mock_limesurvey(|method, _| match method {
        "export_responses" => {
            let rows = json!({"responses": [
                {"1": {"id": "1", "submitdate": "2026-08-20 14:30:00", "BP": "Y", "MOOD": null}},
            ]});
            let encoded = BASE64.encode(rows.to_string());
            json!({"result": encoded, "error": null})
        }
        _ => json!({"result": null, "error": "unexpected method"}),
    })
    .await;

    let responses = client(endpoint)
        .export_responses(&SessionKey("sk".to_string()), "123456")
        .await
        .unwrap();

    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].response_id, "1");
    assert!(responses[0].submitted_at.is_some());
    assert_eq!(
        responses[0].answers.get("BP"),
        Some(&Some("Y".to_string()))
    );
    assert_eq!(responses[0].answers.get("MOOD"), Some(&None));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_wrapped_base64_export_when_exporting_then_rows_are_decoded() {
    let (endpoint, shutdown_tx) = start_mock_limesurvey(|method, _| match method {
        "export_responses" => {
            let rows = json!([
                {"id": 7, "submitdate": "2026-08-21 09:00:00", "BP": "N"},
                {"id": 8, "submitdate": null, "BP": "Y"},
            ]);
            let encoded = BASE64.encode(rows.to_string());
            json!({"result": {"responses": encoded}, "error": null})
        }
        _ => json!({"result": null, "error": "unexpected method"}),
    })
    .await;

    let responses = client(endpoint)
        .export_responses(&SessionKey("sk".to_string()), "123456")
        .await
        .unwrap();

    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0].response_id, "7");
    assert_eq!(responses[1].response_id, "8");
    assert!(responses[1].submitted_at.is_none());
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_plain_json_export_when_exporting_then_rows_are_parsed_directly() {
    let (endpoint, shutdown_tx) = start_mock_limesurvey(|method, _| match method {
        "export_responses" => json!({
            "result": {"responses": [
                {"id": "3", "submitdate": "2026-08-22 08:15:00", "BP": "Y"},
            ]},
            "error": null,
        }),
        _ => json!({"result": null, "error": "unexpected method"}),
    })
    .await;

    let responses = client(endpoint)
        .export_responses(&SessionKey("sk".to_string()), "123456")
        .await
        .unwrap();

    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].response_id, "3");
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_answer_options_when_fetching_then_code_to_label_map_is_built() {
    let (endpoint, shutdown_tx) = start_mock_limesurvey(|method, params| match method {
        "get_question_properties" => {
            assert_eq!(params[1], json!("11"));
            json!({
                "result": {"answeroptions": {
                    "A1": {"answer": "خوب", "order": "1"},
                    "A2": {"answer": "متوسط", "order": "2"},
                    "A3": {"answer": "بد", "order": "3"},
                }},
                "error": null,
            })
        }
        _ => json!({"result": null, "error": "unexpected method"}),
    })
    .await;

    let options = client(endpoint)
        .question_answer_options(&SessionKey("sk".to_string()), "11")
        .await
        .unwrap();

    assert_eq!(options.len(), 3);
    assert_eq!(options.get("A1"), Some(&"خوب".to_string()));
    assert_eq!(options.get("A3"), Some(&"بد".to_string()));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_question_without_options_when_fetching_then_map_is_empty() {
    // LimeSurvey reports a placeholder string where the options object would be.
    let (endpoint, shutdown_tx) = start_mock_limesurvey(|method, _| match method {
        "get_question_properties" => json!({
            "result": {"answeroptions": "No available answer options"},
            "error": null,
        }),
        _ => json!({"result": null, "error": "unexpected method"}),
    })
    .await;

    let options = client(endpoint)
        .question_answer_options(&SessionKey("sk".to_string()), "10")
        .await
        .unwrap();

    assert!(options.is_empty());
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_open_session_when_releasing_then_release_succeeds() {
    let (endpoint, shutdown_tx) = start_mock_limesurvey(|method, params| match method {
        "release_session_key" => {
            assert_eq!(params[0], json!("sk"));
            json!({"result": "OK", "error": null})
        }
        _ => json!({"result": null, "error": "unexpected method"}),
    })
    .await;

    let released = client(endpoint)
        .release_session(&SessionKey("sk".to_string()))
        .await
        .unwrap();

    assert!(released);
    shutdown_tx.send(()).ok();
}
