use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::application::ports::{
    RemoteQuestion, RemoteResponse, RemoteSurvey, SessionKey, SurveyProvider, SurveyProviderError,
};
use crate::domain::QuestionType;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// LimeSurvey RemoteControl client: one endpoint, JSON-RPC-style envelope
/// with a positional `params` array and a numeric `id`.
pub struct LimeSurveyClient {
    client: reqwest::Client,
    endpoint: String,
    username: String,
    password: String,
}

#[derive(Deserialize)]
struct RpcEnvelope {
    result: Option<Value>,
    error: Option<Value>,
}

#[derive(Deserialize)]
struct SurveyRow {
    sid: Value,
    surveyls_title: String,
}

#[derive(Deserialize)]
struct QuestionRow {
    qid: Value,
    title: String,
    question: String,
    #[serde(rename = "type", default)]
    question_type: Option<String>,
}

#[derive(Deserialize)]
struct AnswerOption {
    answer: Option<String>,
}

impl LimeSurveyClient {
    pub fn new(endpoint: String, username: String, password: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            username,
            password,
        }
    }

    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, SurveyProviderError> {
        let payload = json!({
            "method": method,
            "params": params,
            "id": 1,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .timeout(REQUEST_TIMEOUT)
            .json(&payload)
            .send()
            .await
            .map_err(|e| SurveyProviderError::ApiRequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(SurveyProviderError::ApiRequestFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let envelope: RpcEnvelope = response
            .json()
            .await
            .map_err(|e| SurveyProviderError::InvalidPayload(format!("envelope: {}", e)))?;

        if let Some(error) = envelope.error {
            if !error.is_null() {
                return Err(SurveyProviderError::Rpc(error.to_string()));
            }
        }

        envelope
            .result
            .ok_or_else(|| SurveyProviderError::InvalidPayload("missing result".to_string()))
    }
}

#[async_trait]
impl SurveyProvider for LimeSurveyClient {
    async fn acquire_session(&self) -> Result<SessionKey, SurveyProviderError> {
        let result = self
            .call(
                "get_session_key",
                vec![json!(self.username), json!(self.password)],
            )
            .await?;

        // A credential failure still answers 200; the result is then an
        // object carrying a status message instead of the key string.
        match result {
            Value::String(key) if !key.is_empty() => Ok(SessionKey(key)),
            other => Err(SurveyProviderError::SessionRejected(other.to_string())),
        }
    }

    async fn list_surveys(
        &self,
        session: &SessionKey,
    ) -> Result<Vec<RemoteSurvey>, SurveyProviderError> {
        let result = self
            .call(
                "list_surveys",
                vec![json!(session.0), json!(self.username)],
            )
            .await?;

        let rows: Vec<SurveyRow> = serde_json::from_value(result)
            .map_err(|e| SurveyProviderError::InvalidPayload(format!("surveys: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|row| RemoteSurvey {
                external_id: scalar_to_string(&row.sid),
                title: row.surveyls_title,
            })
            .collect())
    }

    async fn list_questions(
        &self,
        session: &SessionKey,
        external_id: &str,
    ) -> Result<Vec<RemoteQuestion>, SurveyProviderError> {
        let result = self
            .call(
                "list_questions",
                vec![json!(session.0), json!(external_id)],
            )
            .await?;

        let rows: Vec<QuestionRow> = serde_json::from_value(result)
            .map_err(|e| SurveyProviderError::InvalidPayload(format!("questions: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|row| RemoteQuestion {
                qid: scalar_to_string(&row.qid),
                title: row.title,
                text: row.question,
                question_type: QuestionType::from_code(row.question_type.as_deref().unwrap_or("")),
            })
            .collect())
    }

    async fn export_responses(
        &self,
        session: &SessionKey,
        external_id: &str,
    ) -> Result<Vec<RemoteResponse>, SurveyProviderError> {
        let result = self
            .call(
                "export_responses",
                vec![
                    json!(session.0),
                    json!(external_id),
                    json!("json"),
                    json!("fa"),
                    json!("complete"),
                ],
            )
            .await?;

        let decoded = decode_export_payload(result)?;
        parse_exported_responses(decoded)
    }

    async fn question_answer_options(
        &self,
        session: &SessionKey,
        qid: &str,
    ) -> Result<HashMap<String, String>, SurveyProviderError> {
        let result = self
            .call(
                "get_question_properties",
                vec![json!(session.0), json!(qid), json!(["answeroptions"])],
            )
            .await?;

        let options = result
            .get("answeroptions")
            .cloned()
            .unwrap_or(Value::Null);
        // Questions without options report a placeholder string here.
        let Value::Object(entries) = options else {
            return Ok(HashMap::new());
        };

        let mut map = HashMap::new();
        for (code, details) in entries {
            if let Ok(option) = serde_json::from_value::<AnswerOption>(details) {
                if let Some(label) = option.answer {
                    map.insert(code, label);
                }
            }
        }
        Ok(map)
    }

    async fn release_session(&self, session: &SessionKey) -> Result<bool, SurveyProviderError> {
        self.call("release_session_key", vec![json!(session.0)])
            .await
            .map(|_| true)
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `export_responses` may return its payload base64-encoded, either as a
/// bare string or wrapped in `{"responses": <b64>}`.
fn decode_export_payload(result: Value) -> Result<Value, SurveyProviderError> {
    let encoded = match &result {
        Value::String(s) => s.clone(),
        Value::Object(map) => match map.get("responses") {
            Some(Value::String(s)) => s.clone(),
            _ => return Ok(result),
        },
        _ => return Ok(result),
    };

    let bytes = BASE64
        .decode(encoded.trim())
        .map_err(|e| SurveyProviderError::InvalidPayload(format!("base64: {}", e)))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| SurveyProviderError::InvalidPayload(format!("export json: {}", e)))
}

fn parse_exported_responses(decoded: Value) -> Result<Vec<RemoteResponse>, SurveyProviderError> {
    let rows = match decoded {
        Value::Object(mut map) => match map.remove("responses") {
            Some(Value::Array(rows)) => rows,
            Some(other) => {
                return Err(SurveyProviderError::InvalidPayload(format!(
                    "unexpected responses payload: {}",
                    other
                )))
            }
            None => Vec::new(),
        },
        Value::Array(rows) => rows,
        other => {
            return Err(SurveyProviderError::InvalidPayload(format!(
                "unexpected export payload: {}",
                other
            )))
        }
    };

    let mut responses = Vec::with_capacity(rows.len());
    for row in rows {
        // Some LimeSurvey versions wrap each row as {"<response_id>": {..}}.
        let fields = match row {
            Value::Object(map) if map.len() == 1 && map.values().all(Value::is_object) => {
                match map.into_iter().next() {
                    Some((_, Value::Object(inner))) => inner,
                    _ => continue,
                }
            }
            Value::Object(map) => map,
            _ => continue,
        };

        let response_id = fields
            .get("id")
            .map(scalar_to_string)
            .unwrap_or_else(|| "unknown".to_string());
        let submitted_at = fields
            .get("submitdate")
            .and_then(Value::as_str)
            .and_then(parse_submit_date);

        let mut answers = HashMap::new();
        for (title, value) in fields {
            let answer = match value {
                Value::Null => None,
                Value::String(s) => Some(s),
                other => Some(other.to_string()),
            };
            answers.insert(title, answer);
        }

        responses.push(RemoteResponse {
            response_id,
            submitted_at,
            answers,
        });
    }

    Ok(responses)
}

fn parse_submit_date(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}
