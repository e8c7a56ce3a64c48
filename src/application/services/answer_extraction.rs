use std::sync::Arc;

use serde_json::{Map, Value};

use crate::application::ports::{LlmClient, LlmClientError};
use crate::domain::Question;

/// Sentinel value marking a question the transcript did not address.
pub const UNANSWERED: &str = "بدون پاسخ";

/// Extracts structured answers from a raw transcript against the question
/// set of one report, via a chat-completion model constrained to a fixed
/// JSON schema.
pub struct AnswerExtraction<L>
where
    L: LlmClient,
{
    llm_client: Arc<L>,
}

impl<L> AnswerExtraction<L>
where
    L: LlmClient,
{
    pub fn new(llm_client: Arc<L>) -> Self {
        Self { llm_client }
    }

    /// Run one extraction. The placeholder map is rebuilt from `questions`
    /// on every call so re-synced question sets are always picked up.
    #[tracing::instrument(skip(self, transcript, questions), fields(questions = questions.len()))]
    pub async fn extract(
        &self,
        transcript: &str,
        questions: &[Question],
    ) -> Result<Map<String, Value>, ExtractionError> {
        let placeholders = placeholder_map(questions);
        let system = build_system_prompt(&placeholders);

        let completion = self
            .llm_client
            .complete(&system, transcript)
            .await
            .map_err(|e| match e {
                LlmClientError::EmptyCompletion => ExtractionError::EmptyCompletion,
                other => ExtractionError::Llm(other),
            })?;

        let extracted = parse_extraction(&completion)?;
        validate_key_set(&placeholders, &extracted)?;

        tracing::debug!(keys = extracted.len(), "Extraction validated");
        Ok(extracted)
    }
}

/// Map every question's text to the unanswered sentinel. Duplicate texts
/// collapse to a single key, which is what the output schema needs.
pub fn placeholder_map(questions: &[Question]) -> Map<String, Value> {
    let mut map = Map::new();
    for question in questions {
        map.insert(
            question.text.clone(),
            Value::String(UNANSWERED.to_string()),
        );
    }
    map
}

fn build_system_prompt(placeholders: &Map<String, Value>) -> String {
    let serialized =
        serde_json::to_string(&Value::Object(placeholders.clone())).unwrap_or_default();
    format!(
        "You extract health information from a daily spoken report.\n\
         You are given a JSON object of questions; every value is the placeholder \"{sentinel}\".\n\
         Wherever the user's text answers a question, replace that placeholder with the answer \
         taken from the text. Leave every question the text does not address unchanged.\n\
         Questions: {serialized}\n\
         Return exactly this JSON object: do not add or remove keys, do not wrap the output in \
         prose or code fences, and do not emit literal \\n markers inside the payload.",
        sentinel = UNANSWERED,
        serialized = serialized,
    )
}

/// Parse a model completion into a JSON object, stripping a code fence
/// defensively if the model ignored the no-fence instruction. The caller
/// still re-validates the key set afterwards.
pub fn parse_extraction(completion: &str) -> Result<Map<String, Value>, ExtractionError> {
    let trimmed = completion.trim();
    if trimmed.is_empty() {
        return Err(ExtractionError::EmptyCompletion);
    }

    let body = strip_code_fence(trimmed);

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ExtractionError::MalformedJson(format!(
            "expected a JSON object, got {}",
            json_type_name(&other)
        ))),
        Err(e) => Err(ExtractionError::MalformedJson(e.to_string())),
    }
}

/// Enforce exact key-set equality between the placeholder map and the
/// extracted object. Extra or missing keys reject the whole completion;
/// partial acceptance is never allowed.
pub fn validate_key_set(
    placeholders: &Map<String, Value>,
    extracted: &Map<String, Value>,
) -> Result<(), ExtractionError> {
    let missing: Vec<String> = placeholders
        .keys()
        .filter(|k| !extracted.contains_key(*k))
        .cloned()
        .collect();
    let unexpected: Vec<String> = extracted
        .keys()
        .filter(|k| !placeholders.contains_key(*k))
        .cloned()
        .collect();

    if missing.is_empty() && unexpected.is_empty() {
        Ok(())
    } else {
        Err(ExtractionError::KeySetMismatch {
            missing,
            unexpected,
        })
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Skip an optional language tag on the opening fence line.
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.trim_start_matches(['\r', '\n']);
    rest.strip_suffix("```").map(str::trim_end).unwrap_or(rest)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("llm: {0}")]
    Llm(#[from] LlmClientError),
    #[error("model returned empty content")]
    EmptyCompletion,
    #[error("malformed extraction payload: {0}")]
    MalformedJson(String),
    #[error("key set mismatch: missing {missing:?}, unexpected {unexpected:?}")]
    KeySetMismatch {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },
}
