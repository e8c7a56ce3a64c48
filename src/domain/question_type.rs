use std::collections::HashMap;

/// Question type as reported by the survey provider's one-letter codes.
/// Drives answer-code translation during response archiving; codes we do
/// not recognize translate as identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionType {
    YesNo,
    List,
    Other(String),
}

impl QuestionType {
    pub fn from_code(code: &str) -> Self {
        match code {
            "Y" => QuestionType::YesNo,
            "L" => QuestionType::List,
            other => QuestionType::Other(other.to_string()),
        }
    }

    /// Translate a stored answer code into its human-readable label.
    ///
    /// Yes/No questions map the provider's `Y`/`N` codes; list questions
    /// look the code up in the provider-supplied `{code: label}` options.
    /// Anything unresolvable passes through as the raw code.
    pub fn translate_answer<'a>(&self, raw: &'a str, options: &HashMap<String, String>) -> String {
        match self {
            QuestionType::YesNo => match raw {
                "Y" => "بله".to_string(),
                "N" => "خیر".to_string(),
                other => other.to_string(),
            },
            QuestionType::List => options
                .get(raw)
                .cloned()
                .unwrap_or_else(|| raw.to_string()),
            QuestionType::Other(_) => raw.to_string(),
        }
    }
}
