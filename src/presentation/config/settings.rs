use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub llm: LlmSettings,
    pub transcription: TranscriptionSettings,
    pub limesurvey: LimeSurveySettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    pub api_key: String,
    pub base_url: String,
    pub chat_model: String,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptionProviderSetting {
    Whisper,
    Avanegar,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionSettings {
    pub provider: TranscriptionProviderSetting,
    pub api_key: String,
    pub base_url: String,
    pub model: Option<String>,
    pub language: Option<String>,
    /// Full endpoint of the Avanegar-style provider, used when `provider`
    /// is `avanegar`.
    pub avanegar_endpoint: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimeSurveySettings {
    pub endpoint: String,
    pub username: String,
    pub password: String,
}

impl Settings {
    /// Assemble settings from environment variables, with local-friendly
    /// defaults for everything but credentials.
    pub fn from_env() -> Self {
        Self {
            server: ServerSettings {
                host: env_or("SERVER_HOST", "0.0.0.0"),
                port: std::env::var("SERVER_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(3000),
            },
            database: DatabaseSettings {
                url: env_or("DATABASE_URL", "postgres://localhost/payesh"),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(5),
                run_migrations: std::env::var("DATABASE_RUN_MIGRATIONS")
                    .map(|v| v.to_lowercase() != "false")
                    .unwrap_or(true),
            },
            llm: LlmSettings {
                api_key: std::env::var("LLM_API_KEY").unwrap_or_default(),
                base_url: env_or("LLM_BASE_URL", "https://api.openai.com/v1"),
                chat_model: env_or("LLM_CHAT_MODEL", "gpt-4o-mini"),
            },
            transcription: TranscriptionSettings {
                provider: match env_or("TRANSCRIPTION_PROVIDER", "whisper").as_str() {
                    "avanegar" => TranscriptionProviderSetting::Avanegar,
                    _ => TranscriptionProviderSetting::Whisper,
                },
                api_key: std::env::var("TRANSCRIPTION_API_KEY")
                    .or_else(|_| std::env::var("LLM_API_KEY"))
                    .unwrap_or_default(),
                base_url: env_or("TRANSCRIPTION_BASE_URL", "https://api.openai.com/v1"),
                model: std::env::var("TRANSCRIPTION_MODEL").ok(),
                language: std::env::var("TRANSCRIPTION_LANGUAGE").ok(),
                avanegar_endpoint: std::env::var("AVANEGAR_ENDPOINT").unwrap_or_default(),
            },
            limesurvey: LimeSurveySettings {
                endpoint: std::env::var("LIMESURVEY_URL").unwrap_or_default(),
                username: std::env::var("LIMESURVEY_USERNAME").unwrap_or_default(),
                password: std::env::var("LIMESURVEY_PASSWORD").unwrap_or_default(),
            },
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
