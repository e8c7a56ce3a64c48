mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    DatabaseSettings, LimeSurveySettings, LlmSettings, ServerSettings, Settings,
    TranscriptionProviderSetting, TranscriptionSettings,
};
