mod mock_survey_provider;
mod rpc_client;

pub use mock_survey_provider::MockSurveyProvider;
pub use rpc_client::LimeSurveyClient;
