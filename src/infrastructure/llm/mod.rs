mod mock_llm_client;
mod openai_chat_client;

pub use mock_llm_client::MockLlmClient;
pub use openai_chat_client::OpenAiChatClient;
