mod avanegar_engine;
mod mock_transcription_engine;
mod whisper_engine;

pub use avanegar_engine::AvanegarTranscriptionEngine;
pub use mock_transcription_engine::MockTranscriptionEngine;
pub use whisper_engine::WhisperTranscriptionEngine;
