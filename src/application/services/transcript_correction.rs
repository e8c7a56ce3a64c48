use std::sync::Arc;

use crate::application::ports::LlmClient;

const CORRECTION_PROMPT: &str = "\
You receive Persian text transcribed from speech. It may contain spelling \
mistakes and usually lacks punctuation between sentences.\n\
Your tasks:\n\
1. Fix spelling mistakes, choosing the structurally closest valid Persian word.\n\
2. Detect sentence boundaries from context and end each sentence with a period.\n\
3. Preserve the original meaning and style.\n\
Return only the corrected text, without any commentary.";

/// Cleans up a raw speech-to-text transcript before extraction: Persian
/// spelling fixes and sentence punctuation, via the same chat model the
/// extraction uses.
pub struct TranscriptCorrection<L>
where
    L: LlmClient,
{
    llm_client: Arc<L>,
}

impl<L> TranscriptCorrection<L>
where
    L: LlmClient,
{
    pub fn new(llm_client: Arc<L>) -> Self {
        Self { llm_client }
    }

    /// Best-effort correction: any model failure or blank completion falls
    /// back to the raw transcript, so this step can never lose a voice
    /// note that transcribed fine.
    #[tracing::instrument(skip(self, transcript), fields(chars = transcript.len()))]
    pub async fn correct(&self, transcript: &str) -> String {
        match self.llm_client.complete(CORRECTION_PROMPT, transcript).await {
            Ok(corrected) => {
                let corrected = corrected.trim();
                if corrected.is_empty() {
                    transcript.to_string()
                } else {
                    tracing::debug!(chars = corrected.len(), "Transcript corrected");
                    corrected.to_string()
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Transcript correction failed; keeping raw transcript");
                transcript.to_string()
            }
        }
    }
}
