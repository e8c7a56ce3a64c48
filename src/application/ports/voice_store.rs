use async_trait::async_trait;

use crate::domain::{SubmissionId, UserId, VoiceNoteId};

use super::RepositoryError;

/// Outcome of a quota-gated store attempt. A quota rejection is not an
/// error: the submission the audio belongs to stays committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceStoreOutcome {
    Stored(VoiceNoteId),
    QuotaExceeded,
}

#[async_trait]
pub trait VoiceStore: Send + Sync {
    /// Store the raw audio for a submission unless the user already holds
    /// the maximum number of voice notes. Implementations must make the
    /// count-then-insert sequence safe under concurrent submissions from
    /// the same user.
    async fn store(
        &self,
        user_id: UserId,
        submission_id: SubmissionId,
        audio: &[u8],
    ) -> Result<VoiceStoreOutcome, RepositoryError>;

    async fn count_for_user(&self, user_id: UserId) -> Result<usize, RepositoryError>;
}
