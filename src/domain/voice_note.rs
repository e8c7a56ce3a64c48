use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{SubmissionId, UserId};

/// Hard ceiling on stored voice notes per user, counted over existing rows
/// at write time.
pub const VOICE_QUOTA: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoiceNoteId(Uuid);

impl VoiceNoteId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for VoiceNoteId {
    fn default() -> Self {
        Self::new()
    }
}

/// The stored raw audio artifact backing a submission. Storage is gated by
/// [`VOICE_QUOTA`]; the structured answers are not.
#[derive(Debug, Clone)]
pub struct VoiceNote {
    pub id: VoiceNoteId,
    pub submission_id: SubmissionId,
    pub user_id: UserId,
    pub byte_len: u64,
    pub created_at: DateTime<Utc>,
}

impl VoiceNote {
    pub fn new(submission_id: SubmissionId, user_id: UserId, byte_len: u64) -> Self {
        Self {
            id: VoiceNoteId::new(),
            submission_id,
            user_id,
            byte_len,
            created_at: Utc::now(),
        }
    }
}
