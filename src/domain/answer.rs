use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{QuestionId, SubmissionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnswerId(Uuid);

impl AnswerId {
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

impl Default for AnswerId {
    fn default() -> Self {
        Self::new()
    }
}

/// One resolved (question, value) pair within a submission. The referenced
/// question always belongs to the same report as the submission.
#[derive(Debug, Clone)]
pub struct Answer {
    pub id: AnswerId,
    pub submission_id: SubmissionId,
    pub question_id: QuestionId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Answer {
    pub fn new(submission_id: SubmissionId, question_id: QuestionId, text: String) -> Self {
        Self {
            id: AnswerId::new(),
            submission_id,
            question_id,
            text,
            created_at: Utc::now(),
        }
    }
}
