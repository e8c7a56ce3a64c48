use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{ReportId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmissionId(Uuid);

impl SubmissionId {
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

impl Default for SubmissionId {
    fn default() -> Self {
        Self::new()
    }
}

/// One user's single act of answering a report. Exactly one submission is
/// created per successful ingestion run; it exists only if reconciliation
/// committed.
#[derive(Debug, Clone)]
pub struct Submission {
    pub id: SubmissionId,
    pub report_id: ReportId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl Submission {
    pub fn new(report_id: ReportId, user_id: UserId) -> Self {
        Self {
            id: SubmissionId::new(),
            report_id,
            user_id,
            created_at: Utc::now(),
        }
    }
}
