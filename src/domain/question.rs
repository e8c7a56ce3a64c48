use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::ReportId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuestionId(Uuid);

impl QuestionId {
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

impl Default for QuestionId {
    fn default() -> Self {
        Self::new()
    }
}

/// One prompt belonging to exactly one report. Question text is free text
/// and may repeat within a report.
#[derive(Debug, Clone)]
pub struct Question {
    pub id: QuestionId,
    pub report_id: ReportId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Question {
    pub fn new(report_id: ReportId, text: String) -> Self {
        Self {
            id: QuestionId::new(),
            report_id,
            text,
            created_at: Utc::now(),
        }
    }
}
