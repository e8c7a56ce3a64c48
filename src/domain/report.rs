use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReportId(Uuid);

impl ReportId {
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

impl Default for ReportId {
    fn default() -> Self {
        Self::new()
    }
}

/// One survey definition imported from the remote provider, keyed by the
/// provider's stable survey identifier.
#[derive(Debug, Clone)]
pub struct Report {
    pub id: ReportId,
    pub external_id: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Report {
    pub fn new(external_id: String, name: String, description: String) -> Self {
        Self {
            id: ReportId::new(),
            external_id,
            name,
            description,
            created_at: Utc::now(),
        }
    }
}
