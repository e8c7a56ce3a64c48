mod health;
mod reports;
mod submit_voice;
mod sync;

use serde::Serialize;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub use health::health_handler;
pub use reports::list_reports_handler;
pub use submit_voice::submit_voice_handler;
pub use sync::{sync_responses_handler, sync_surveys_handler};
