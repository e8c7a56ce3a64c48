mod in_memory;
mod pg_pool;
mod pg_report_repository;
mod pg_response_archive;
mod pg_submission_repository;
mod pg_voice_store;

pub use in_memory::{
    InMemoryReportRepository, InMemoryResponseArchive, InMemorySubmissionRepository,
    InMemoryVoiceStore,
};
pub use pg_pool::create_pool;
pub use pg_report_repository::PgReportRepository;
pub use pg_response_archive::PgResponseArchive;
pub use pg_submission_repository::PgSubmissionRepository;
pub use pg_voice_store::PgVoiceStore;
