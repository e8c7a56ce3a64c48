pub mod audio;
pub mod limesurvey;
pub mod llm;
pub mod observability;
pub mod persistence;
