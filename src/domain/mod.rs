mod answer;
mod question;
mod question_type;
mod report;
mod submission;
mod user_id;
mod voice_note;

pub use answer::{Answer, AnswerId};
pub use question::{Question, QuestionId};
pub use question_type::QuestionType;
pub use report::{Report, ReportId};
pub use submission::{Submission, SubmissionId};
pub use user_id::UserId;
pub use voice_note::{VoiceNote, VoiceNoteId, VOICE_QUOTA};
