use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::ports::{
    ArchivedAnswer, ReportRepository, RepositoryError, ResponseArchive, SubmissionRepository,
    VoiceStore, VoiceStoreOutcome,
};
use crate::domain::{
    Answer, Question, Report, ReportId, Submission, SubmissionId, UserId, VoiceNote, VoiceNoteId,
    VOICE_QUOTA,
};

/// In-memory stand-ins for the Postgres adapters, used by service and
/// handler tests. State is behind plain mutexes; lock scopes never span an
/// await.
#[derive(Default)]
pub struct InMemoryReportRepository {
    reports: Mutex<Vec<Report>>,
    questions: Mutex<Vec<Question>>,
}

impl InMemoryReportRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report_count(&self) -> usize {
        self.reports.lock().unwrap().len()
    }

    pub fn question_count(&self) -> usize {
        self.questions.lock().unwrap().len()
    }

    /// Seed a report with questions directly, bypassing the sync path.
    pub fn seed(&self, report: Report, questions: Vec<Question>) {
        self.reports.lock().unwrap().push(report);
        self.questions.lock().unwrap().extend(questions);
    }
}

#[async_trait]
impl ReportRepository for InMemoryReportRepository {
    async fn find_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<Report>, RepositoryError> {
        Ok(self
            .reports
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.external_id == external_id)
            .cloned())
    }

    async fn create_report_with_questions(
        &self,
        report: &Report,
        questions: &[Question],
    ) -> Result<(), RepositoryError> {
        self.reports.lock().unwrap().push(report.clone());
        self.questions
            .lock()
            .unwrap()
            .extend(questions.iter().cloned());
        Ok(())
    }

    async fn get_report(&self, id: ReportId) -> Result<Option<Report>, RepositoryError> {
        Ok(self
            .reports
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn list_reports(&self) -> Result<Vec<Report>, RepositoryError> {
        Ok(self.reports.lock().unwrap().clone())
    }

    async fn questions_for_report(
        &self,
        report_id: ReportId,
    ) -> Result<Vec<Question>, RepositoryError> {
        let mut questions: Vec<Question> = self
            .questions
            .lock()
            .unwrap()
            .iter()
            .filter(|q| q.report_id == report_id)
            .cloned()
            .collect();
        questions.sort_by_key(|q| q.created_at);
        Ok(questions)
    }
}

#[derive(Default)]
pub struct InMemorySubmissionRepository {
    submissions: Mutex<Vec<Submission>>,
    answers: Mutex<Vec<Answer>>,
    fail_next: Mutex<bool>,
}

impl InMemorySubmissionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn answers(&self) -> Vec<Answer> {
        self.answers.lock().unwrap().clone()
    }

    pub fn fail_next_create(&self) {
        *self.fail_next.lock().unwrap() = true;
    }
}

#[async_trait]
impl SubmissionRepository for InMemorySubmissionRepository {
    async fn create_submission(
        &self,
        submission: &Submission,
        answers: &[Answer],
    ) -> Result<(), RepositoryError> {
        if std::mem::take(&mut *self.fail_next.lock().unwrap()) {
            return Err(RepositoryError::QueryFailed("injected failure".to_string()));
        }
        self.submissions.lock().unwrap().push(submission.clone());
        self.answers.lock().unwrap().extend(answers.iter().cloned());
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryVoiceStore {
    notes: Mutex<Vec<VoiceNote>>,
}

impl InMemoryVoiceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VoiceStore for InMemoryVoiceStore {
    async fn store(
        &self,
        user_id: UserId,
        submission_id: SubmissionId,
        audio: &[u8],
    ) -> Result<VoiceStoreOutcome, RepositoryError> {
        let mut notes = self.notes.lock().unwrap();
        let held = notes.iter().filter(|n| n.user_id == user_id).count();
        if held >= VOICE_QUOTA {
            return Ok(VoiceStoreOutcome::QuotaExceeded);
        }
        let note = VoiceNote::new(submission_id, user_id, audio.len() as u64);
        let id: VoiceNoteId = note.id;
        notes.push(note);
        Ok(VoiceStoreOutcome::Stored(id))
    }

    async fn count_for_user(&self, user_id: UserId) -> Result<usize, RepositoryError> {
        Ok(self
            .notes
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.user_id == user_id)
            .count())
    }
}

#[derive(Default)]
pub struct InMemoryResponseArchive {
    rows: Mutex<HashMap<(String, String, String), ArchivedAnswer>>,
}

impl InMemoryResponseArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> Vec<ArchivedAnswer> {
        self.rows.lock().unwrap().values().cloned().collect()
    }
}

#[async_trait]
impl ResponseArchive for InMemoryResponseArchive {
    async fn count_for_survey(&self, survey_id: &str) -> Result<usize, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .keys()
            .filter(|(sid, _, _)| sid == survey_id)
            .count())
    }

    async fn upsert_answer(&self, row: &ArchivedAnswer) -> Result<(), RepositoryError> {
        let key = (
            row.survey_id.clone(),
            row.response_id.clone(),
            row.question_title.clone(),
        );
        self.rows.lock().unwrap().insert(key, row.clone());
        Ok(())
    }
}
