use std::collections::HashMap;
use std::sync::Arc;

use crate::application::ports::{
    ArchivedAnswer, RemoteQuestion, ResponseArchive, SessionKey, SurveyProvider,
};
use crate::domain::QuestionType;

use super::answer_extraction::UNANSWERED;
use super::survey_sync::SyncError;

/// Export bookkeeping fields that are not question answers.
const BOOKKEEPING_KEYS: [&str; 4] = ["id", "submitdate", "lastpage", "startlanguage"];

/// Result of archiving one survey's completed responses: how many rows
/// the archive gained, so an operator can tell "nothing new" from "N new
/// answers ingested".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveDelta {
    pub new_rows: usize,
    pub total_rows: usize,
}

/// The richer sync path: pulls completed remote responses and upserts them
/// into the generic answer archive, translating enumerated answer codes to
/// human-readable labels first.
pub struct ResponseArchiveSync<P>
where
    P: SurveyProvider,
{
    provider: Arc<P>,
    archive: Arc<dyn ResponseArchive>,
}

impl<P> ResponseArchiveSync<P>
where
    P: SurveyProvider,
{
    pub fn new(provider: Arc<P>, archive: Arc<dyn ResponseArchive>) -> Self {
        Self { provider, archive }
    }

    #[tracing::instrument(skip(self))]
    pub async fn run_for_survey(&self, survey_id: &str) -> Result<ArchiveDelta, SyncError> {
        let session = self.provider.acquire_session().await?;

        let result = self.archive_survey(&session, survey_id).await;

        if let Err(e) = self.provider.release_session(&session).await {
            tracing::error!(error = %e, "Failed to release survey provider session");
        }

        result
    }

    async fn archive_survey(
        &self,
        session: &SessionKey,
        survey_id: &str,
    ) -> Result<ArchiveDelta, SyncError> {
        let responses = self.provider.export_responses(session, survey_id).await?;
        let questions = self.provider.list_questions(session, survey_id).await?;

        let questions_by_title: HashMap<&str, &RemoteQuestion> =
            questions.iter().map(|q| (q.title.as_str(), q)).collect();

        // Answer options are fetched once per list-type question, not per
        // response row.
        let mut list_options: HashMap<String, HashMap<String, String>> = HashMap::new();
        for question in &questions {
            if question.question_type == QuestionType::List {
                let options = self
                    .provider
                    .question_answer_options(session, &question.qid)
                    .await?;
                list_options.insert(question.title.clone(), options);
            }
        }

        let before = self.archive.count_for_survey(survey_id).await?;
        let empty_options = HashMap::new();

        for response in &responses {
            for (title, raw_answer) in &response.answers {
                if BOOKKEEPING_KEYS.contains(&title.as_str()) {
                    continue;
                }
                let Some(question) = questions_by_title.get(title.as_str()) else {
                    continue;
                };

                let answer = match raw_answer {
                    Some(raw) => {
                        let options = list_options.get(title).unwrap_or(&empty_options);
                        question.question_type.translate_answer(raw, options)
                    }
                    None => UNANSWERED.to_string(),
                };

                self.archive
                    .upsert_answer(&ArchivedAnswer {
                        survey_id: survey_id.to_string(),
                        response_id: response.response_id.clone(),
                        question_title: title.clone(),
                        question_text: question.text.clone(),
                        answer,
                        submitted_at: response.submitted_at,
                    })
                    .await?;
            }
        }

        let after = self.archive.count_for_survey(survey_id).await?;
        let delta = ArchiveDelta {
            new_rows: after.saturating_sub(before),
            total_rows: after,
        };

        tracing::info!(
            survey_id = %survey_id,
            responses = responses.len(),
            new_rows = delta.new_rows,
            "Archived completed responses"
        );

        Ok(delta)
    }
}
