use serde_json::{Map, Value};

use crate::domain::{Answer, Question, Report, Submission, UserId};

/// Result of matching extracted answers back to a report's questions:
/// the submission row, its answers, and how many extracted keys matched
/// nothing (schema drift between extractor and store).
#[derive(Debug)]
pub struct Reconciled {
    pub submission: Submission,
    pub answers: Vec<Answer>,
    pub dropped: usize,
}

/// Match extracted (question-text, value) pairs to persisted questions and
/// build the submission aggregate. Pure; the caller persists the result in
/// one transaction.
///
/// Duplicate question text within a report is tolerated: the most recently
/// created match wins. Extracted keys with no matching question are dropped
/// silently but counted for observability.
pub fn reconcile(
    report: &Report,
    extracted: &Map<String, Value>,
    user_id: UserId,
    questions: &[Question],
) -> Reconciled {
    let submission = Submission::new(report.id, user_id);

    let mut answers = Vec::with_capacity(extracted.len());
    let mut dropped = 0usize;

    for (question_text, value) in extracted {
        // questions arrive oldest-first; rev() makes the newest duplicate win
        let matched = questions
            .iter()
            .rev()
            .find(|q| q.text == *question_text);

        match matched {
            Some(question) => {
                let text = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                answers.push(Answer::new(submission.id, question.id, text));
            }
            None => {
                dropped += 1;
                tracing::warn!(
                    report_id = %report.id.as_uuid(),
                    question_text = %question_text,
                    "Extracted key matches no question; dropping"
                );
            }
        }
    }

    if dropped > 0 {
        tracing::info!(
            report_id = %report.id.as_uuid(),
            dropped = dropped,
            "Reconciliation dropped unmatched extracted keys"
        );
    }

    Reconciled {
        submission,
        answers,
        dropped,
    }
}
