use std::sync::Arc;

use payesh::application::ports::{
    ReportRepository, SubmissionRepository, VoiceStore, VoiceStoreOutcome,
};
use payesh::application::services::{IngestionError, IngestionOutcome, IngestionService};
use payesh::domain::{Question, Report, ReportId, SubmissionId, UserId};
use payesh::infrastructure::audio::MockTranscriptionEngine;
use payesh::infrastructure::llm::MockLlmClient;
use payesh::infrastructure::persistence::{
    InMemoryReportRepository, InMemorySubmissionRepository, InMemoryVoiceStore,
};

const COMPLETION: &str =
    r#"{"فشار خون؟": "خوبه", "سردرد داری؟": "ندارم", "تب داری؟": "بدون پاسخ"}"#;

struct Harness {
    service: IngestionService<MockTranscriptionEngine, MockLlmClient>,
    reports: Arc<InMemoryReportRepository>,
    submissions: Arc<InMemorySubmissionRepository>,
    voices: Arc<InMemoryVoiceStore>,
    report: Report,
}

fn harness(transcription: MockTranscriptionEngine, llm: MockLlmClient) -> Harness {
    let reports = Arc::new(InMemoryReportRepository::new());
    let submissions = Arc::new(InMemorySubmissionRepository::new());
    let voices = Arc::new(InMemoryVoiceStore::new());

    let report = Report::new("100001".to_string(), "گزارش روزانه".to_string(), String::new());
    let questions = vec![
        Question::new(report.id, "فشار خون؟".to_string()),
        Question::new(report.id, "سردرد داری؟".to_string()),
        Question::new(report.id, "تب داری؟".to_string()),
    ];
    reports.seed(report.clone(), questions);

    let service = IngestionService::new(
        Arc::new(transcription),
        Arc::new(llm),
        Arc::clone(&reports) as Arc<dyn ReportRepository>,
        Arc::clone(&submissions) as Arc<dyn SubmissionRepository>,
        Arc::clone(&voices) as Arc<dyn VoiceStore>,
    );

    Harness {
        service,
        reports,
        submissions,
        voices,
        report,
    }
}

#[tokio::test]
async fn given_valid_voice_note_when_ingesting_then_submission_answers_and_audio_are_stored() {
    let h = harness(
        MockTranscriptionEngine::returning("فشار خونم خوبه، سردرد ندارم"),
        MockLlmClient::returning(COMPLETION),
    );
    let user = UserId::new(42);

    let outcome = h
        .service
        .handle(h.report.id, b"ogg bytes", "voice.ogg", user)
        .await
        .expect("ingestion should succeed");

    match outcome {
        IngestionOutcome::Completed {
            answers,
            voice_stored,
            submission_id,
        } => {
            assert_eq!(answers, 3);
            assert!(voice_stored);
            let stored = h.submissions.submissions();
            assert_eq!(stored.len(), 1);
            assert_eq!(stored[0].id, submission_id);
            assert_eq!(h.submissions.answers().len(), 3);
            assert_eq!(h.voices.count_for_user(user).await.unwrap(), 1);
        }
        other => panic!("expected Completed, got {other:?}"),
    }
}

#[tokio::test]
async fn given_transcription_failure_when_ingesting_then_soft_failure_and_no_submission() {
    let h = harness(
        MockTranscriptionEngine::failing(),
        MockLlmClient::returning(COMPLETION),
    );

    let outcome = h
        .service
        .handle(h.report.id, b"bad audio", "voice.ogg", UserId::new(1))
        .await
        .expect("transcription failure is a soft outcome");

    assert_eq!(outcome, IngestionOutcome::TranscriptionFailed);
    assert!(h.submissions.submissions().is_empty());
    assert_eq!(h.voices.count_for_user(UserId::new(1)).await.unwrap(), 0);
}

#[tokio::test]
async fn given_malformed_extraction_when_ingesting_then_typed_error_and_no_submission() {
    let h = harness(
        MockTranscriptionEngine::returning("متن"),
        MockLlmClient::returning("not json at all"),
    );

    let err = h
        .service
        .handle(h.report.id, b"audio", "voice.ogg", UserId::new(1))
        .await
        .unwrap_err();

    assert!(matches!(err, IngestionError::Extraction(_)));
    assert!(h.submissions.submissions().is_empty());
}

#[tokio::test]
async fn given_unknown_report_when_ingesting_then_unknown_report_error() {
    let h = harness(
        MockTranscriptionEngine::returning("متن"),
        MockLlmClient::returning(COMPLETION),
    );

    let err = h
        .service
        .handle(ReportId::new(), b"audio", "voice.ogg", UserId::new(1))
        .await
        .unwrap_err();

    assert!(matches!(err, IngestionError::UnknownReport(_)));
}

#[tokio::test]
async fn given_user_at_voice_quota_when_ingesting_then_answers_commit_but_audio_is_dropped() {
    let h = harness(
        MockTranscriptionEngine::returning("فشار خونم خوبه"),
        MockLlmClient::returning(COMPLETION),
    );
    let user = UserId::new(9);

    for _ in 0..10 {
        let outcome = h
            .voices
            .store(user, SubmissionId::new(), b"old audio")
            .await
            .unwrap();
        assert!(matches!(outcome, VoiceStoreOutcome::Stored(_)));
    }

    let outcome = h
        .service
        .handle(h.report.id, b"new audio", "voice.ogg", user)
        .await
        .unwrap();

    match outcome {
        IngestionOutcome::Completed { voice_stored, .. } => {
            assert!(!voice_stored);
            assert_eq!(h.submissions.submissions().len(), 1);
            // ceiling holds
            assert_eq!(h.voices.count_for_user(user).await.unwrap(), 10);
        }
        other => panic!("expected Completed, got {other:?}"),
    }
}

#[tokio::test]
async fn given_submission_store_failure_when_ingesting_then_repository_error_and_nothing_stored() {
    let h = harness(
        MockTranscriptionEngine::returning("متن"),
        MockLlmClient::returning(COMPLETION),
    );
    h.submissions.fail_next_create();

    let err = h
        .service
        .handle(h.report.id, b"audio", "voice.ogg", UserId::new(1))
        .await
        .unwrap_err();

    assert!(matches!(err, IngestionError::Repository(_)));
    assert!(h.submissions.submissions().is_empty());
    assert_eq!(h.voices.count_for_user(UserId::new(1)).await.unwrap(), 0);
    // question set untouched
    assert_eq!(h.reports.question_count(), 3);
}
