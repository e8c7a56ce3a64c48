use std::collections::HashMap;
use std::sync::Arc;

use payesh::application::ports::{
    RemoteQuestion, RemoteSurvey, ReportRepository, SurveyProviderError,
};
use payesh::application::services::{SurveyDirectorySync, SyncError};
use payesh::domain::QuestionType;
use payesh::infrastructure::limesurvey::MockSurveyProvider;
use payesh::infrastructure::persistence::InMemoryReportRepository;

fn remote_question(title: &str, text: &str) -> RemoteQuestion {
    RemoteQuestion {
        qid: format!("q-{title}"),
        title: title.to_string(),
        text: text.to_string(),
        question_type: QuestionType::Other("T".to_string()),
    }
}

fn provider_with_one_survey() -> MockSurveyProvider {
    let mut provider = MockSurveyProvider::new();
    provider.surveys = vec![RemoteSurvey {
        external_id: "100001".to_string(),
        title: "گزارش روزانه".to_string(),
    }];
    provider.questions = HashMap::from([(
        "100001".to_string(),
        vec![
            remote_question("BP", "فشار خون؟"),
            remote_question("HA", "سردرد داری؟"),
        ],
    )]);
    provider
}

#[tokio::test]
async fn given_new_remote_survey_when_syncing_then_report_and_questions_imported() {
    let provider = Arc::new(provider_with_one_survey());
    let repository = Arc::new(InMemoryReportRepository::new());
    let sync = SurveyDirectorySync::new(Arc::clone(&provider), Arc::clone(&repository) as Arc<dyn ReportRepository>);

    let report = sync.run().await.expect("sync should succeed");

    assert_eq!(report.imported_reports, 1);
    assert_eq!(report.imported_questions, 2);
    assert_eq!(report.skipped, 0);
    assert_eq!(repository.report_count(), 1);
    assert_eq!(repository.question_count(), 2);
}

#[tokio::test]
async fn given_unchanged_remote_set_when_syncing_twice_then_no_duplicates() {
    let provider = Arc::new(provider_with_one_survey());
    let repository = Arc::new(InMemoryReportRepository::new());
    let sync = SurveyDirectorySync::new(Arc::clone(&provider), Arc::clone(&repository) as Arc<dyn ReportRepository>);

    sync.run().await.unwrap();
    let reports_after_first = repository.report_count();
    let questions_after_first = repository.question_count();

    let second = sync.run().await.unwrap();

    assert_eq!(repository.report_count(), reports_after_first);
    assert_eq!(repository.question_count(), questions_after_first);
    assert_eq!(second.imported_reports, 0);
    assert_eq!(second.skipped, 1);
}

#[tokio::test]
async fn given_successful_sync_then_session_released_exactly_once() {
    let provider = Arc::new(provider_with_one_survey());
    let repository = Arc::new(InMemoryReportRepository::new());
    let sync = SurveyDirectorySync::new(Arc::clone(&provider), Arc::clone(&repository) as Arc<dyn ReportRepository>);

    sync.run().await.unwrap();

    assert_eq!(provider.acquired_count(), 1);
    assert_eq!(provider.released_sessions().len(), 1);
}

#[tokio::test]
async fn given_mid_import_failure_when_syncing_then_session_still_released() {
    let mut provider = provider_with_one_survey();
    provider.fail_list_questions = true;
    let provider = Arc::new(provider);
    let repository = Arc::new(InMemoryReportRepository::new());
    let sync = SurveyDirectorySync::new(Arc::clone(&provider), Arc::clone(&repository) as Arc<dyn ReportRepository>);

    let err = sync.run().await.unwrap_err();

    assert!(matches!(err, SyncError::Provider(_)));
    assert_eq!(provider.released_sessions().len(), 1);
    assert_eq!(repository.report_count(), 0);
}

#[tokio::test]
async fn given_rejected_credentials_when_syncing_then_fatal_without_further_calls() {
    let mut provider = MockSurveyProvider::new();
    provider.reject_session = true;
    let provider = Arc::new(provider);
    let repository = Arc::new(InMemoryReportRepository::new());
    let sync = SurveyDirectorySync::new(Arc::clone(&provider), Arc::clone(&repository) as Arc<dyn ReportRepository>);

    let err = sync.run().await.unwrap_err();

    assert!(matches!(
        err,
        SyncError::Provider(SurveyProviderError::SessionRejected(_))
    ));
    // no session existed, so none to release
    assert_eq!(provider.acquired_count(), 0);
    assert!(provider.released_sessions().is_empty());
}
