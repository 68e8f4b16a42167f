//! HTTP client tests against a fake mail log server.

#![allow(clippy::expect_used)]

mod common;

use maillog_console::api::{Classification, HttpApi, MailLogApi, MessageQuery, save_message};
use maillog_console::config::ClientConfig;
use maillog_console::core::SourceView;
use maillog_console::error::{ApiError, Error};
use tempfile::TempDir;

/// Helper to create a client for a fresh fake server.
async fn create_test_api() -> HttpApi {
    let url = common::spawn_backend().await;
    let config = ClientConfig::new(&url).expect("valid server URL");
    HttpApi::new(config).expect("build client")
}

#[tokio::test]
async fn test_ping_and_config() {
    let api = create_test_api().await;
    api.ping().await.expect("ping failed");

    let config = api.config().await.expect("config failed");
    assert_eq!(config.custom_brand, "Test Relay");
    assert!(config.disable_logs);
    assert!(!config.disable_spam_reporting);
    assert_eq!(config.message_count, 2);
}

#[tokio::test]
async fn test_message_log_query_and_page() {
    let api = create_test_api().await;

    let messages = api
        .message_log(&MessageQuery::search(""))
        .await
        .expect("message_log failed");
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].uuid, "abc-1");
    assert_eq!(messages[0].subject, "Invoice page 1");

    let query = MessageQuery {
        text: "invoice".to_string(),
        page: Some(3),
    };
    let messages = api.message_log(&query).await.expect("paged message_log failed");
    assert_eq!(messages[0].subject, "Invoice page 3");
}

#[tokio::test]
async fn test_message_log_null_and_error() {
    let api = create_test_api().await;

    let messages = api
        .message_log(&MessageQuery::search("nothing"))
        .await
        .expect("null list failed");
    assert!(messages.is_empty());

    let err = api
        .message_log(&MessageQuery::search("locked"))
        .await
        .expect_err("error envelope accepted");
    assert_eq!(err.reason(), "database is locked");
}

#[tokio::test]
async fn test_single_message() {
    let api = create_test_api().await;

    let message = api.message("abc-1").await.expect("message failed");
    assert_eq!(message.subject, "Invoice");
    assert_eq!(message.spam_score, 3);

    let err = api.message("gone").await.expect_err("missing message accepted");
    assert!(matches!(
        err,
        Error::Api(ApiError::Server { ref message }) if message == "Messages was not found"
    ));
}

#[tokio::test]
async fn test_message_sources() {
    let api = create_test_api().await;

    let text = api
        .message_source("abc-1", SourceView::PlainText)
        .await
        .expect("text view failed");
    assert_eq!(text, "Please pay.");

    let html = api
        .message_source("abc-1", SourceView::Html)
        .await
        .expect("html view failed");
    assert_eq!(html, "<p>Please pay.</p>");

    let err = api
        .message_source("abc-1", SourceView::Log)
        .await
        .expect_err("log error envelope accepted");
    assert_eq!(err.reason(), "Logs are disabled");

    let err = api
        .message_source("missing", SourceView::Source)
        .await
        .expect_err("missing source accepted");
    assert!(matches!(err, Error::Api(ApiError::NotFound { ref uuid }) if uuid == "missing"));
}

#[tokio::test]
async fn test_download_to_file() {
    let api = create_test_api().await;
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("abc-1.eml");

    let bytes = save_message(&api, "abc-1", &path)
        .await
        .expect("download failed");
    assert_eq!(bytes, common::RAW_MESSAGE.len());
    assert_eq!(
        std::fs::read_to_string(&path).expect("read download"),
        common::RAW_MESSAGE
    );
}

#[tokio::test]
async fn test_learn_reports_each_upstream() {
    let api = create_test_api().await;

    let report = api
        .learn("abc-1", Classification::Spam)
        .await
        .expect("learn failed");
    assert_eq!(report.requests.len(), 2);
    assert!(report.requests[0].succeeded());
    assert!(!report.requests[1].succeeded());
    assert_eq!(report.requests[1].error.as_deref(), Some("timeout"));

    let err = api
        .learn("other", Classification::Ham)
        .await
        .expect_err("unknown message accepted");
    assert!(matches!(err, Error::Api(ApiError::Status { status: 404 })));
}

#[tokio::test]
async fn test_learn_rejected_by_every_upstream() {
    let api = create_test_api().await;

    let err = api
        .learn("abc-2", Classification::Spam)
        .await
        .expect_err("rejected report accepted");
    assert_eq!(err.reason(), "No successful request was made.");
    match err {
        Error::Api(ApiError::ReportRejected { report, .. }) => {
            let reasons: Vec<_> = report
                .requests
                .iter()
                .map(|attempt| attempt.error.as_deref())
                .collect();
            assert_eq!(reasons, [Some("dial tcp: connection refused"), Some("500")]);
        }
        other => unreachable!("expected a rejected report, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_server() {
    let config = ClientConfig::new("http://127.0.0.1:9").expect("valid server URL");
    let api = HttpApi::new(config).expect("build client");
    let err = api.ping().await.expect_err("ping to closed port succeeded");
    assert!(matches!(err, Error::Api(ApiError::Transport(_))));
}
