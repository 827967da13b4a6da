//! 推論の契約テスト

use std::net::TcpListener;
use std::time::Duration;

use model_api_tests::assertions::expect_status;
use model_api_tests::common::error::{ActionError, ExpectationError};
use model_api_tests::scenario::{provision_model, provision_version, CreatedVersion};

use crate::support::fixtures::{harness, harness_for_url, TestHarness, INFERENCE_DOCUMENT};
use crate::support::model_service::FakeModelService;

const INFER_CASE: &str = "test_inference_with_valid_data";

async fn prepare(h: &TestHarness) -> CreatedVersion {
    let model = provision_model(&h.client, "test_inference_create_model", INFERENCE_DOCUMENT)
        .await
        .unwrap();
    let version = provision_version(
        &h.client,
        "test_inference_create_version",
        INFERENCE_DOCUMENT,
        &model,
    )
    .await
    .unwrap();

    let store = h.client.store();
    store
        .update(INFER_CASE, "model_id", &version.parent_model_id, INFERENCE_DOCUMENT)
        .unwrap();
    store
        .update(INFER_CASE, "version_id", &version.id, INFERENCE_DOCUMENT)
        .unwrap();
    version
}

fn unused_local_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

#[tokio::test]
async fn test_inference_with_valid_data() {
    let (server, _service) = FakeModelService::start().await;
    let h = harness(&server);
    prepare(&h).await;

    let response = h
        .client
        .perform_inference(INFER_CASE, INFERENCE_DOCUMENT)
        .await
        .unwrap();

    expect_status(&response, 200, "Inference").unwrap();
    let body = response.json_value().unwrap();
    assert_eq!(body["model"], "bert-base");
}

#[tokio::test]
async fn test_inference_sends_only_text() {
    let (server, _service) = FakeModelService::start().await;
    let h = harness(&server);
    let version = prepare(&h).await;

    h.client
        .perform_inference(INFER_CASE, INFERENCE_DOCUMENT)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let last = requests.last().unwrap();
    assert_eq!(
        last.url.path(),
        format!(
            "/models/{}/versions/{}/infer",
            version.parent_model_id, version.id
        )
    );
    let sent: serde_json::Value = serde_json::from_slice(&last.body).unwrap();
    assert_eq!(
        sent,
        serde_json::json!({
            "text": "The service answered quickly and the results were accurate."
        })
    );
}

#[tokio::test]
async fn test_inference_timeout_is_reported_as_timeout() {
    let (server, service) = FakeModelService::start().await;
    let h = harness(&server);
    prepare(&h).await;
    service.set_inference_delay(Duration::from_secs(2));

    let err = h
        .client
        .perform_inference_with_timeout(INFER_CASE, INFERENCE_DOCUMENT, Duration::from_millis(200))
        .await
        .unwrap_err();

    assert!(err.is_timeout(), "expected timeout, got {err:?}");
}

#[tokio::test]
async fn test_inference_connection_failure_is_transport_error() {
    let h = harness_for_url(&unused_local_url());
    let store = h.client.store();
    store
        .update(INFER_CASE, "model_id", "m", INFERENCE_DOCUMENT)
        .unwrap();
    store
        .update(INFER_CASE, "version_id", "v", INFERENCE_DOCUMENT)
        .unwrap();

    let err = h
        .client
        .perform_inference(INFER_CASE, INFERENCE_DOCUMENT)
        .await
        .unwrap_err();

    assert!(matches!(err, ActionError::Transport(_)), "unexpected error: {err:?}");
}

#[tokio::test]
async fn test_inference_without_ids_fails_locally() {
    let (server, _service) = FakeModelService::start().await;
    let h = harness(&server);

    let err = h
        .client
        .perform_inference(INFER_CASE, INFERENCE_DOCUMENT)
        .await
        .unwrap_err();

    assert!(matches!(err, ActionError::MissingId { field: "model_id", .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unexpected_inference_status_reports_both_codes() {
    let (server, service) = FakeModelService::start().await;
    let h = harness(&server);
    prepare(&h).await;
    service.set_inference_status(503);

    let response = h
        .client
        .perform_inference(INFER_CASE, INFERENCE_DOCUMENT)
        .await
        .unwrap();

    let err = expect_status(&response, 200, "Inference").unwrap_err();
    assert!(matches!(
        err,
        ExpectationError::UnexpectedStatus {
            expected: 200,
            actual: 503,
            ..
        }
    ));
}
