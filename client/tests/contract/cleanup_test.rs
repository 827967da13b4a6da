//! クリーンアップの契約テスト

use model_api_tests::cleanup::delete_all_existing_models;
use model_api_tests::common::error::{ExpectationError, FixtureError, HarnessError};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::support::fixtures::{harness, INFERENCE_DOCUMENT, MODEL_DOCUMENT, VERSION_DOCUMENT};
use crate::support::model_service::FakeModelService;

#[tokio::test]
async fn test_cleanup_on_empty_service() {
    let (server, _service) = FakeModelService::start().await;
    let h = harness(&server);

    let deleted = delete_all_existing_models(&h.client, MODEL_DOCUMENT)
        .await
        .unwrap();

    assert_eq!(deleted, 0);
}

#[tokio::test]
async fn test_cleanup_is_idempotent() {
    let (server, service) = FakeModelService::start().await;
    for name in ["a", "b", "c"] {
        service.seed_model(name, "owner");
    }
    let h = harness(&server);

    let first = delete_all_existing_models(&h.client, VERSION_DOCUMENT)
        .await
        .unwrap();
    let second = delete_all_existing_models(&h.client, INFERENCE_DOCUMENT)
        .await
        .unwrap();

    assert_eq!(first, 3);
    assert_eq!(second, 0);
    assert!(service.model_ids().is_empty());
}

#[tokio::test]
async fn test_cleanup_skips_entries_without_id_and_reports_leftovers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "name": "orphan" }])))
        .mount(&server)
        .await;
    let h = harness(&server);

    let err = delete_all_existing_models(&h.client, MODEL_DOCUMENT)
        .await
        .unwrap_err();

    assert!(
        matches!(
            err,
            HarnessError::Expectation(ExpectationError::ModelsRemaining { remaining: 1 })
        ),
        "unexpected error: {err:?}"
    );
    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.method.as_str() == "GET"));
}

#[tokio::test]
async fn test_cleanup_aborts_on_failed_delete() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": "stuck" }])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/models/stuck"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "detail": "boom" })))
        .mount(&server)
        .await;
    let h = harness(&server);

    let err = delete_all_existing_models(&h.client, MODEL_DOCUMENT)
        .await
        .unwrap_err();

    match err {
        HarnessError::Expectation(ExpectationError::UnexpectedStatus {
            context,
            expected,
            actual,
        }) => {
            assert!(context.contains("stuck"), "unexpected context: {context}");
            assert_eq!(expected, 200);
            assert_eq!(actual, 500);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_cleanup_requires_cleanup_record() {
    let (server, _service) = FakeModelService::start().await;
    let h = harness(&server);
    std::fs::write(h.document_path("bare_data.json"), r#"{"other": {}}"#).unwrap();

    let err = delete_all_existing_models(&h.client, "bare_data.json")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        HarnessError::Fixture(FixtureError::NotFound { .. })
    ));
    assert!(server.received_requests().await.unwrap().is_empty());
}
