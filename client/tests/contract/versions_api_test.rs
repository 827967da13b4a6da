//! モデルバージョン作成・削除の契約テスト

use model_api_tests::assertions::{expect_detail_contains, expect_status};
use model_api_tests::common::error::{ActionError, ExpectationError, HarnessError};
use model_api_tests::scenario::{provision_model, provision_version, random_model_id};
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, ResponseTemplate};

use crate::support::fixtures::{harness, VERSION_DOCUMENT};
use crate::support::model_service::FakeModelService;

const ADD_CASE: &str = "test_add_model_version_with_valid_data";
const DELETE_CASE: &str = "test_delete_model_version_with_valid_id";

#[tokio::test]
async fn test_add_model_version_with_valid_data() {
    let (server, service) = FakeModelService::start().await;
    let h = harness(&server);

    let model = provision_model(&h.client, ADD_CASE, VERSION_DOCUMENT)
        .await
        .unwrap();
    let version = provision_version(&h.client, ADD_CASE, VERSION_DOCUMENT, &model)
        .await
        .unwrap();

    assert_eq!(version.parent_model_id, model.id);
    assert_eq!(version.name, "sentiment-v1");
    assert_eq!(
        version.hugging_face_model,
        "distilbert-base-uncased-finetuned-sst-2-english"
    );
    assert_eq!(service.version_ids(&model.id), vec![version.id.clone()]);

    let record = h.client.store().get(ADD_CASE, VERSION_DOCUMENT).unwrap();
    assert_eq!(record.id_field("id"), Some(model.id.clone()));
    assert_eq!(record.id_field("model_id"), Some(model.id));
    assert_eq!(record.id_field("version_id"), Some(version.id));
}

#[tokio::test]
async fn test_delete_model_version_with_valid_id() {
    let (server, service) = FakeModelService::start().await;
    let h = harness(&server);
    let store = h.client.store();
    let model = provision_model(&h.client, ADD_CASE, VERSION_DOCUMENT)
        .await
        .unwrap();
    let version = provision_version(&h.client, ADD_CASE, VERSION_DOCUMENT, &model)
        .await
        .unwrap();
    store
        .update(DELETE_CASE, "model_id", &version.parent_model_id, VERSION_DOCUMENT)
        .unwrap();
    store
        .update(DELETE_CASE, "version_id", &version.id, VERSION_DOCUMENT)
        .unwrap();

    let response = h
        .client
        .delete_model_version(DELETE_CASE, VERSION_DOCUMENT)
        .await
        .unwrap();

    expect_status(&response, 200, "Delete model version").unwrap();
    assert!(service.version_ids(&model.id).is_empty());
    assert_eq!(service.model_ids(), vec![model.id]);
}

#[tokio::test]
async fn test_create_version_without_model_id_fails_locally() {
    let (server, _service) = FakeModelService::start().await;
    let h = harness(&server);

    let err = h
        .client
        .create_model_version(ADD_CASE, VERSION_DOCUMENT)
        .await
        .unwrap_err();

    assert!(matches!(err, ActionError::MissingId { field: "id", .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_version_without_version_id_fails_locally() {
    let (server, _service) = FakeModelService::start().await;
    let h = harness(&server);
    h.client
        .store()
        .update(DELETE_CASE, "model_id", "some-model", VERSION_DOCUMENT)
        .unwrap();

    let err = h
        .client
        .delete_model_version(DELETE_CASE, VERSION_DOCUMENT)
        .await
        .unwrap_err();

    assert!(matches!(err, ActionError::MissingId { field: "version_id", .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_version_for_unknown_model() {
    let (server, _service) = FakeModelService::start().await;
    let h = harness(&server);
    h.client
        .store()
        .update(ADD_CASE, "id", random_model_id(), VERSION_DOCUMENT)
        .unwrap();

    let response = h
        .client
        .create_model_version(ADD_CASE, VERSION_DOCUMENT)
        .await
        .unwrap();

    expect_status(&response, 404, "Create version for unknown model").unwrap();
    expect_detail_contains(&response.json_value().unwrap(), "Model not found").unwrap();
}

#[tokio::test]
async fn test_provision_version_reports_status_mismatch_for_plain_text_error() {
    let (server, service) = FakeModelService::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/models/[^/]+/versions$"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .with_priority(1)
        .mount(&server)
        .await;
    let h = harness(&server);

    let model = provision_model(&h.client, ADD_CASE, VERSION_DOCUMENT)
        .await
        .unwrap();
    let err = provision_version(&h.client, ADD_CASE, VERSION_DOCUMENT, &model)
        .await
        .unwrap_err();

    assert!(
        matches!(
            err,
            HarnessError::Expectation(ExpectationError::UnexpectedStatus {
                expected: 201,
                actual: 500,
                ..
            })
        ),
        "unexpected error: {err:?}"
    );
    assert!(service.version_ids(&model.id).is_empty());
    let record = h.client.store().get(ADD_CASE, VERSION_DOCUMENT).unwrap();
    assert_eq!(record.id_field("version_id"), None);
}
