//! シナリオのセットアップ手順
//!
//! モデル作成 → バージョン作成のように依存する手順を実行し、
//! 生成されたIDをfixtureドキュメントに書き戻したうえで型付きの値として返す。

use model_api_common::{
    error::HarnessResult,
    protocol::{Model, ModelVersion},
};
use tracing::info;
use uuid::Uuid;

use crate::assertions::{expect_echoed, expect_status, require_response_field};
use crate::client::ModelApiClient;

/// 作成済みモデル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedModel {
    /// モデルID
    pub id: String,
    /// モデル名
    pub name: String,
    /// オーナー
    pub owner: Option<String>,
}

/// 作成済みモデルバージョン
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedVersion {
    /// バージョンID
    pub id: String,
    /// 親モデルID
    pub parent_model_id: String,
    /// バージョン名
    pub name: String,
    /// Hugging Faceモデル名
    pub hugging_face_model: String,
}

/// 存在しないモデルIDを生成する
pub fn random_model_id() -> String {
    Uuid::new_v4().to_string()
}

/// モデルを作成して検証し、IDをレコードの`id`に書き戻す
///
/// ステータスを先に検証するため、JSONでないエラーボディでも
/// ステータス不一致として報告される。
pub async fn provision_model(
    client: &ModelApiClient,
    case: &str,
    document: &str,
) -> HarnessResult<CreatedModel> {
    let record = client.store().get(case, document)?;
    let expected = record.expected_status_code()?;
    let name = record.require_str("name")?.to_string();
    let owner = record.str_field("owner").map(str::to_string);

    let response = client.create_model(case, document).await?;
    expect_status(&response, expected, "Create model")?;
    let created: Model = response.json()?;
    let id = require_response_field(created.id, "id", &response)?;

    expect_echoed("name", &name, created.name.as_deref())?;
    if let Some(owner) = owner.as_deref() {
        expect_echoed("owner", owner, created.owner.as_deref())?;
    }

    info!("Model created successfully with ID: {}.", id);
    client.store().update(case, "id", &id, document)?;

    Ok(CreatedModel { id, name, owner })
}

/// 親モデルの下にバージョンを作成して検証し、IDをレコードに書き戻す
///
/// 作成前にレコードの`id`へ親モデルIDを書き込み、作成後に
/// `model_id`（レスポンスの`parent_model_id`）と`version_id`を書き戻す。
pub async fn provision_version(
    client: &ModelApiClient,
    case: &str,
    document: &str,
    model: &CreatedModel,
) -> HarnessResult<CreatedVersion> {
    client.store().update(case, "id", &model.id, document)?;
    let record = client.store().get(case, document)?;
    let expected = record.expected_status_code()?;
    let name = record.require_str("name")?.to_string();
    let hugging_face_model = record.require_str("hugging_face_model")?.to_string();

    let response = client.create_model_version(case, document).await?;
    expect_status(&response, expected, "Add model version")?;
    let created: ModelVersion = response.json()?;
    let id = require_response_field(created.id, "id", &response)?;
    let parent_model_id =
        require_response_field(created.parent_model_id, "parent_model_id", &response)?;

    client.store().update(case, "model_id", &parent_model_id, document)?;
    client.store().update(case, "version_id", &id, document)?;

    expect_echoed("name", &name, created.name.as_deref())?;
    expect_echoed(
        "hugging_face_model",
        &hugging_face_model,
        created.hugging_face_model.as_deref(),
    )?;

    info!(
        "Model version created successfully with ID: {} for model ID: {}.",
        id, parent_model_id
    );
    Ok(CreatedVersion {
        id,
        parent_model_id,
        name,
        hugging_face_model,
    })
}
