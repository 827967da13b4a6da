//! モデル管理サービスのHTTPアクション層
//!
//! 各アクションはfixtureレコードから必要なフィールドを読み取り、
//! リクエストを1回だけ発行して生のレスポンスを返す。
//! ステータスコードやボディの判定は呼び出し側の責務。

use std::time::Duration;

use model_api_common::{
    config::HarnessConfig,
    error::{ActionError, ActionResult},
    fixture::FixtureStore,
    protocol::{CreateModelRequest, CreateVersionRequest, InferenceRequest},
    records::{DeleteModelCase, DeleteVersionCase, InferenceCase, ModelCase, VersionCase},
};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::info;

fn map_reqwest_error(err: reqwest::Error) -> ActionError {
    if err.is_timeout() {
        ActionError::Timeout(err.to_string())
    } else {
        ActionError::Transport(err.to_string())
    }
}

/// バッファ済みのレスポンス
///
/// アクション内でログ出力した後も、呼び出し側でボディを何度でも読み直せる。
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    body: String,
}

impl ApiResponse {
    /// ステータスとボディからレスポンスを作成する
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    async fn read(response: reqwest::Response) -> ActionResult<Self> {
        let status = response.status();
        let body = response.text().await.map_err(map_reqwest_error)?;
        Ok(Self { status, body })
    }

    /// HTTPステータス
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// HTTPステータスコード
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// ボディ文字列
    pub fn text(&self) -> &str {
        &self.body
    }

    /// ボディをJSON値として読む（空ボディはnull）
    pub fn json_value(&self) -> ActionResult<Value> {
        if self.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&self.body).map_err(|e| ActionError::InvalidBody(e.to_string()))
    }

    /// ボディを型付きで読む
    pub fn json<T: DeserializeOwned>(&self) -> ActionResult<T> {
        serde_json::from_str(&self.body).map_err(|e| ActionError::InvalidBody(e.to_string()))
    }
}

/// モデル管理サービスのクライアント
#[derive(Debug, Clone)]
pub struct ModelApiClient {
    base_url: String,
    store: FixtureStore,
    inference_timeout: Duration,
    http_client: reqwest::Client,
}

impl ModelApiClient {
    /// 設定からクライアントを作成する
    pub fn new(config: &HarnessConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            store: FixtureStore::new(config.fixture_dir.clone()),
            inference_timeout: config.inference_timeout,
            http_client: reqwest::Client::new(),
        }
    }

    /// 環境変数の設定からクライアントを作成する
    pub fn from_env() -> Self {
        Self::new(&HarnessConfig::from_env())
    }

    /// 接続先ベースURL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 使用中のfixtureストア
    pub fn store(&self) -> &FixtureStore {
        &self.store
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// モデル一覧を取得
    pub async fn list_models(&self) -> ActionResult<ApiResponse> {
        info!("Fetching all existing models");
        let response = self
            .http_client
            .get(self.url("/models"))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        ApiResponse::read(response).await
    }

    /// モデルを作成
    pub async fn create_model(&self, case: &str, document: &str) -> ActionResult<ApiResponse> {
        let data: ModelCase = self.store.get_as(case, document)?;
        let body = CreateModelRequest {
            name: data.name,
            owner: data.owner,
        };

        info!(
            "Creating a model with the name: {} and owner: {}",
            body.name.as_deref().unwrap_or("<missing>"),
            body.owner.as_deref().unwrap_or("<missing>")
        );
        let response = self
            .http_client
            .post(self.url("/models"))
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let response = ApiResponse::read(response).await?;
        info!(status = response.status_code(), "response is: {}", response.text());
        Ok(response)
    }

    /// モデルバージョンを作成
    ///
    /// レコードの`id`を親モデルIDとして扱う。
    pub async fn create_model_version(
        &self,
        case: &str,
        document: &str,
    ) -> ActionResult<ApiResponse> {
        let data: VersionCase = self.store.get_as(case, document)?;
        let model_id = data.id.ok_or_else(|| ActionError::MissingId {
            case: case.to_string(),
            field: "id",
        })?;
        let body = CreateVersionRequest {
            name: data.name,
            hugging_face_model: data.hugging_face_model,
        };

        info!(
            "Creating a model version for model ID: {} with the name: {} and Hugging Face model: {}",
            model_id, body.name, body.hugging_face_model
        );
        let response = self
            .http_client
            .post(self.url(&format!("/models/{}/versions", model_id)))
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let response = ApiResponse::read(response).await?;
        info!(status = response.status_code(), "response is: {}", response.text());
        Ok(response)
    }

    /// 設定済みのタイムアウトで推論を実行
    pub async fn perform_inference(&self, case: &str, document: &str) -> ActionResult<ApiResponse> {
        self.perform_inference_with_timeout(case, document, self.inference_timeout)
            .await
    }

    /// 指定したタイムアウトで推論を実行
    ///
    /// タイムアウトは`ActionError::Timeout`、それ以外の通信失敗は
    /// `ActionError::Transport`として返す。
    pub async fn perform_inference_with_timeout(
        &self,
        case: &str,
        document: &str,
        timeout: Duration,
    ) -> ActionResult<ApiResponse> {
        let data: InferenceCase = self.store.get_as(case, document)?;
        let model_id = data.model_id.ok_or_else(|| ActionError::MissingId {
            case: case.to_string(),
            field: "model_id",
        })?;
        let version_id = data.version_id.ok_or_else(|| ActionError::MissingId {
            case: case.to_string(),
            field: "version_id",
        })?;

        info!(
            "Performing inference with model ID: {}, version ID: {}, and text: {}",
            model_id, version_id, data.text
        );
        let response = self
            .http_client
            .post(self.url(&format!(
                "/models/{}/versions/{}/infer",
                model_id, version_id
            )))
            .json(&InferenceRequest { text: data.text })
            .timeout(timeout)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let response = ApiResponse::read(response).await?;
        info!(
            "Inference response received with status code: {}",
            response.status_code()
        );
        Ok(response)
    }

    /// モデルを削除
    pub async fn delete_model(&self, case: &str, document: &str) -> ActionResult<ApiResponse> {
        let data: DeleteModelCase = self.store.get_as(case, document)?;
        let model_id = data.model_id.ok_or_else(|| ActionError::MissingId {
            case: case.to_string(),
            field: "model_id",
        })?;

        self.delete_model_by_id(&model_id).await
    }

    /// IDを指定してモデルを削除
    pub async fn delete_model_by_id(&self, model_id: &str) -> ActionResult<ApiResponse> {
        info!("Deleting model with ID: {}", model_id);
        let response = self
            .http_client
            .delete(self.url(&format!("/models/{}", model_id)))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let response = ApiResponse::read(response).await?;
        info!(status = response.status_code(), "Model deleted with response: {}", response.text());
        Ok(response)
    }

    /// モデルバージョンを削除
    pub async fn delete_model_version(
        &self,
        case: &str,
        document: &str,
    ) -> ActionResult<ApiResponse> {
        let data: DeleteVersionCase = self.store.get_as(case, document)?;
        let model_id = data.model_id.ok_or_else(|| ActionError::MissingId {
            case: case.to_string(),
            field: "model_id",
        })?;
        let version_id = data.version_id.ok_or_else(|| ActionError::MissingId {
            case: case.to_string(),
            field: "version_id",
        })?;

        info!(
            "Deleting version with ID: {} for model with ID: {}",
            version_id, model_id
        );
        let response = self
            .http_client
            .delete(self.url(&format!(
                "/models/{}/versions/{}",
                model_id, version_id
            )))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let response = ApiResponse::read(response).await?;
        info!(
            status = response.status_code(),
            "Model version deleted with response: {}",
            response.text()
        );
        Ok(response)
    }
}
