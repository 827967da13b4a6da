//! 通信プロトコル定義
//!
//! モデル管理サービスとの間でやり取りするリクエスト/レスポンス

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::records::deserialize_optional_id;

/// モデル作成リクエスト
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateModelRequest {
    /// モデル名
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// オーナー
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

/// モデル
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    /// モデルID
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub id: Option<String>,
    /// モデル名
    #[serde(default)]
    pub name: Option<String>,
    /// オーナー
    #[serde(default)]
    pub owner: Option<String>,
}

/// モデルバージョン作成リクエスト
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateVersionRequest {
    /// バージョン名
    pub name: String,
    /// Hugging Faceモデル名
    pub hugging_face_model: String,
}

/// モデルバージョン
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelVersion {
    /// バージョンID
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub id: Option<String>,
    /// 親モデルID
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub parent_model_id: Option<String>,
    /// バージョン名
    #[serde(default)]
    pub name: Option<String>,
    /// Hugging Faceモデル名
    #[serde(default)]
    pub hugging_face_model: Option<String>,
}

/// 推論リクエスト
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceRequest {
    /// 入力テキスト
    pub text: String,
}

/// バリデーションエラー1件（`detail`配列の要素）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// エラー箇所
    #[serde(default)]
    pub loc: Vec<Value>,
    /// メッセージ
    #[serde(default)]
    pub msg: String,
    /// エラー種別
    #[serde(default, rename = "type")]
    pub kind: String,
}

/// エラーレスポンスの`detail`
///
/// ドメインエラーは文字列、バリデーションエラーは配列で返る。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    /// "Model not found" 等
    Message(String),
    /// "Field required" 等
    Validation(Vec<ValidationIssue>),
}

/// エラーレスポンス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 詳細
    pub detail: ErrorDetail,
}

impl ErrorDetail {
    /// いずれかのメッセージに`needle`が含まれるか
    pub fn contains(&self, needle: &str) -> bool {
        match self {
            Self::Message(msg) => msg.contains(needle),
            Self::Validation(issues) => issues.iter().any(|i| i.msg.contains(needle)),
        }
    }
}
