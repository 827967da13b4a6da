//! テストケースレコードの型付きビュー
//!
//! fixtureドキュメント上のレコードは動的なキーを持つが、
//! 各アクションが必要とするフィールドはここで型として宣言する。
//!
//! アクション用のビューはリクエストに使うフィールドだけを持つ。
//! `expected_status_code`は検証側が[`ExpectationCase`]または
//! [`FixtureRecord::expected_status_code`](crate::fixture::FixtureRecord::expected_status_code)で読む。

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::fixture::id_from_value;

/// IDフィールドのデシリアライズ（文字列・数値を受け付け、null・空文字はNone）
pub fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(id_from_value))
}

/// モデル作成ケース
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModelCase {
    /// モデル名（未指定の場合はリクエストから省略する）
    #[serde(default)]
    pub name: Option<String>,
    /// オーナー（未指定の場合はリクエストから省略する）
    #[serde(default)]
    pub owner: Option<String>,
    /// 作成済みモデルID
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub id: Option<String>,
}

/// モデルバージョン作成ケース
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VersionCase {
    /// 親モデルID
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub id: Option<String>,
    /// バージョン名
    pub name: String,
    /// Hugging Faceモデル名
    pub hugging_face_model: String,
}

/// 推論ケース
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InferenceCase {
    /// モデルID
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub model_id: Option<String>,
    /// バージョンID
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub version_id: Option<String>,
    /// 推論入力テキスト
    pub text: String,
}

/// モデル削除ケース
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeleteModelCase {
    /// 削除対象モデルID
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub model_id: Option<String>,
}

/// モデルバージョン削除ケース
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeleteVersionCase {
    /// 親モデルID
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub model_id: Option<String>,
    /// 削除対象バージョンID
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub version_id: Option<String>,
}

/// 期待値ケース（クリーンアップ・シナリオ手順の検証用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ExpectationCase {
    /// 期待するステータスコード
    pub expected_status_code: u16,
}

/// クリーンアップ用レコードのテストケース名
pub const CLEANUP_CASE: &str = "test_delete_all_existing_models";
