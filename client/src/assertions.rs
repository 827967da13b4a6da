//! レスポンス検証
//!
//! 期待値と実際の値の両方をメッセージに含めて`ExpectationError`を返す。

use model_api_common::{
    error::{ExpectationError, ExpectationResult},
    protocol::{ErrorDetail, ErrorResponse, Model},
};
use serde_json::Value;

use crate::client::ApiResponse;

/// ステータスコードを検証する
pub fn expect_status(
    response: &ApiResponse,
    expected: u16,
    context: &str,
) -> ExpectationResult<()> {
    let actual = response.status_code();
    if actual == expected {
        Ok(())
    } else {
        Err(ExpectationError::UnexpectedStatus {
            context: context.to_string(),
            expected,
            actual,
        })
    }
}

/// レスポンスのフィールドが送信値と一致するか検証する
pub fn expect_field_eq(body: &Value, field: &str, expected: &Value) -> ExpectationResult<()> {
    let actual = body.get(field).cloned().unwrap_or(Value::Null);
    if &actual == expected {
        Ok(())
    } else {
        Err(ExpectationError::FieldMismatch {
            field: field.to_string(),
            expected: expected.clone(),
            actual,
        })
    }
}

/// 送信値がデコード済みレスポンスにそのまま返っているか検証する
pub fn expect_echoed(field: &str, expected: &str, actual: Option<&str>) -> ExpectationResult<()> {
    if actual == Some(expected) {
        Ok(())
    } else {
        Err(ExpectationError::FieldMismatch {
            field: field.to_string(),
            expected: Value::from(expected),
            actual: actual.map_or(Value::Null, Value::from),
        })
    }
}

/// デコード済みレスポンスの必須フィールドを取り出す
pub fn require_response_field(
    value: Option<String>,
    field: &str,
    response: &ApiResponse,
) -> ExpectationResult<String> {
    value.ok_or_else(|| ExpectationError::MissingResponseField {
        field: field.to_string(),
        body: response.text().to_string(),
    })
}

fn error_detail(body: &Value) -> Option<ErrorDetail> {
    serde_json::from_value::<ErrorResponse>(body.clone())
        .ok()
        .map(|e| e.detail)
}

fn detail_text(body: &Value) -> String {
    match body.get("detail") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

/// 文字列の`detail`にメッセージが含まれるか検証する
pub fn expect_detail_contains(body: &Value, needle: &str) -> ExpectationResult<()> {
    match error_detail(body) {
        Some(detail @ ErrorDetail::Message(_)) if detail.contains(needle) => Ok(()),
        _ => Err(ExpectationError::MessageNotFound {
            needle: needle.to_string(),
            actual: detail_text(body),
        }),
    }
}

/// バリデーションエラー配列（`detail[].msg`）にメッセージが含まれるか検証する
pub fn expect_validation_message(body: &Value, needle: &str) -> ExpectationResult<()> {
    match error_detail(body) {
        Some(detail @ ErrorDetail::Validation(_)) if detail.contains(needle) => Ok(()),
        _ => Err(ExpectationError::MessageNotFound {
            needle: needle.to_string(),
            actual: detail_text(body),
        }),
    }
}

/// モデル一覧に指定IDが含まれないことを検証する
pub fn expect_model_absent(models: &[Model], id: &str) -> ExpectationResult<()> {
    if models.iter().any(|m| m.id.as_deref() == Some(id)) {
        Err(ExpectationError::ModelStillListed { id: id.to_string() })
    } else {
        Ok(())
    }
}

/// モデル一覧が空であることを検証する
pub fn expect_no_models(models: &[Model]) -> ExpectationResult<()> {
    if models.is_empty() {
        Ok(())
    } else {
        Err(ExpectationError::ModelsRemaining {
            remaining: models.len(),
        })
    }
}
