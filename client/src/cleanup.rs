//! 既存モデルの一括削除
//!
//! テストモジュール開始前にサービスをクリーンな状態に戻す。

use model_api_common::{
    error::HarnessResult,
    protocol::Model,
    records::{ExpectationCase, CLEANUP_CASE},
};
use tracing::info;

use crate::assertions::{expect_no_models, expect_status};
use crate::client::ModelApiClient;

/// 全モデルを削除し、一覧が空になったことを確認する
///
/// 期待ステータスはドキュメントの`test_delete_all_existing_models`レコードから読む。
/// 一覧取得・各削除・再取得のいずれかが期待と異なれば即座に失敗する。
/// 戻り値は削除したモデル数。
pub async fn delete_all_existing_models(
    client: &ModelApiClient,
    document: &str,
) -> HarnessResult<usize> {
    let data: ExpectationCase = client.store().get_as(CLEANUP_CASE, document)?;
    let expected = data.expected_status_code;

    let response = client.list_models().await?;
    expect_status(&response, expected, "Failed to fetch models")?;
    let models: Vec<Model> = response.json()?;

    info!("Found {} models. Attempting to delete each model...", models.len());
    let mut deleted = 0;
    for model_id in models.iter().filter_map(|m| m.id.as_deref()) {
        let response = client.delete_model_by_id(model_id).await?;
        expect_status(
            &response,
            expected,
            &format!("Failed to delete model with ID {}", model_id),
        )?;
        deleted += 1;
    }
    info!("All models deleted successfully.");

    info!("Verifying that no models are left after cleanup...");
    let response = client.list_models().await?;
    expect_status(&response, expected, "Failed to fetch models after deletion")?;
    let remaining: Vec<Model> = response.json()?;
    expect_no_models(&remaining)?;

    info!("No models are present after deletion. Cleanup passed.");
    Ok(deleted)
}
