//! Model API Tests
//!
//! モデル管理サービスに対するfixture駆動のエンドツーエンドAPIテストハーネス

#![warn(missing_docs)]

/// レスポンス検証
pub mod assertions;

/// 既存モデルの一括削除
pub mod cleanup;

/// CLI
pub mod cli;

/// HTTPアクション層
pub mod client;

/// ロギング初期化
pub mod logging;

/// シナリオのセットアップ手順
pub mod scenario;

pub use client::{ApiResponse, ModelApiClient};
pub use model_api_common as common;
