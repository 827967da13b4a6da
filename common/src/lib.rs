//! Model API Tests Common
//!
//! テストハーネス全体で共有する型と、fixtureドキュメント（キーワードリポジトリ）

#![warn(missing_docs)]

/// 設定管理
pub mod config;

/// エラー型定義
pub mod error;

/// Fixtureストア（キーワードリポジトリ）
pub mod fixture;

/// 通信プロトコル定義
pub mod protocol;

/// テストケースレコードの型付きビュー
pub mod records;
