//! エラー型定義
//!
//! 統一エラー型（thiserror使用）
//!
//! 3つの層に分かれる:
//! - [`FixtureError`]: fixtureドキュメントの読み書きに関するエラー
//! - [`ActionError`]: HTTPアクション層のエラー（ローカル検証・通信）
//! - [`ExpectationError`]: レスポンスが期待値と一致しない場合の検証失敗
//!
//! [`HarnessError`]はシナリオ手順とクリーンアップで3層をまとめて扱う。

use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

/// Fixture store error type
#[derive(Debug, Error)]
pub enum FixtureError {
    /// Document file does not exist
    #[error("The file '{document}' was not found at {}", path.display())]
    FileMissing {
        /// Document file name
        document: String,
        /// Resolved path
        path: PathBuf,
    },

    /// Test case key is absent from the document
    #[error("Test case '{case}' not found in the JSON file '{document}'")]
    NotFound {
        /// Test case name
        case: String,
        /// Document file name
        document: String,
    },

    /// Required field is absent (or null) in the record
    #[error("Field '{field}' not found in the test data for test case '{case}'")]
    MissingField {
        /// Test case name
        case: String,
        /// Field name
        field: String,
    },

    /// Record could not be converted to its typed view
    #[error("Test case '{case}' has an invalid record: {reason}")]
    InvalidRecord {
        /// Test case name
        case: String,
        /// Deserialization message
        reason: String,
    },

    /// Document is not valid JSON or not an object of records
    #[error("Malformed fixture document '{document}': {reason}")]
    Malformed {
        /// Document file name
        document: String,
        /// Parse failure detail
        reason: String,
    },

    /// I/O error other than a missing file
    #[error("Fixture I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP action layer error type
#[derive(Debug, Error)]
pub enum ActionError {
    /// Fixture error while reading the record
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    /// Required identifier is missing from the record (no request issued)
    #[error("{field} not found in the test data for test case '{case}'")]
    MissingId {
        /// Test case name
        case: String,
        /// Identifier field name
        field: &'static str,
    },

    /// Request exceeded its client-side timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Connection or other transport failure
    #[error("Request failed: {0}")]
    Transport(String),

    /// Response body could not be read or decoded
    #[error("Invalid response body: {0}")]
    InvalidBody(String),
}

impl ActionError {
    /// タイムアウトによる失敗かどうか
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// 通信失敗（タイムアウト含む）かどうか
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Transport(_))
    }
}

/// Response did not match the expected condition
#[derive(Debug, Error)]
pub enum ExpectationError {
    /// Status code mismatch
    #[error("{context}: expected status code {expected}, but got {actual}")]
    UnexpectedStatus {
        /// What was being checked
        context: String,
        /// Expected status code
        expected: u16,
        /// Actual status code
        actual: u16,
    },

    /// Echoed field value mismatch
    #[error("Expected {field} {expected}, but got {actual}")]
    FieldMismatch {
        /// Field name
        field: String,
        /// Expected value
        expected: Value,
        /// Actual value (null when absent)
        actual: Value,
    },

    /// Field required in the response body is absent
    #[error("{field} not found in the response: {body}")]
    MissingResponseField {
        /// Field name
        field: String,
        /// Response body as received
        body: String,
    },

    /// Expected error message not present in the response detail
    #[error("Expected '{needle}' error message not found. Got: '{actual}'")]
    MessageNotFound {
        /// Expected substring
        needle: String,
        /// Detail as received
        actual: String,
    },

    /// Deleted model is still listed
    #[error("Model with ID {id} is still listed after deletion")]
    ModelStillListed {
        /// Model ID
        id: String,
    },

    /// Models are still listed after cleanup
    #[error("Models are still present after deletion: {remaining} remaining")]
    ModelsRemaining {
        /// Number of models left
        remaining: usize,
    },
}

/// Harness error type (scenario steps, cleanup)
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Fixture error
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    /// Action error
    #[error(transparent)]
    Action(#[from] ActionError),

    /// Expectation failure
    #[error(transparent)]
    Expectation(#[from] ExpectationError),
}

/// Fixture store result type
pub type FixtureResult<T> = Result<T, FixtureError>;

/// Action layer result type
pub type ActionResult<T> = Result<T, ActionError>;

/// Expectation result type
pub type ExpectationResult<T> = Result<T, ExpectationError>;

/// Harness result type
pub type HarnessResult<T> = Result<T, HarnessError>;
