//! CLI module
//!
//! テストスイート外からサービスの掃除やfixtureの確認・編集を行うためのコマンド。

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use model_api_common::{
    config::HarnessConfig,
    error::{FixtureError, HarnessError},
};
use serde_json::Value;
use thiserror::Error;

use crate::{cleanup::delete_all_existing_models, client::ModelApiClient};

/// Model API test harness - fixture-driven checks against a model management service
#[derive(Parser, Debug)]
#[command(name = "model-api-tests")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    MODEL_API_BASE_URL                Service base URL (default: http://127.0.0.1:8000)
    MODEL_API_FIXTURE_DIR             Fixture document directory (default: fixtures)
    MODEL_API_INFERENCE_TIMEOUT_SECS  Inference request timeout (default: 60)
    MODEL_API_LOG_LEVEL               Log level (default: info)
    MODEL_API_LOG_DIR                 JSON lines log directory (default: logs)
"#)]
pub struct Cli {
    /// Service base URL (overrides MODEL_API_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Fixture directory (overrides MODEL_API_FIXTURE_DIR)
    #[arg(long, global = true)]
    pub fixture_dir: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Delete every model on the service and verify none remain
    Cleanup(CleanupArgs),
    /// Read or edit fixture records
    #[command(subcommand)]
    Fixture(FixtureCommand),
}

/// Arguments for `cleanup`
#[derive(Args, Debug)]
pub struct CleanupArgs {
    /// Document holding the `test_delete_all_existing_models` record
    #[arg(long, short, default_value = "test_model_data.json")]
    pub document: String,
}

/// Fixture subcommands
#[derive(Subcommand, Debug)]
pub enum FixtureCommand {
    /// Print one test case record
    Get {
        /// Document file name
        document: String,
        /// Test case name
        case: String,
    },
    /// Set one field of an existing test case record
    Set {
        /// Document file name
        document: String,
        /// Test case name
        case: String,
        /// Field name
        field: String,
        /// Value (parsed as JSON, otherwise stored as a string)
        value: String,
    },
}

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    /// Harness error
    #[error(transparent)]
    Harness(#[from] HarnessError),

    /// Fixture error
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    /// Output serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Cli {
    /// 環境変数とコマンドライン引数から設定を組み立てる
    pub fn config(&self) -> HarnessConfig {
        let mut config = HarnessConfig::from_env();
        if let Some(url) = &self.base_url {
            config = config.with_base_url(url);
        }
        if let Some(dir) = &self.fixture_dir {
            config = config.with_fixture_dir(dir.clone());
        }
        config
    }
}

/// `fixture set` の値を解釈する（JSONとして読めなければ文字列）
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// サブコマンドを実行する
pub async fn execute(cli: Cli) -> Result<(), CliError> {
    let config = cli.config();
    let client = ModelApiClient::new(&config);

    match cli.command {
        Commands::Cleanup(args) => {
            let deleted = delete_all_existing_models(&client, &args.document).await?;
            println!("Deleted {} models from {}", deleted, client.base_url());
        }
        Commands::Fixture(FixtureCommand::Get { document, case }) => {
            let record = client.store().get(&case, &document)?;
            println!("{}", serde_json::to_string_pretty(record.fields())?);
        }
        Commands::Fixture(FixtureCommand::Set {
            document,
            case,
            field,
            value,
        }) => {
            client
                .store()
                .update(&case, &field, parse_value(&value), &document)?;
            println!("Updated {}.{} in {}", case, field, document);
        }
    }

    Ok(())
}
