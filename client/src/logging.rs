//! ロギング初期化ユーティリティ
//!
//! `tracing` による構造化ロギングを標準出力とJSONライン形式ファイルへ出力する。

use std::{
    env,
    fs::{self, OpenOptions},
    io::{self, Error},
    path::PathBuf,
    sync::OnceLock,
};
use tracing_appender::{non_blocking, non_blocking::WorkerGuard};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// ログファイル名（JSON Lines）
pub const LOG_FILE_NAME: &str = "model-api-tests.log.jsonl";

const LOG_DIR_ENV: &str = "MODEL_API_LOG_DIR";
const DEFAULT_LOG_DIR: &str = "logs";
const LEVEL_ENV: &str = "MODEL_API_LOG_LEVEL";
const ALT_LEVEL_ENV: &str = "RUST_LOG";

static LOGGER_GUARD: OnceLock<Result<LoggerGuard, io::Error>> = OnceLock::new();

struct LoggerGuard {
    _file_guard: WorkerGuard,
}

/// ログ出力を初期化する。
pub fn init() -> io::Result<()> {
    match LOGGER_GUARD.get_or_init(configure_logger) {
        Ok(_) => Ok(()),
        Err(err) => Err(io::Error::new(err.kind(), err.to_string())),
    }
}

/// テスト用にログ出力を初期化する（テストハーネスの出力キャプチャに従う）。
pub fn init_for_tests() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_test_writer()
        .try_init();
}

/// ログファイルのパスを返す。
pub fn log_file_path() -> PathBuf {
    let dir = env::var(LOG_DIR_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_DIR.to_string());
    PathBuf::from(dir).join(LOG_FILE_NAME)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LEVEL_ENV)
        .or_else(|_| EnvFilter::try_from_env(ALT_LEVEL_ENV))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn configure_logger() -> io::Result<LoggerGuard> {
    let log_path = log_file_path();
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;
    let (file_writer, file_guard) = non_blocking(file);

    let stdout_layer = fmt::layer().with_target(false);

    let file_layer = fmt::layer()
        .json()
        .with_writer(file_writer)
        .with_current_span(false)
        .with_span_list(false)
        .with_target(true)
        .with_file(false)
        .with_line_number(false);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(Error::other)?;

    tracing::info!("Test logs will be written to {}", log_path.display());

    Ok(LoggerGuard {
        _file_guard: file_guard,
    })
}
