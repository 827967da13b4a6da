//! 設定管理
//!
//! 環境変数からテストハーネスの設定（接続先URL、fixtureディレクトリ、
//! 推論タイムアウト）を読み込む。

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// 接続先ベースURLの環境変数
pub const BASE_URL_ENV: &str = "MODEL_API_BASE_URL";
/// fixtureディレクトリの環境変数
pub const FIXTURE_DIR_ENV: &str = "MODEL_API_FIXTURE_DIR";
/// 推論タイムアウト（秒）の環境変数
pub const INFERENCE_TIMEOUT_ENV: &str = "MODEL_API_INFERENCE_TIMEOUT_SECS";

/// Get an environment variable, ignoring empty values
pub fn get_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable or a default value
pub fn get_env_or(name: &str, default: &str) -> String {
    get_env(name).unwrap_or_else(|| default.to_string())
}

/// Get an environment variable parsed to `T`
///
/// Falls back to `default` when the variable is unset or fails to parse.
pub fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    match get_env(name) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(
                    "Environment variable '{}' has an invalid value '{}', using default",
                    name,
                    raw
                );
                default
            }
        },
        None => default,
    }
}

/// テストハーネス設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// サービスのベースURL (デフォルト: "http://127.0.0.1:8000")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// fixtureドキュメントの配置ディレクトリ (デフォルト: "fixtures")
    #[serde(default = "default_fixture_dir")]
    pub fixture_dir: PathBuf,

    /// 推論リクエストのタイムアウト (デフォルト: 60秒)
    #[serde(default = "default_inference_timeout", with = "duration_secs")]
    pub inference_timeout: Duration,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_fixture_dir() -> PathBuf {
    PathBuf::from("fixtures")
}

fn default_inference_timeout() -> Duration {
    Duration::from_secs(60)
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            fixture_dir: default_fixture_dir(),
            inference_timeout: default_inference_timeout(),
        }
    }
}

impl HarnessConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Self {
        let base_url = get_env_or(BASE_URL_ENV, &default_base_url());
        let fixture_dir = get_env(FIXTURE_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(default_fixture_dir);
        let timeout_secs = get_env_parse(
            INFERENCE_TIMEOUT_ENV,
            default_inference_timeout().as_secs(),
        );

        Self {
            base_url: normalize_base_url(&base_url),
            fixture_dir,
            inference_timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// ベースURLを差し替える
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> Self {
        self.base_url = normalize_base_url(base_url.as_ref());
        self
    }

    /// fixtureディレクトリを差し替える
    pub fn with_fixture_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fixture_dir = dir.into();
        self
    }

    /// 推論タイムアウトを差し替える
    pub fn with_inference_timeout(mut self, timeout: Duration) -> Self {
        self.inference_timeout = timeout;
        self
    }
}

/// 末尾のスラッシュを取り除く
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
