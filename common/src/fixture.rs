//! Fixtureストア（キーワードリポジトリ）
//!
//! テストモジュールごとのJSONドキュメント（テストケース名 → レコード）を読み書きする。
//! 読み込み・書き込みのたびにドキュメント全体をディスクから読み直し、
//! 更新時はドキュメント全体を書き戻す。ロックは行わないため、
//! 同じドキュメントを並行して更新すると更新が失われる。

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{FixtureError, FixtureResult};

/// テストケース名 → レコードのマップ
pub type FixtureDocument = Map<String, Value>;

/// 1つのテストケースのフィールド集合
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureRecord {
    case: String,
    fields: Map<String, Value>,
}

impl FixtureRecord {
    /// レコードを作成する
    pub fn new(case: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            case: case.into(),
            fields,
        }
    }

    /// テストケース名
    pub fn case(&self) -> &str {
        &self.case
    }

    /// 全フィールド
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// 生の値を取得する（nullは未設定として扱う）
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field).filter(|v| !v.is_null())
    }

    /// 文字列フィールドを取得する
    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    /// 必須の文字列フィールドを取得する
    pub fn require_str(&self, field: &str) -> FixtureResult<&str> {
        self.str_field(field)
            .ok_or_else(|| FixtureError::MissingField {
                case: self.case.clone(),
                field: field.to_string(),
            })
    }

    /// ID系フィールドを取得する
    ///
    /// 文字列と数値を受け付け、null・空文字は未設定とみなす。
    pub fn id_field(&self, field: &str) -> Option<String> {
        self.get(field).and_then(id_from_value)
    }

    /// 期待するHTTPステータスコード
    pub fn expected_status_code(&self) -> FixtureResult<u16> {
        self.get("expected_status_code")
            .and_then(Value::as_u64)
            .and_then(|code| u16::try_from(code).ok())
            .ok_or_else(|| FixtureError::MissingField {
                case: self.case.clone(),
                field: "expected_status_code".to_string(),
            })
    }

    /// 型付きビューへ変換する
    pub fn parse<T: DeserializeOwned>(&self) -> FixtureResult<T> {
        serde_json::from_value(Value::Object(self.fields.clone())).map_err(|e| {
            FixtureError::InvalidRecord {
                case: self.case.clone(),
                reason: e.to_string(),
            }
        })
    }
}

/// JSON値をID文字列へ正規化する
pub fn id_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// fixtureドキュメントを格納するディレクトリ
#[derive(Debug, Clone)]
pub struct FixtureStore {
    root: PathBuf,
}

impl FixtureStore {
    /// ディレクトリを指定してストアを作成する
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// ストアのルートディレクトリ
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// ドキュメントのディスク上のパス
    pub fn document_path(&self, document: &str) -> PathBuf {
        self.root.join(document)
    }

    /// ドキュメント全体を読み込む
    pub fn load(&self, document: &str) -> FixtureResult<FixtureDocument> {
        let path = self.document_path(document);
        let raw = fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => FixtureError::FileMissing {
                document: document.to_string(),
                path: path.clone(),
            },
            _ => FixtureError::Io(e),
        })?;

        let parsed: Value = serde_json::from_str(&raw).map_err(|e| FixtureError::Malformed {
            document: document.to_string(),
            reason: e.to_string(),
        })?;

        match parsed {
            Value::Object(map) => Ok(map),
            other => Err(FixtureError::Malformed {
                document: document.to_string(),
                reason: format!("expected an object of test cases, got {}", kind_of(&other)),
            }),
        }
    }

    /// テストケースのレコードを取得する
    pub fn get(&self, case: &str, document: &str) -> FixtureResult<FixtureRecord> {
        let mut data = self.load(document)?;
        match data.remove(case) {
            Some(Value::Object(fields)) => Ok(FixtureRecord::new(case, fields)),
            Some(other) => Err(FixtureError::Malformed {
                document: document.to_string(),
                reason: format!("test case '{}' is {}, not an object", case, kind_of(&other)),
            }),
            None => Err(FixtureError::NotFound {
                case: case.to_string(),
                document: document.to_string(),
            }),
        }
    }

    /// テストケースのレコードを型付きビューで取得する
    pub fn get_as<T: DeserializeOwned>(&self, case: &str, document: &str) -> FixtureResult<T> {
        self.get(case, document)?.parse()
    }

    /// レコードの1フィールドを更新し、ドキュメント全体を書き戻す
    ///
    /// 存在しないテストケースへの書き込みは`NotFound`となり、ファイルは変更されない。
    pub fn update(
        &self,
        case: &str,
        field: &str,
        value: impl Serialize,
        document: &str,
    ) -> FixtureResult<()> {
        let value = serde_json::to_value(value).map_err(|e| FixtureError::InvalidRecord {
            case: case.to_string(),
            reason: e.to_string(),
        })?;

        let mut data = self.load(document)?;
        let record = match data.get_mut(case) {
            Some(Value::Object(record)) => record,
            Some(other) => {
                return Err(FixtureError::Malformed {
                    document: document.to_string(),
                    reason: format!("test case '{}' is {}, not an object", case, kind_of(other)),
                })
            }
            None => {
                return Err(FixtureError::NotFound {
                    case: case.to_string(),
                    document: document.to_string(),
                })
            }
        };
        record.insert(field.to_string(), value);

        self.save(document, &data)?;
        debug!(case, field, document, "fixture record updated");
        Ok(())
    }

    /// ドキュメントを4スペースインデントで書き出す
    fn save(&self, document: &str, data: &FixtureDocument) -> FixtureResult<()> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        data.serialize(&mut serializer)
            .map_err(|e| FixtureError::Malformed {
                document: document.to_string(),
                reason: e.to_string(),
            })?;
        buf.push(b'\n');

        fs::write(self.document_path(document), buf)?;
        Ok(())
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
