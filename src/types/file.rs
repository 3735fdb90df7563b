//! Uploaded files.
//!
//! `File` and `Files` are custom scalar kinds checked by validators in the
//! type registry rather than built from primitive schemas. `Files` also
//! carries a coercion that always decodes to a list.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;

use crate::error::TypesError;
use crate::registry::{KindValidator, TypeRegistry};
use crate::schema::{Coercion, FileBlob, Schema, Value};

pub const FILE_KIND: &str = "File";
pub const FILES_KIND: &str = "Files";

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

/// A size bound in bytes, written as `N`, `Nk` or `Nm`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FileSize(pub u64);

impl FileSize {
    pub fn bytes(n: u64) -> Self {
        Self(n)
    }

    /// Saturates at `u64::MAX` bytes
    pub fn kib(n: u64) -> Self {
        Self(n.saturating_mul(KIB))
    }

    /// Saturates at `u64::MAX` bytes
    pub fn mib(n: u64) -> Self {
        Self(n.saturating_mul(MIB))
    }
}

impl FromStr for FileSize {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (digits, unit) = match s.char_indices().last() {
            Some((i, 'k')) => (&s[..i], KIB),
            Some((i, 'm')) => (&s[..i], MIB),
            _ => (s, 1),
        };

        digits
            .parse::<u64>()
            .ok()
            .and_then(|n| n.checked_mul(unit))
            .map(FileSize)
            .ok_or_else(|| TypesError::invalid_option(format!("Invalid file size '{}': expected N, Nk or Nm", s)))
    }
}

impl fmt::Display for FileSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for FileSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Bytes(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Bytes(n) => Ok(FileSize(n)),
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Accepted MIME prefixes: one, or any of several
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileType {
    One(String),
    Many(Vec<String>),
}

impl From<&str> for FileType {
    fn from(s: &str) -> Self {
        FileType::One(s.to_string())
    }
}

impl From<Vec<&str>> for FileType {
    fn from(list: Vec<&str>) -> Self {
        FileType::Many(list.into_iter().map(String::from).collect())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileOptions {
    /// MIME category (`image`) or exact type (`image/png`)
    #[serde(alias = "type", skip_serializing_if = "Option::is_none")]
    pub extension: Option<FileType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_size: Option<FileSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size: Option<FileSize>,
}

impl FileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extension(mut self, extension: impl Into<FileType>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    pub fn min_size(mut self, size: FileSize) -> Self {
        self.min_size = Some(size);
        self
    }

    pub fn max_size(mut self, size: FileSize) -> Self {
        self.max_size = Some(size);
        self
    }

    /// Parse caller options, e.g. `{"type": "image", "maxSize": "5m"}`
    pub fn from_json(options: serde_json::Value) -> crate::Result<Self> {
        serde_json::from_value(options).map_err(|e| TypesError::invalid_option(e.to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilesOptions {
    #[serde(flatten)]
    pub file: FileOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
}

impl FilesOptions {
    pub fn new(file: FileOptions) -> Self {
        Self {
            file,
            ..Default::default()
        }
    }

    pub fn min_items(mut self, n: usize) -> Self {
        self.min_items = Some(n);
        self
    }

    pub fn max_items(mut self, n: usize) -> Self {
        self.max_items = Some(n);
        self
    }

    pub fn from_json(options: serde_json::Value) -> crate::Result<Self> {
        serde_json::from_value(options).map_err(|e| TypesError::invalid_option(e.to_string()))
    }
}

pub(crate) fn file_schema(options: &FileOptions) -> Schema {
    Schema::custom(FILE_KIND, options_json(options))
}

/// Any single file decodes to a one-element list
pub(crate) fn files_schema(options: &FilesOptions) -> Schema {
    Schema::custom(FILES_KIND, options_json(options)).with_coercion(Coercion::Files)
}

fn options_json<T: Serialize>(options: &T) -> serde_json::Value {
    serde_json::to_value(options).unwrap_or_else(|_| json!({}))
}

/// Size bounds first, then the MIME prefix
///
/// With a list of prefixes the first match accepts the file outright and
/// only an exhausted list rejects it, while a single prefix is a plain
/// negated test that falls through to the final accept.
pub fn validate_file(options: &FileOptions, file: &FileBlob) -> bool {
    if options.min_size.is_some_and(|min| file.size < min.0) {
        return false;
    }
    if options.max_size.is_some_and(|max| file.size > max.0) {
        return false;
    }

    if let Some(extension) = &options.extension {
        match extension {
            FileType::One(prefix) => {
                if !file.content_type.starts_with(prefix.as_str()) {
                    return false;
                }
            }
            FileType::Many(prefixes) => {
                for prefix in prefixes {
                    if file.content_type.starts_with(prefix.as_str()) {
                        return true;
                    }
                }
                return false;
            }
        }
    }

    true
}

fn validate_value(options: &FileOptions, value: &Value) -> bool {
    match value {
        Value::File(file) => validate_file(options, file),
        _ => false,
    }
}

pub fn validate_files(options: &FilesOptions, value: &Value) -> bool {
    let Value::Array(files) = value else {
        return validate_value(&options.file, value);
    };

    if options.min_items.is_some_and(|min| files.len() < min) {
        return false;
    }
    if options.max_items.is_some_and(|max| files.len() > max) {
        return false;
    }

    files.iter().all(|file| validate_value(&options.file, file))
}

pub(crate) fn decode_files(value: Value) -> Value {
    match value {
        Value::Array(_) => value,
        single => Value::Array(vec![single]),
    }
}

/// Register the `File` and `Files` validators unless something already
/// claimed those kinds
pub fn register_kinds(kinds: &TypeRegistry) {
    kinds.get_or_register(FILE_KIND, || -> KindValidator {
        Arc::new(|options: &serde_json::Value, value: &Value| match FileOptions::deserialize(options) {
            Ok(options) => validate_value(&options, value),
            Err(e) => {
                tracing::warn!(error = %e, "Invalid File schema options");
                false
            }
        })
    });

    kinds.get_or_register(FILES_KIND, || -> KindValidator {
        Arc::new(|options: &serde_json::Value, value: &Value| match FilesOptions::deserialize(options) {
            Ok(options) => validate_files(&options, value),
            Err(e) => {
                tracing::warn!(error = %e, "Invalid Files schema options");
                false
            }
        })
    });
}
