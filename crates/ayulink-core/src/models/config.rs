//! Configuration structures for the OCR service.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

use crate::error::AyulinkError;

/// Main configuration for the ayulink service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AyulinkConfig {
    /// OCR engine configuration.
    pub ocr: OcrConfig,

    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Key-value extraction configuration.
    pub extraction: ExtractionConfig,

    /// Upload and result storage configuration.
    pub storage: StorageConfig,

    /// HTTP server configuration.
    pub server: ServerConfig,
}

/// Which OCR engine to construct at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrBackend {
    /// Use tesseract when it can be found, otherwise the mock engine.
    Auto,
    /// Always use the tesseract executable.
    Tesseract,
    /// Always use the diagnostic mock engine.
    Mock,
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Engine selection.
    pub backend: OcrBackend,

    /// Path or name of the tesseract executable.
    pub tesseract_path: String,

    /// Tesseract language code.
    pub language: String,

    /// Run grayscale/threshold/opening before recognition.
    pub preprocess: bool,

    /// Square kernel size for the morphological opening (1 = no-op).
    pub morph_kernel_size: u32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            backend: OcrBackend::Auto,
            tesseract_path: "tesseract".to_string(),
            language: "eng".to_string(),
            preprocess: true,
            morph_kernel_size: 1,
        }
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Try to use embedded text before falling back to OCR.
    pub prefer_embedded_text: bool,

    /// Minimum embedded text length to skip OCR.
    pub min_text_length: usize,

    /// Maximum pages to OCR (0 = unlimited).
    pub max_pages: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            prefer_embedded_text: true,
            min_text_length: 50,
            max_pages: 10,
        }
    }
}

/// Key-value extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Keys with this many characters or more are discarded.
    pub max_key_length: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self { max_key_length: 30 }
    }
}

/// Upload and result storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory receiving uploaded files.
    pub upload_dir: PathBuf,

    /// Directory receiving `<name>_ocr.json` results.
    pub results_dir: PathBuf,

    /// Accepted file extensions, compared case-insensitively.
    pub allowed_extensions: Vec<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            results_dir: PathBuf::from("ocr_results"),
            allowed_extensions: vec!["pdf".to_string(), "jpeg".to_string(), "jpg".to_string()],
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,

    /// Bind port.
    pub port: u16,

    /// Maximum accepted request body in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            max_upload_bytes: 16 * 1024 * 1024,
        }
    }
}

impl AyulinkConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Value at a dotted key such as `ocr.language` or `server`.
    pub fn get_value(&self, key: &str) -> Result<Value, AyulinkError> {
        let json = serde_json::to_value(self)?;
        key.split('.')
            .try_fold(&json, |node, part| node.get(part))
            .cloned()
            .ok_or_else(|| AyulinkError::Config(format!("unknown key: {}", key)))
    }

    /// Set a dotted leaf key from its textual form.
    ///
    /// `raw` is interpreted according to the current value's type: text for
    /// strings, `true`/`false` for flags, a number for numbers, and a JSON
    /// array or comma-separated list for lists. The whole configuration is
    /// re-validated, so enum and range errors are reported against `key`.
    /// Returns the stored value.
    pub fn set_value(&mut self, key: &str, raw: &str) -> Result<Value, AyulinkError> {
        let mut json = serde_json::to_value(&*self)?;

        let slot = key
            .split('.')
            .try_fold(&mut json, |node, part| node.get_mut(part))
            .ok_or_else(|| AyulinkError::Config(format!("unknown key: {}", key)))?;

        let value = typed_value(slot, raw)
            .ok_or_else(|| AyulinkError::Config(format!("invalid value for {}: {:?}", key, raw)))?;
        *slot = value.clone();

        *self = serde_json::from_value(json)
            .map_err(|e| AyulinkError::Config(format!("invalid value for {}: {}", key, e)))?;
        Ok(value)
    }
}

/// Parse `raw` into the same JSON type as `current`. Sections cannot be set whole.
fn typed_value(current: &Value, raw: &str) -> Option<Value> {
    let raw = raw.trim();
    match current {
        Value::String(_) => Some(Value::String(raw.to_string())),
        Value::Bool(_) => raw.parse::<bool>().ok().map(Value::Bool),
        Value::Number(_) => serde_json::from_str::<Value>(raw)
            .ok()
            .filter(Value::is_number),
        Value::Array(_) if raw.starts_with('[') => serde_json::from_str::<Value>(raw)
            .ok()
            .filter(Value::is_array),
        Value::Array(_) => Some(Value::Array(
            raw.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| Value::String(item.to_string()))
                .collect(),
        )),
        Value::Object(_) | Value::Null => None,
    }
}
