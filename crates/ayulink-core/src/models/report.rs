//! OCR report data models shared by the HTTP service, CLI, and result store.

use serde::{Deserialize, Serialize};

/// A labeled field extracted from document text, e.g. "Diagnosis" -> "Routine Checkup".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValuePair {
    /// Field label, trimmed and stripped of trailing separators.
    pub key: String,

    /// Field value, trimmed and non-empty.
    pub value: String,
}

impl KeyValuePair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Result of running the document pipeline on one file.
///
/// This is the `ocr_result` object returned by the upload endpoint and the
/// content of every persisted `<name>_ocr.json` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrReport {
    /// False when the OCR engine failed; `ocr_text` then carries the diagnostic.
    pub success: bool,

    /// Base name of the processed file.
    pub file_name: String,

    /// Raw recognized text, or an `OCR Error: ...` diagnostic.
    pub ocr_text: String,

    /// Extracted fields in order of first appearance.
    pub key_value_pairs: Vec<KeyValuePair>,
}

impl OcrReport {
    /// Report for a failed recognition. The extractor is not run on the diagnostic.
    pub fn failed(file_name: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self {
            success: false,
            file_name: file_name.into(),
            ocr_text: format!("OCR Error: {}", reason),
            key_value_pairs: Vec::new(),
        }
    }

    /// Look up a field by key, ignoring case.
    pub fn get(&self, key: &str) -> Option<&str> {
        let key = key.to_lowercase();
        self.key_value_pairs
            .iter()
            .find(|pair| pair.key.to_lowercase() == key)
            .map(|pair| pair.value.as_str())
    }
}
