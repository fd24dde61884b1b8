//! Document pipeline: OCR engine followed by key-value extraction.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::error::{AyulinkError, Result};
use crate::extract::KeyValueExtractor;
use crate::models::config::AyulinkConfig;
use crate::models::report::OcrReport;
use crate::ocr::{create_engine, OcrEngine};

/// Runs an [`OcrEngine`] on a file and structures the recognized text.
pub struct DocumentProcessor {
    engine: Box<dyn OcrEngine>,
    extractor: KeyValueExtractor,
}

impl DocumentProcessor {
    pub fn new(engine: Box<dyn OcrEngine>, extractor: KeyValueExtractor) -> Self {
        Self { engine, extractor }
    }

    /// Build the engine and extractor described by `config`.
    pub fn from_config(config: &AyulinkConfig) -> Self {
        let engine = create_engine(&config.ocr, &config.pdf);
        let extractor =
            KeyValueExtractor::new().with_max_key_length(config.extraction.max_key_length);
        Self::new(engine, extractor)
    }

    pub fn engine(&self) -> &dyn OcrEngine {
        self.engine.as_ref()
    }

    /// Process one file.
    ///
    /// A missing file is an error. An engine failure is not: it yields a
    /// report with `success: false`, the diagnostic in `ocr_text`, and no
    /// pairs.
    pub fn process_file(&self, path: &Path) -> Result<OcrReport> {
        if !path.exists() {
            return Err(AyulinkError::FileNotFound(path.to_path_buf()));
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let start = Instant::now();
        info!("Processing {} with {} engine", path.display(), self.engine.name());

        let report = match self.engine.recognize(path) {
            Ok(text) => {
                let key_value_pairs = self.extractor.extract(&text);
                OcrReport {
                    success: true,
                    file_name,
                    ocr_text: text,
                    key_value_pairs,
                }
            }
            Err(e) => {
                warn!("OCR failed for {}: {}", path.display(), e);
                OcrReport::failed(file_name, e)
            }
        };

        debug!(
            "Processed {} in {}ms: {} pairs",
            path.display(),
            start.elapsed().as_millis(),
            report.key_value_pairs.len()
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OcrError;
    use crate::models::report::KeyValuePair;
    use crate::ocr::{MockOcrEngine, MOCK_OCR_TEXT};
    use pretty_assertions::assert_eq;

    struct FixedEngine(&'static str);

    impl OcrEngine for FixedEngine {
        fn name(&self) -> &str {
            "fixed"
        }
        fn is_available(&self) -> bool {
            true
        }
        fn recognize(&self, _path: &Path) -> std::result::Result<String, OcrError> {
            Ok(self.0.to_string())
        }
    }

    struct BrokenEngine;

    impl OcrEngine for BrokenEngine {
        fn name(&self) -> &str {
            "broken"
        }
        fn is_available(&self) -> bool {
            false
        }
        fn recognize(&self, _path: &Path) -> std::result::Result<String, OcrError> {
            Err(OcrError::Recognition("engine exploded".to_string()))
        }
    }

    fn scan_file(dir: &tempfile::TempDir) -> std::path::PathBuf {
        let path = dir.path().join("visit.jpg");
        std::fs::write(&path, b"jpeg bytes").unwrap();
        path
    }

    #[test]
    fn test_successful_recognition() {
        let dir = tempfile::tempdir().unwrap();
        let processor = DocumentProcessor::new(
            Box::new(FixedEngine("Patient Name: John Doe\nDate: 2023-10-15")),
            KeyValueExtractor::new(),
        );

        let report = processor.process_file(&scan_file(&dir)).unwrap();
        assert_eq!(
            report,
            OcrReport {
                success: true,
                file_name: "visit.jpg".to_string(),
                ocr_text: "Patient Name: John Doe\nDate: 2023-10-15".to_string(),
                key_value_pairs: vec![
                    KeyValuePair::new("Patient Name", "John Doe"),
                    KeyValuePair::new("Date", "2023-10-15"),
                ],
            }
        );
    }

    #[test]
    fn test_empty_text_is_success() {
        let dir = tempfile::tempdir().unwrap();
        let processor = DocumentProcessor::new(Box::new(FixedEngine("")), KeyValueExtractor::new());

        let report = processor.process_file(&scan_file(&dir)).unwrap();
        assert!(report.success);
        assert!(report.key_value_pairs.is_empty());
    }

    #[test]
    fn test_engine_failure_is_reported_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let processor = DocumentProcessor::new(Box::new(BrokenEngine), KeyValueExtractor::new());

        let report = processor.process_file(&scan_file(&dir)).unwrap();
        assert!(!report.success);
        assert_eq!(report.ocr_text, "OCR Error: text recognition failed: engine exploded");
        assert!(report.key_value_pairs.is_empty());
    }

    #[test]
    fn test_missing_file() {
        let processor = DocumentProcessor::new(Box::new(MockOcrEngine::new()), KeyValueExtractor::new());
        let err = processor.process_file(Path::new("/no/such/scan.jpg")).unwrap_err();
        assert!(matches!(err, AyulinkError::FileNotFound(_)));
        assert_eq!(err.to_string(), "File not found");
    }

    #[test]
    fn test_mock_engine_report() {
        let dir = tempfile::tempdir().unwrap();
        let processor = DocumentProcessor::new(Box::new(MockOcrEngine::new()), KeyValueExtractor::new());

        let report = processor.process_file(&scan_file(&dir)).unwrap();
        assert!(report.success);
        assert_eq!(report.ocr_text, MOCK_OCR_TEXT);
        assert_eq!(report.get("Diagnosis"), Some("Routine Checkup"));
        assert_eq!(report.key_value_pairs.len(), 5);
    }
}
