//! Diagnostic OCR engine used when no real engine is available.

use std::path::Path;

use tracing::debug;

use crate::error::OcrError;

use super::OcrEngine;

/// Fixed text returned by [`MockOcrEngine`] for every input.
pub const MOCK_OCR_TEXT: &str = "Mock OCR result: This is a sample text extracted from the image.\n\
Patient Name: John Doe\n\
Date: 2023-10-15\n\
Diagnosis: Routine Checkup\n\
Prescription: Vitamin D 1000 IU daily";

/// Engine that never reads its input and always returns [`MOCK_OCR_TEXT`].
#[derive(Debug, Clone, Default)]
pub struct MockOcrEngine;

impl MockOcrEngine {
    pub fn new() -> Self {
        Self
    }
}

impl OcrEngine for MockOcrEngine {
    fn name(&self) -> &str {
        "mock"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn recognize(&self, path: &Path) -> Result<String, OcrError> {
        debug!("Mock OCR for {}", path.display());
        Ok(MOCK_OCR_TEXT.to_string())
    }
}
