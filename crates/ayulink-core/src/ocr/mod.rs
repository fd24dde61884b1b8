//! OCR engines and image preprocessing.
//!
//! The engine is a capability chosen once at startup: [`TesseractEngine`]
//! when the executable can be run, [`MockOcrEngine`] otherwise.

mod mock;
mod preprocessing;
mod tesseract;

pub use mock::{MockOcrEngine, MOCK_OCR_TEXT};
pub use preprocessing::ImagePreprocessor;
pub use tesseract::TesseractEngine;

use std::path::Path;

use tracing::{info, warn};

use crate::error::OcrError;
use crate::models::config::{OcrBackend, OcrConfig, PdfConfig};

/// Converts a document on disk into raw text.
pub trait OcrEngine: Send + Sync {
    /// Short engine name for logs and diagnostics.
    fn name(&self) -> &str;

    /// Whether the engine can currently run.
    fn is_available(&self) -> bool;

    /// Recognize the text of an image or PDF file.
    ///
    /// An `Ok` with empty text means the engine ran and found nothing; any
    /// failure to run is an `Err`.
    fn recognize(&self, path: &Path) -> Result<String, OcrError>;
}

/// Build the engine selected by configuration.
pub fn create_engine(ocr: &OcrConfig, pdf: &PdfConfig) -> Box<dyn OcrEngine> {
    match ocr.backend {
        OcrBackend::Mock => {
            info!("Using mock OCR engine");
            Box::new(MockOcrEngine::new())
        }
        OcrBackend::Tesseract => {
            info!("Using tesseract OCR engine ({})", ocr.tesseract_path);
            Box::new(TesseractEngine::new(ocr, pdf))
        }
        OcrBackend::Auto => {
            let engine = TesseractEngine::new(ocr, pdf);
            if engine.is_available() {
                info!("Using tesseract OCR engine ({})", ocr.tesseract_path);
                Box::new(engine)
            } else {
                warn!(
                    "tesseract not available at {:?}, using mock OCR engine",
                    ocr.tesseract_path
                );
                Box::new(MockOcrEngine::new())
            }
        }
    }
}
