//! Core library for Ayulink medical document OCR.
//!
//! This crate provides:
//! - Key-value extraction from raw OCR text
//! - OCR engine selection (tesseract or a diagnostic mock) and image preprocessing
//! - PDF text and image access
//! - The document pipeline and flat-file result storage

pub mod error;
pub mod extract;
pub mod models;
pub mod ocr;
pub mod pdf;
pub mod pipeline;
pub mod storage;

pub use error::{AyulinkError, Result};
pub use extract::{extract_key_value_pairs, ExtractionResult, KeyValueExtractor};
pub use models::config::AyulinkConfig;
pub use models::report::{KeyValuePair, OcrReport};
pub use ocr::{create_engine, MockOcrEngine, OcrEngine, TesseractEngine};
pub use pdf::{PdfExtractor, PdfProcessor};
pub use pipeline::DocumentProcessor;
pub use storage::ResultStore;
