//! Error types for the ayulink-core library.

use thiserror::Error;

/// Main error type for the ayulink library.
#[derive(Error, Debug)]
pub enum AyulinkError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Upload or result storage error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Image processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Input file does not exist.
    #[error("File not found")]
    FileNotFound(std::path::PathBuf),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The configured engine cannot run (missing executable, bad setup).
    #[error("engine unavailable: {0}")]
    Unavailable(String),

    /// The input could not be read as an image or document.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Nothing in the document could be recognized.
    #[error("no recognizable content: {0}")]
    NoContent(String),

    /// PDF access failed while collecting pages to recognize.
    #[error(transparent)]
    Pdf(#[from] PdfError),
}

/// Errors related to the upload and result store.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Requested upload or result does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Name contains path components or is otherwise unusable.
    #[error("invalid file name: {0:?}")]
    InvalidName(String),

    /// Extension is not on the allow-list.
    #[error("file type not allowed: {0}")]
    NotAllowed(String),

    /// Stored result could not be decoded.
    #[error("corrupt result {name}: {reason}")]
    Corrupt { name: String, reason: String },

    /// Underlying filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the ayulink library.
pub type Result<T> = std::result::Result<T, AyulinkError>;
