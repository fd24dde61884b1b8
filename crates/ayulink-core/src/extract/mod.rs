//! Key-value field extraction from OCR text.

mod key_value;
pub mod patterns;

pub use key_value::{
    extract_key_value_pairs, ExtractionResult, KeyValueExtractor, DEFAULT_MAX_KEY_LENGTH,
};
