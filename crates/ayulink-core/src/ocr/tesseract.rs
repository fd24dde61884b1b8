//! OCR engine wrapping the `tesseract` command-line tool.

use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;
use std::time::Instant;

use image::DynamicImage;
use tracing::{debug, info, warn};

use crate::error::OcrError;
use crate::models::config::{OcrConfig, PdfConfig};
use crate::pdf::{PdfExtractor, PdfProcessor};

use super::{ImagePreprocessor, OcrEngine};

/// OCR engine backed by the `tesseract` executable.
///
/// Images are enhanced by the [`ImagePreprocessor`] and written to a
/// temporary PNG before recognition. PDFs use their embedded text when there
/// is enough of it, otherwise their embedded page images are recognized.
pub struct TesseractEngine {
    executable: String,
    language: String,
    preprocessor: ImagePreprocessor,
    pdf: PdfConfig,
}

impl TesseractEngine {
    pub fn new(config: &OcrConfig, pdf: &PdfConfig) -> Self {
        Self {
            executable: config.tesseract_path.clone(),
            language: config.language.clone(),
            preprocessor: ImagePreprocessor::new()
                .with_enabled(config.preprocess)
                .with_kernel_size(config.morph_kernel_size),
            pdf: pdf.clone(),
        }
    }

    /// Recognize text in an image file.
    fn recognize_image_file(&self, path: &Path) -> Result<String, OcrError> {
        match self.preprocessor.enhance(path) {
            Some(enhanced) => self.recognize_image(&enhanced),
            // No enhancement available: let tesseract read the original file
            None => self.run(path),
        }
    }

    /// Recognize text in a decoded image via a temporary PNG.
    fn recognize_image(&self, image: &DynamicImage) -> Result<String, OcrError> {
        let temp_dir = tempfile::Builder::new()
            .prefix("ayulink-ocr")
            .tempdir()
            .map_err(|e| OcrError::Recognition(format!("failed to create temp dir: {}", e)))?;

        let input_path = temp_dir.path().join("input.png");
        image
            .save(&input_path)
            .map_err(|e| OcrError::Recognition(format!("failed to write temp image: {}", e)))?;

        self.run(&input_path)
    }

    fn recognize_pdf(&self, path: &Path) -> Result<String, OcrError> {
        let data = std::fs::read(path)
            .map_err(|e| OcrError::InvalidInput(format!("{}: {}", path.display(), e)))?;

        let mut extractor = PdfExtractor::new();
        extractor.load(&data)?;

        let embedded = if self.pdf.prefer_embedded_text {
            extractor.extract_text().unwrap_or_else(|e| {
                warn!("Embedded text extraction failed: {}", e);
                String::new()
            })
        } else {
            String::new()
        };

        if embedded.trim().chars().count() >= self.pdf.min_text_length {
            info!("Using embedded PDF text ({} chars)", embedded.len());
            return Ok(embedded);
        }

        let mut page_count = extractor.page_count() as usize;
        if self.pdf.max_pages > 0 {
            page_count = page_count.min(self.pdf.max_pages);
        }

        let mut images = Vec::new();
        for page in 1..=page_count as u32 {
            match extractor.extract_images(page) {
                Ok(found) => images.extend(found),
                Err(e) => warn!("Failed to extract images from page {}: {}", page, e),
            }
        }
        if images.is_empty() {
            images = extractor.extract_all_images();
        }

        if images.is_empty() {
            if embedded.trim().is_empty() {
                return Err(OcrError::NoContent(format!(
                    "{} has neither text nor decodable images",
                    path.display()
                )));
            }
            debug!("No images in PDF, returning short embedded text");
            return Ok(embedded);
        }

        debug!("Recognizing {} images from PDF", images.len());

        let mut texts = Vec::with_capacity(images.len());
        for (i, image) in images.iter().enumerate() {
            let prepared = if self.preprocessor.is_enabled() {
                self.preprocessor.enhance_image(image)
            } else {
                image.clone()
            };
            let text = self.recognize_image(&prepared)?;
            if text.trim().is_empty() {
                debug!("No text detected in image {}", i + 1);
            } else {
                texts.push(text);
            }
        }

        Ok(texts.join("\n\n"))
    }

    /// Run tesseract on a file and return its stdout.
    fn run(&self, input: &Path) -> Result<String, OcrError> {
        let start = Instant::now();

        let output = Command::new(&self.executable)
            .arg(input)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => OcrError::Unavailable(format!(
                    "{} not found (is tesseract installed?)",
                    self.executable
                )),
                _ => OcrError::Recognition(format!("failed to run {}: {}", self.executable, e)),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Recognition(format!(
                "tesseract failed: {}",
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        info!(
            "OCR complete: {} chars in {}ms",
            text.len(),
            start.elapsed().as_millis()
        );

        Ok(text)
    }
}

impl OcrEngine for TesseractEngine {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn is_available(&self) -> bool {
        Command::new(&self.executable)
            .arg("--version")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    fn recognize(&self, path: &Path) -> Result<String, OcrError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        info!("Running tesseract on {}", path.display());

        match extension.as_str() {
            "pdf" => self.recognize_pdf(path),
            _ => self.recognize_image_file(path),
        }
    }
}
