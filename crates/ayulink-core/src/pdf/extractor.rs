//! PDF text and image extraction using lopdf and pdf-extract.

use image::{DynamicImage, GrayImage, RgbImage};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, trace};

use super::{PdfProcessor, Result};
use crate::error::PdfError;

/// PDF content extractor using lopdf.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
        }
    }

    fn document(&self) -> Result<&Document> {
        self.document
            .as_ref()
            .ok_or_else(|| PdfError::Parse("no document loaded".to_string()))
    }

    /// Decode every image XObject in the document, in object order.
    ///
    /// Used when pages reference their scans indirectly (forms, inherited
    /// resources the page walk does not reach).
    pub fn extract_all_images(&self) -> Vec<DynamicImage> {
        let Some(doc) = self.document.as_ref() else {
            return Vec::new();
        };

        let images: Vec<DynamicImage> = doc
            .objects
            .values()
            .filter_map(|object| match object {
                Object::Stream(stream) => decode_image_stream(doc, stream),
                _ => None,
            })
            .collect();

        debug!("Found {} images in document", images.len());
        images
    }

    /// Resources dictionary of a page, following `Parent` links for inheritance.
    fn page_resources(&self, doc: &Document, page_id: ObjectId) -> Option<Dictionary> {
        let mut node_id = page_id;

        loop {
            let node = doc.get_dictionary(node_id).ok()?;

            if let Ok(resources) = node.get(b"Resources") {
                if let Ok((_, Object::Dictionary(dict))) = doc.dereference(resources) {
                    return Some(dict.clone());
                }
            }

            match node.get(b"Parent") {
                Ok(Object::Reference(parent_id)) => node_id = *parent_id,
                _ => return None,
            }
        }
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Scanned reports are often "encrypted" with an empty user password
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted = Vec::new();
            doc.save_to(&mut decrypted)
                .map_err(|e| PdfError::Parse(format!("failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_text(&self) -> Result<String> {
        self.document()?;
        pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }

    fn extract_images(&self, page: u32) -> Result<Vec<DynamicImage>> {
        let doc = self.document()?;
        let pages = doc.get_pages();
        let page_id = *pages.get(&page).ok_or(PdfError::InvalidPage(page))?;

        let mut images = Vec::new();

        let xobjects = self
            .page_resources(doc, page_id)
            .and_then(|resources| resources.get(b"XObject").ok().cloned());

        if let Some(xobjects) = xobjects {
            if let Ok((_, Object::Dictionary(dict))) = doc.dereference(&xobjects) {
                for (_name, reference) in dict.iter() {
                    if let Ok((_, Object::Stream(stream))) = doc.dereference(reference) {
                        if let Some(image) = decode_image_stream(doc, stream) {
                            images.push(image);
                        }
                    }
                }
            }
        }

        debug!("Extracted {} images from page {}", images.len(), page);
        Ok(images)
    }
}

/// Decode an image XObject stream, if its encoding is supported.
///
/// JPEG (`DCTDecode`) streams are decoded directly; otherwise 8-bit RGB and
/// gray samples are accepted. JPEG 2000, CCITT and JBIG2 are skipped.
fn decode_image_stream(doc: &Document, stream: &Stream) -> Option<DynamicImage> {
    let dict = &stream.dict;
    if dict.get(b"Subtype").ok()?.as_name().ok()? != b"Image" {
        return None;
    }

    let width = u32::try_from(dict.get(b"Width").ok()?.as_i64().ok()?).ok()?;
    let height = u32::try_from(dict.get(b"Height").ok()?.as_i64().ok()?).ok()?;
    trace!("Found image object: {}x{}", width, height);

    match first_name(doc, dict.get(b"Filter").ok()) {
        Some(b"DCTDecode") => {
            return image::load_from_memory_with_format(&stream.content, image::ImageFormat::Jpeg)
                .ok();
        }
        Some(filter @ (b"JPXDecode" | b"CCITTFaxDecode" | b"JBIG2Decode")) => {
            trace!("Skipping unsupported image filter {}", String::from_utf8_lossy(filter));
            return None;
        }
        _ => {}
    }

    let bits = dict
        .get(b"BitsPerComponent")
        .ok()
        .and_then(|o| o.as_i64().ok())
        .unwrap_or(8);
    if bits != 8 {
        trace!("Unsupported bits per component: {}", bits);
        return None;
    }

    let samples = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());
    let color_space = first_name(doc, dict.get(b"ColorSpace").ok()).unwrap_or(b"DeviceRGB");

    samples_to_image(samples, width, height, color_space)
}

/// Name of a PDF object that is a name, an array starting with a name, or a reference to one.
fn first_name<'a>(doc: &'a Document, object: Option<&'a Object>) -> Option<&'a [u8]> {
    match object? {
        Object::Name(name) => Some(name.as_slice()),
        Object::Array(items) => items.first().and_then(|o| o.as_name().ok()),
        Object::Reference(id) => doc.get_object(*id).ok().and_then(|o| o.as_name().ok()),
        _ => None,
    }
}

fn samples_to_image(
    mut samples: Vec<u8>,
    width: u32,
    height: u32,
    color_space: &[u8],
) -> Option<DynamicImage> {
    let pixels = width as usize * height as usize;

    match color_space {
        b"DeviceRGB" | b"RGB" if samples.len() >= pixels * 3 => {
            samples.truncate(pixels * 3);
            RgbImage::from_raw(width, height, samples).map(DynamicImage::ImageRgb8)
        }
        b"DeviceGray" | b"G" if samples.len() >= pixels => {
            samples.truncate(pixels);
            GrayImage::from_raw(width, height, samples).map(DynamicImage::ImageLuma8)
        }
        _ => {
            trace!(
                "Could not decode {} image samples as {}",
                samples.len(),
                String::from_utf8_lossy(color_space)
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::dictionary;

    fn hello_pdf() -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new("Tj", vec![Object::string_literal("Patient Name: John Doe")]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut data = Vec::new();
        doc.save_to(&mut data).unwrap();
        data
    }

    #[test]
    fn test_pdf_extractor_new() {
        let extractor = PdfExtractor::new();
        assert!(extractor.document.is_none());
        assert_eq!(extractor.page_count(), 0);
        assert!(extractor.extract_text().is_err());
    }

    #[test]
    fn test_load_rejects_garbage() {
        let mut extractor = PdfExtractor::new();
        let err = extractor.load(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, PdfError::Parse(_)));
    }

    #[test]
    fn test_text_pdf_has_no_images() {
        let mut extractor = PdfExtractor::new();
        extractor.load(&hello_pdf()).unwrap();

        assert_eq!(extractor.page_count(), 1);
        assert!(extractor.extract_images(1).unwrap().is_empty());
        assert!(extractor.extract_all_images().is_empty());
        assert!(matches!(extractor.extract_images(2), Err(PdfError::InvalidPage(2))));
    }

    #[test]
    fn test_extracts_embedded_text() {
        let mut extractor = PdfExtractor::new();
        extractor.load(&hello_pdf()).unwrap();

        let text = extractor.extract_text().unwrap();
        assert!(text.contains("Patient Name: John Doe"), "extracted {:?}", text);
    }

    #[test]
    fn test_raw_gray_samples() {
        let image = samples_to_image(vec![0, 64, 128, 255], 2, 2, b"DeviceGray").unwrap();
        let luma = image.as_luma8().unwrap();
        assert_eq!(luma.get_pixel(1, 1)[0], 255);

        assert!(samples_to_image(vec![0, 1], 2, 2, b"DeviceGray").is_none());
        assert!(samples_to_image(vec![0; 12], 2, 2, b"DeviceCMYK").is_none());
    }
}
