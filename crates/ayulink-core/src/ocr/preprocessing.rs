//! Image enhancement ahead of OCR: grayscale, Otsu binarization, opening.

use std::path::Path;

use image::DynamicImage;
use imageproc::contrast::{otsu_level, threshold, ThresholdType};
use imageproc::distance_transform::Norm;
use imageproc::morphology::open;
use tracing::{debug, warn};

/// Image preprocessor for the OCR pipeline.
#[derive(Debug, Clone)]
pub struct ImagePreprocessor {
    /// Whether enhancement runs at all.
    enabled: bool,
    /// Side of the square structuring element used for opening. Even sizes
    /// round down to the next odd size.
    kernel_size: u32,
}

impl ImagePreprocessor {
    /// Create a new preprocessor with default settings.
    pub fn new() -> Self {
        Self {
            enabled: true,
            kernel_size: 1,
        }
    }

    /// Turn enhancement on or off.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the opening kernel size. Values below 1 are treated as 1.
    pub fn with_kernel_size(mut self, size: u32) -> Self {
        self.kernel_size = size.max(1);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Read and enhance an image file.
    ///
    /// Returns `None` when enhancement is disabled or the file cannot be
    /// decoded; callers then hand the original file to the engine.
    pub fn enhance(&self, path: &Path) -> Option<DynamicImage> {
        if !self.enabled {
            return None;
        }

        match image::open(path) {
            Ok(image) => Some(self.enhance_image(&image)),
            Err(e) => {
                warn!("Error preprocessing image {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Enhance an already decoded image.
    pub fn enhance_image(&self, image: &DynamicImage) -> DynamicImage {
        let gray = image.to_luma8();
        let level = otsu_level(&gray);
        debug!(
            "Binarizing {}x{} image at Otsu level {}",
            gray.width(),
            gray.height(),
            level
        );

        let binary = threshold(&gray, level, ThresholdType::Binary);

        let radius = self.opening_radius();
        if radius == 0 {
            return DynamicImage::ImageLuma8(binary);
        }
        DynamicImage::ImageLuma8(open(&binary, Norm::LInf, radius))
    }

    /// Chebyshev radius of the square kernel.
    fn opening_radius(&self) -> u8 {
        u8::try_from((self.kernel_size - 1) / 2).unwrap_or(u8::MAX)
    }
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::new()
    }
}
