// Platform barcode detector adapter.
//
// Embedders on platforms with an OS-level detector (mobile vision APIs,
// browser shape detection via FFI) implement `PlatformDetector`; this crate
// never ships one itself.

use std::sync::Arc;

use image::DynamicImage;

use super::{DecodeError, DecodeStrategy};

/// Barcode symbologies a platform detector may report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BarcodeFormat {
    QrCode,
    DataMatrix,
    Aztec,
    Code128,
    Ean13,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedBarcode {
    pub format: BarcodeFormat,
    pub raw_value: String,
}

/// A detector provided by the host platform.
pub trait PlatformDetector: Send + Sync {
    fn name(&self) -> &'static str;

    /// Formats this detector can find.
    fn supported_formats(&self) -> Vec<BarcodeFormat>;

    /// Detect barcodes of the requested `formats` in `image`.
    fn detect(
        &self,
        image: &DynamicImage,
        formats: &[BarcodeFormat],
    ) -> Result<Vec<DetectedBarcode>, DecodeError>;
}

/// [`DecodeStrategy`] backed by a [`PlatformDetector`], QR format only.
pub struct NativeDetector {
    detector: Arc<dyn PlatformDetector>,
}

impl NativeDetector {
    pub fn new(detector: Arc<dyn PlatformDetector>) -> Self {
        Self { detector }
    }
}

impl DecodeStrategy for NativeDetector {
    fn name(&self) -> &'static str {
        "native"
    }

    fn decode(&self, image: &DynamicImage) -> Result<Option<String>, DecodeError> {
        let found = self.detector.detect(image, &[BarcodeFormat::QrCode])?;
        Ok(found
            .into_iter()
            .find(|b| b.format == BarcodeFormat::QrCode && !b.raw_value.is_empty())
            .map(|b| b.raw_value))
    }
}
