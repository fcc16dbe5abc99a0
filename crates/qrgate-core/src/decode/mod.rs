// ── Decode strategies ──
//
// A `DecodeStrategy` turns a bitmap into at most one QR payload. Two
// implementations exist: `NativeDetector` wraps a platform-provided barcode
// detector, `SoftwareDecoder` runs rqrr on a downscaled luma raster.
// `select_strategy` chooses once and callers never branch on the backend.
//
// "No code in this image" is `Ok(None)`. Errors are reserved for I/O and
// broken detectors.

mod native;
mod software;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{DynamicImage, ImageError};
use thiserror::Error;
use tracing::debug;

pub use native::{BarcodeFormat, DetectedBarcode, NativeDetector, PlatformDetector};
pub use software::{MAX_DECODE_EDGE, SoftwareDecoder};

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Cannot read image {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot load {} as an image: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: ImageError,
    },

    #[error("Cannot load uploaded bytes as an image: {0}")]
    Bytes(#[source] ImageError),

    #[error("Barcode detector failed: {0}")]
    Detector(String),
}

/// Capability interface over the available QR decoders.
pub trait DecodeStrategy: Send + Sync {
    /// Short backend name for logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Decode the first QR code in `image`, if any.
    fn decode(&self, image: &DynamicImage) -> Result<Option<String>, DecodeError>;
}

/// Pick the decode backend once.
///
/// A platform detector wins when one is present and it reports QR support;
/// otherwise the software decoder is used.
pub fn select_strategy(platform: Option<Arc<dyn PlatformDetector>>) -> Arc<dyn DecodeStrategy> {
    match platform {
        Some(detector) if detector.supported_formats().contains(&BarcodeFormat::QrCode) => {
            debug!(detector = detector.name(), "using platform barcode detector");
            Arc::new(NativeDetector::new(detector))
        }
        Some(detector) => {
            debug!(
                detector = detector.name(),
                "platform detector lacks QR support, using software decoder"
            );
            Arc::new(SoftwareDecoder::default())
        }
        None => {
            debug!("no platform detector, using software decoder");
            Arc::new(SoftwareDecoder::default())
        }
    }
}

/// Load a file into a pixel-addressable bitmap.
pub fn load_bitmap(path: &Path) -> Result<DynamicImage, DecodeError> {
    image::open(path).map_err(|e| match e {
        ImageError::IoError(source) => DecodeError::Io {
            path: path.to_path_buf(),
            source,
        },
        source => DecodeError::Image {
            path: path.to_path_buf(),
            source,
        },
    })
}

/// Load an in-memory upload (format sniffed from the bytes).
pub fn load_bitmap_from_bytes(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    image::load_from_memory(bytes).map_err(DecodeError::Bytes)
}

/// Decode a still image from disk with the given strategy.
pub fn decode_image(path: &Path, strategy: &dyn DecodeStrategy) -> Result<Option<String>, DecodeError> {
    let bitmap = load_bitmap(path)?;
    let result = strategy.decode(&bitmap)?;
    debug!(
        path = %path.display(),
        backend = strategy.name(),
        found = result.is_some(),
        "decoded still image"
    );
    Ok(result)
}

#[cfg(test)]
pub(crate) mod test_support {
    use image::{DynamicImage, GrayImage, Luma};
    use qrcode::{Color, QrCode};

    /// Render `payload` as a QR code with `scale` px modules and a 4-module
    /// quiet zone.
    #[allow(clippy::unwrap_used)]
    pub(crate) fn qr_image(payload: &str, scale: u32) -> DynamicImage {
        let code = QrCode::new(payload.as_bytes()).unwrap();
        let modules = u32::try_from(code.width()).unwrap();
        let quiet = 4;
        let side = (modules + 2 * quiet) * scale;
        let img = GrayImage::from_fn(side, side, |x, y| {
            let mx = (x / scale).checked_sub(quiet);
            let my = (y / scale).checked_sub(quiet);
            match (mx, my) {
                (Some(mx), Some(my)) if mx < modules && my < modules => {
                    let dark = code[(mx as usize, my as usize)] == Color::Dark;
                    Luma([if dark { 0 } else { 255 }])
                }
                _ => Luma([255]),
            }
        });
        DynamicImage::ImageLuma8(img)
    }

    pub(crate) fn solid_image(width: u32, height: u32, value: u8) -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_pixel(width, height, Luma([value])))
    }
}
