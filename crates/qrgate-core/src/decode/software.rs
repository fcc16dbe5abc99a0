// Software QR decoding with rqrr.
//
// Large photos are downscaled first so the longer edge is at most
// `MAX_DECODE_EDGE`; decode time on phone-camera uploads stays bounded.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, GrayImage};
use tracing::trace;

use super::{DecodeError, DecodeStrategy};

/// Longest edge, in pixels, handed to the grid detector.
pub const MAX_DECODE_EDGE: u32 = 800;

/// [`DecodeStrategy`] that rasterizes to luma and runs rqrr.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftwareDecoder;

impl SoftwareDecoder {
    /// Downscale (never upscale) and convert to 8-bit luma.
    pub fn prepare(self, image: &DynamicImage) -> GrayImage {
        let (w, h) = image.dimensions();
        if w.max(h) <= MAX_DECODE_EDGE {
            return image.to_luma8();
        }
        image
            .resize(MAX_DECODE_EDGE, MAX_DECODE_EDGE, FilterType::Triangle)
            .to_luma8()
    }
}

impl DecodeStrategy for SoftwareDecoder {
    fn name(&self) -> &'static str {
        "software"
    }

    fn decode(&self, image: &DynamicImage) -> Result<Option<String>, DecodeError> {
        let luma = self.prepare(image);
        let (w, h) = luma.dimensions();
        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
            w as usize,
            h as usize,
            |x, y| luma.get_pixel(x as u32, y as u32).0[0],
        );

        for grid in prepared.detect_grids() {
            match grid.decode() {
                Ok((_meta, content)) if !content.is_empty() => return Ok(Some(content)),
                Ok(_) => {}
                Err(e) => trace!(error = ?e, "grid found but not decodable"),
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::decode::test_support::{qr_image, solid_image};

    #[test]
    fn solid_color_image_is_none() {
        let decoder = SoftwareDecoder::default();
        assert!(decoder.decode(&solid_image(640, 480, 255)).unwrap().is_none());
        assert!(decoder.decode(&solid_image(64, 64, 0)).unwrap().is_none());
    }

    #[test]
    fn decodes_rendered_code() {
        let img = qr_image("ABC123", 8);
        let got = SoftwareDecoder::default().decode(&img).unwrap();
        assert_eq!(got.as_deref(), Some("ABC123"));
    }

    #[test]
    fn decodes_after_downscaling_large_image() {
        let img = qr_image("https://rme.app/qr/code/BIG", 40);
        assert!(img.width() > MAX_DECODE_EDGE);
        let got = SoftwareDecoder::default().decode(&img).unwrap();
        assert_eq!(got.as_deref(), Some("https://rme.app/qr/code/BIG"));
    }

    #[test]
    fn prepare_bounds_longer_edge_and_keeps_aspect() {
        let decoder = SoftwareDecoder::default();
        let luma = decoder.prepare(&solid_image(1600, 1200, 128));
        assert_eq!(luma.dimensions(), (800, 600));

        let tall = decoder.prepare(&solid_image(900, 3600, 128));
        assert_eq!(tall.dimensions(), (200, 800));
    }

    #[test]
    fn prepare_never_upscales() {
        let luma = SoftwareDecoder::default().prepare(&solid_image(300, 200, 10));
        assert_eq!(luma.dimensions(), (300, 200));
    }
}
