//! Best-effort image preprocessing for OCR accuracy.
//!
//! Normalizes an image before recognition: 3-channel color, boosted
//! contrast and sharpness, slightly raised brightness, then a 3x3 median
//! filter to suppress speckle noise. Preprocessing never aborts the
//! pipeline: byte-level entry points fall back to the original input on
//! any failure.

use image::{imageops, DynamicImage, ImageFormat, Rgb, RgbImage};
use imageproc::filter::median_filter;
use std::io::Cursor;

/// Multiplicative contrast boost around the midpoint.
const CONTRAST_FACTOR: f32 = 1.5;
/// Multiplicative brightness boost.
const BRIGHTNESS_FACTOR: f32 = 1.2;
/// Unsharp mask parameters for the sharpness step.
const SHARPEN_SIGMA: f32 = 1.0;
const SHARPEN_THRESHOLD: i32 = 2;

/// Apply the OCR enhancement chain to a decoded image.
///
/// The result is always RGB8. The individual transforms are infallible
/// on a decoded image, so this cannot fail; decode errors are the
/// caller's concern.
pub fn enhance_for_ocr(image: &DynamicImage) -> DynamicImage {
    let rgb = image.to_rgb8();
    let contrasted = map_channels(&rgb, |v| (v - 128.0) * CONTRAST_FACTOR + 128.0);
    let sharpened = imageops::unsharpen(&contrasted, SHARPEN_SIGMA, SHARPEN_THRESHOLD);
    let brightened = map_channels(&sharpened, |v| v * BRIGHTNESS_FACTOR);
    let filtered = median_filter(&brightened, 1, 1);
    DynamicImage::ImageRgb8(filtered)
}

/// Decode, enhance, and re-encode image bytes as PNG.
///
/// Returns `None` when the input cannot be decoded or the result cannot
/// be encoded; callers fall back to the original bytes.
pub fn preprocess_bytes(input: &[u8]) -> Option<Vec<u8>> {
    let image = image::load_from_memory(input).ok()?;
    encode_png(&enhance_for_ocr(&image))
}

/// Encode an image as PNG bytes, absorbing encoder errors.
pub fn encode_png(image: &DynamicImage) -> Option<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    image.write_to(&mut cursor, ImageFormat::Png).ok()?;
    Some(cursor.into_inner())
}

fn map_channels(image: &RgbImage, f: impl Fn(f32) -> f32) -> RgbImage {
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        let Rgb([r, g, b]) = *pixel;
        *pixel = Rgb([
            f(r as f32).clamp(0.0, 255.0) as u8,
            f(g as f32).clamp(0.0, 255.0) as u8,
            f(b as f32).clamp(0.0, 255.0) as u8,
        ]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard(width: u32, height: u32) -> DynamicImage {
        let buf = RgbImage::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                Rgb([40, 40, 40])
            } else {
                Rgb([200, 200, 200])
            }
        });
        DynamicImage::ImageRgb8(buf)
    }

    #[test]
    fn test_enhance_preserves_dimensions() {
        let image = checkerboard(32, 24);
        let enhanced = enhance_for_ocr(&image);
        assert_eq!(enhanced.width(), 32);
        assert_eq!(enhanced.height(), 24);
    }

    #[test]
    fn test_enhance_converts_to_rgb() {
        let gray = DynamicImage::ImageLuma8(image::GrayImage::new(8, 8));
        let enhanced = enhance_for_ocr(&gray);
        assert!(matches!(enhanced, DynamicImage::ImageRgb8(_)));
    }

    #[test]
    fn test_preprocess_bytes_round_trip() {
        let png = encode_png(&checkerboard(16, 16)).unwrap();
        let processed = preprocess_bytes(&png).unwrap();
        assert!(image::load_from_memory(&processed).is_ok());
    }

    #[test]
    fn test_preprocess_bytes_rejects_garbage() {
        assert!(preprocess_bytes(b"not an image at all").is_none());
    }
}
