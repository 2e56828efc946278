//! Inline thumbnail encoding for display surfaces.

use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use std::io::Cursor;

/// Encode a bounded, aspect-preserved JPEG thumbnail as a
/// `data:image/jpeg;base64,...` string.
///
/// Returns `None` on any encoding error; thumbnails are decoration and
/// must never fail the pipeline.
pub fn encode(image: &DynamicImage, max_dimension: u32, quality: u8) -> Option<String> {
    if max_dimension == 0 {
        return None;
    }
    let thumbnail = image.resize(max_dimension, max_dimension, FilterType::Lanczos3);

    let mut cursor = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut cursor, quality.clamp(1, 100));
    thumbnail.to_rgb8().write_with_encoder(encoder).ok()?;

    let payload = base64::engine::general_purpose::STANDARD.encode(cursor.into_inner());
    Some(format!("data:image/jpeg;base64,{payload}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn test_thumbnail_is_data_uri() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(300, 200));
        let thumb = encode(&image, 150, 85).unwrap();
        assert!(thumb.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_thumbnail_respects_bound() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(600, 300));
        let thumb = encode(&image, 150, 85).unwrap();
        let payload = thumb.trim_start_matches("data:image/jpeg;base64,");
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload)
            .unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert!(decoded.width() <= 150 && decoded.height() <= 150);
        // Aspect ratio preserved: 2:1 input stays 2:1.
        assert_eq!(decoded.width(), 150);
        assert_eq!(decoded.height(), 75);
    }

    #[test]
    fn test_zero_bound_yields_none() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(10, 10));
        assert!(encode(&image, 0, 85).is_none());
    }
}
