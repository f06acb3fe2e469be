use caption_core::{clamp01, CaptionError, OutputFormat, Result};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbaImage};

/// Encode the finished canvas. `quality` is ignored for png.
pub fn encode_rgba(canvas: &RgbaImage, format: OutputFormat, quality: Option<f32>) -> Result<Vec<u8>> {
    let (w, h) = canvas.dimensions();
    let quality = quality.map(clamp01).unwrap_or(1.0);
    let mut buf = Vec::new();

    let written = match format {
        OutputFormat::Png => PngEncoder::new(&mut buf).write_image(canvas.as_raw(), w, h, ExtendedColorType::Rgba8),
        OutputFormat::Jpeg => {
            // jpeg has no alpha channel
            let rgb = DynamicImage::ImageRgba8(canvas.clone()).into_rgb8();
            let q = (quality * 100.0).round().clamp(1.0, 100.0) as u8;
            JpegEncoder::new_with_quality(&mut buf, q).write_image(rgb.as_raw(), w, h, ExtendedColorType::Rgb8)
        }
        OutputFormat::Webp => {
            let mut data = canvas.as_raw().clone();
            quantize_rgb_for_webp(&mut data, quality);
            WebPEncoder::new_lossless(&mut buf).write_image(&data, w, h, ExtendedColorType::Rgba8)
        }
    };
    written.map_err(|e| CaptionError::EncodeFailure { format, reason: e.to_string() })?;

    if buf.is_empty() {
        return Err(CaptionError::EncodeFailure { format, reason: "encoder returned no data".into() });
    }
    Ok(buf)
}

/// The webp encoder is lossless only, so quality becomes a coarser RGB palette.
/// Alpha is left alone.
fn quantize_rgb_for_webp(data: &mut [u8], quality: f32) {
    if quality >= 1.0 {
        return;
    }
    let levels = webp_levels(quality);
    let step = 255.0 / (levels - 1.0);
    for pixel in data.chunks_exact_mut(4) {
        for channel in pixel.iter_mut().take(3) {
            let bucket = (*channel as f32 / step).round();
            *channel = (bucket * step).round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// Finer palettes at high quality, aggressively coarse at the bottom.
fn webp_levels(quality: f32) -> f32 {
    let q = quality.clamp(0.01, 1.0);
    (2.0 + q * q * 254.0).round().clamp(2.0, 256.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgba};

    fn gradient() -> RgbaImage {
        RgbaImage::from_fn(64, 32, |x, y| Rgba([(x * 4) as u8, (y * 8) as u8, 90, 255]))
    }

    #[test]
    fn png_round_trips_dimensions() {
        let bytes = encode_rgba(&gradient(), OutputFormat::Png, None).unwrap();
        let back = image::load_from_memory(&bytes).unwrap();
        assert_eq!(back.dimensions(), (64, 32));
        assert_eq!(back.to_rgba8(), gradient());
    }

    #[test]
    fn png_ignores_quality() {
        let a = encode_rgba(&gradient(), OutputFormat::Png, Some(0.1)).unwrap();
        let b = encode_rgba(&gradient(), OutputFormat::Png, Some(0.9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn jpeg_quality_changes_output() {
        let lo = encode_rgba(&gradient(), OutputFormat::Jpeg, Some(0.1)).unwrap();
        let hi = encode_rgba(&gradient(), OutputFormat::Jpeg, Some(0.95)).unwrap();
        assert_ne!(lo, hi);
        assert_eq!(&lo[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn webp_decodes_back() {
        let bytes = encode_rgba(&gradient(), OutputFormat::Webp, Some(0.5)).unwrap();
        assert_eq!(&bytes[..4], b"RIFF");
        let back = image::load_from_memory(&bytes).unwrap();
        assert_eq!(back.dimensions(), (64, 32));
    }

    #[test]
    fn quantization_is_identity_at_full_quality() {
        let mut data = vec![13, 200, 77, 40];
        quantize_rgb_for_webp(&mut data, 1.0);
        assert_eq!(data, [13, 200, 77, 40]);
        quantize_rgb_for_webp(&mut data, 0.0);
        assert!(data[..3].iter().all(|c| *c == 0 || *c == 255));
        assert_eq!(data[3], 40);
    }
}
