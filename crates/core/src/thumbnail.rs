//! Image shrinking for media thumbnails and post featured images.
//!
//! Images are scaled down to fit inside a bounding box with the aspect ratio
//! preserved. Images already inside the box are re-encoded at their size.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, ImageReader};

/// Error type for thumbnail generation.
#[derive(Debug, thiserror::Error)]
pub enum ThumbnailError {
    #[error("Failed to read image: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode image: {0}")]
    Decode(image::ImageError),

    #[error("Failed to encode image: {0}")]
    Encode(image::ImageError),
}

/// Output encoding for a resized image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Gif,
    Jpeg { quality: u8 },
}

/// Default JPEG quality for generated thumbnails.
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

impl OutputFormat {
    /// Pick the encoding implied by a file extension (with or without dot,
    /// any case): `.png` -> PNG, `.gif` -> GIF, everything else JPEG.
    pub fn for_extension(ext: &str, jpeg_quality: u8) -> Self {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "png" => OutputFormat::Png,
            "gif" => OutputFormat::Gif,
            _ => OutputFormat::Jpeg {
                quality: jpeg_quality,
            },
        }
    }
}

/// Decode `bytes`, shrink the image to fit `(max_width, max_height)` and
/// encode it as `format`.
pub fn resize_to_fit(
    bytes: &[u8],
    (max_width, max_height): (u32, u32),
    format: OutputFormat,
) -> Result<Vec<u8>, ThumbnailError> {
    let img = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .decode()
        .map_err(ThumbnailError::Decode)?;

    let img = if img.width() <= max_width && img.height() <= max_height {
        img
    } else {
        img.thumbnail(max_width, max_height)
    };

    encode(&img, format)
}

fn encode(img: &DynamicImage, format: OutputFormat) -> Result<Vec<u8>, ThumbnailError> {
    let mut buf = Vec::new();
    match format {
        OutputFormat::Png => img
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .map_err(ThumbnailError::Encode)?,
        OutputFormat::Gif => DynamicImage::ImageRgba8(img.to_rgba8())
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Gif)
            .map_err(ThumbnailError::Encode)?,
        OutputFormat::Jpeg { quality } => {
            // JPEG has no alpha channel.
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
            rgb.write_with_encoder(encoder)
                .map_err(ThumbnailError::Encode)?;
        }
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use image::{GenericImageView, RgbImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([200, 30, 30])));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .expect("encoding test image should succeed");
        buf
    }

    #[test]
    fn for_extension_maps_formats() {
        assert_eq!(OutputFormat::for_extension(".PNG", 85), OutputFormat::Png);
        assert_eq!(OutputFormat::for_extension("gif", 85), OutputFormat::Gif);
        assert_eq!(
            OutputFormat::for_extension(".jpeg", 85),
            OutputFormat::Jpeg { quality: 85 }
        );
        assert_eq!(
            OutputFormat::for_extension("", 60),
            OutputFormat::Jpeg { quality: 60 }
        );
    }

    #[test]
    fn shrinks_preserving_aspect_ratio() {
        let out = resize_to_fit(&png_bytes(400, 200), (128, 128), OutputFormat::Png).unwrap();
        let decoded = image::load_from_memory(&out).unwrap();
        assert_eq!(decoded.dimensions(), (128, 64));
    }

    #[test]
    fn does_not_upscale_small_images() {
        let out = resize_to_fit(&png_bytes(50, 40), (128, 128), OutputFormat::Png).unwrap();
        let decoded = image::load_from_memory(&out).unwrap();
        assert_eq!(decoded.dimensions(), (50, 40));
    }

    #[test]
    fn encodes_jpeg_output() {
        let out = resize_to_fit(
            &png_bytes(600, 900),
            (300, 450),
            OutputFormat::Jpeg { quality: 85 },
        )
        .unwrap();
        assert_eq!(image::guess_format(&out).unwrap(), ImageFormat::Jpeg);
        let decoded = image::load_from_memory(&out).unwrap();
        assert_eq!(decoded.dimensions(), (300, 450));
    }

    #[test]
    fn encodes_gif_output() {
        let out = resize_to_fit(&png_bytes(256, 256), (128, 128), OutputFormat::Gif).unwrap();
        assert_eq!(image::guess_format(&out).unwrap(), ImageFormat::Gif);
    }

    #[test]
    fn rejects_non_image_bytes() {
        let result = resize_to_fit(b"definitely not an image", (128, 128), OutputFormat::Png);
        assert_matches!(result, Err(ThumbnailError::Decode(_)));
    }
}
