//! Aspect-ratio canvas normalization.
//!
//! The source image is never scaled or cropped. It is centered on a white
//! canvas that is grown along one axis until the canvas matches the target
//! ratio, then re-encoded as JPEG.

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GenericImageView, Rgb, RgbImage, Rgba};
use tracing::debug;

use crate::asset::ImageAsset;
use crate::error::StudioError;
use crate::vocab::AspectRatio;

/// JPEG quality of normalized output.
pub const JPEG_QUALITY: u8 = 95;

/// MIME type of normalized output.
pub const OUTPUT_MIME: &str = "image/jpeg";

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Bytes per canvas pixel.
const CANVAS_CHANNELS: u64 = 3;

/// Compute the canvas size that fits `orig_w` x `orig_h` at the target ratio.
///
/// A source wider than the target keeps its width and the canvas grows taller;
/// otherwise the height is kept and the canvas grows wider. The derived side is
/// rounded to the nearest pixel and never falls below the source.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn canvas_size(orig_w: u32, orig_h: u32, ratio: AspectRatio) -> (u32, u32) {
    let target = ratio.value();
    let original = f64::from(orig_w) / f64::from(orig_h);

    if original > target {
        let height = (f64::from(orig_w) / target).round() as u32;
        (orig_w, height.max(orig_h))
    } else {
        let width = (f64::from(orig_h) * target).round() as u32;
        (width.max(orig_w), orig_h)
    }
}

/// Center `source` on a white canvas matching `ratio`.
///
/// Transparent source pixels are composited over the white background.
///
/// # Errors
///
/// Returns [`StudioError::Decode`] if the source has a zero dimension, or
/// [`StudioError::ImageConversion`] if the padded canvas would exceed the
/// `image` crate's default allocation limit.
pub fn pad_to_ratio(source: &DynamicImage, ratio: AspectRatio) -> Result<RgbImage, StudioError> {
    let (w, h) = source.dimensions();
    if w == 0 || h == 0 {
        return Err(StudioError::Decode(format!("Image has no pixels ({w}x{h})")));
    }

    let (canvas_w, canvas_h) = canvas_size(w, h, ratio);
    let bytes = u64::from(canvas_w) * u64::from(canvas_h) * CANVAS_CHANNELS;
    if let Some(max) = image::Limits::default().max_alloc {
        if bytes > max {
            return Err(StudioError::ImageConversion(format!(
                "A {w}x{h} image padded to {ratio} needs a {canvas_w}x{canvas_h} canvas \
                 ({bytes} bytes, limit {max})"
            )));
        }
    }
    let offset_x = (canvas_w - w) / 2;
    let offset_y = (canvas_h - h) / 2;

    let mut canvas = RgbImage::from_pixel(canvas_w, canvas_h, BACKGROUND);
    for (x, y, pixel) in source.to_rgba8().enumerate_pixels() {
        canvas.put_pixel(x + offset_x, y + offset_y, over_background(*pixel));
    }
    Ok(canvas)
}

/// Normalize an asset to the target ratio and re-encode it as JPEG.
///
/// # Errors
///
/// Returns [`StudioError::Decode`] if the source cannot be decoded, or
/// [`StudioError::ImageConversion`] if the canvas cannot be encoded.
pub fn normalize(image: &ImageAsset, ratio: AspectRatio) -> Result<ImageAsset, StudioError> {
    let source = image.decode()?;
    let canvas = pad_to_ratio(&source, ratio)?;
    debug!(
        from = %format!("{}x{}", source.width(), source.height()),
        to = %format!("{}x{}", canvas.width(), canvas.height()),
        %ratio,
        "normalized canvas"
    );

    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY)
        .encode_image(&canvas)
        .map_err(|e| StudioError::ImageConversion(format!("Failed to encode JPEG: {e}")))?;
    Ok(ImageAsset::from_bytes(&buffer, OUTPUT_MIME))
}

/// Blend one pixel over the white background.
fn over_background(Rgba([r, g, b, a]): Rgba<u8>) -> Rgb<u8> {
    if a == u8::MAX {
        return Rgb([r, g, b]);
    }
    let alpha = u16::from(a);
    let blend = |c: u8| {
        let mixed = (u16::from(c) * alpha + 255 * (255 - alpha) + 127) / 255;
        u8::try_from(mixed).unwrap_or(u8::MAX)
    };
    Rgb([blend(r), blend(g), blend(b)])
}
