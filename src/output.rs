//! File naming, image saving, and format conversion.

use std::borrow::Cow;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::asset::ImageAsset;
use crate::error::StudioError;
use crate::format::OutputFormat;
use crate::vocab::AspectRatio;

/// Timestamped filename for a generated image, e.g.
/// `generated_image_2026-10-19T10-49-00-123Z.jpeg`.
#[must_use]
pub fn auto_filename(now: DateTime<Utc>, format: OutputFormat) -> String {
    let timestamp = now.format("%Y-%m-%dT%H-%M-%S-%3fZ");
    format!("generated_image_{timestamp}.{}", format.extension())
}

/// Filename for a normalized copy of `source`, e.g. `mug-16x9.jpeg`.
#[must_use]
pub fn normalized_filename(source: &Path, ratio: AspectRatio) -> String {
    let stem = source.file_stem().unwrap_or_default().to_string_lossy();
    let (w, h) = ratio.dimensions();
    format!("{}-{w}x{h}.jpeg", sanitize_for_filename(&stem, 50))
}

/// Sanitize a string for use in a filename.
///
/// Converts to lowercase, replaces non-alphanumeric chars with hyphens,
/// collapses consecutive hyphens, and trims to max length.
#[must_use]
pub fn sanitize_for_filename(input: &str, max_len: usize) -> String {
    let mut result = String::with_capacity(max_len);
    let mut last_was_hyphen = true; // Prevents leading hyphen

    for ch in input.chars().take(max_len * 2) {
        if result.len() >= max_len {
            break;
        }
        if ch.is_ascii_alphanumeric() {
            result.push(ch.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            result.push('-');
            last_was_hyphen = true;
        }
    }

    while result.ends_with('-') {
        result.pop();
    }

    if result.is_empty() {
        "image".to_string()
    } else {
        result
    }
}

/// Resolve the output path for image `index` of `total`.
///
/// Uses the explicit path or a timestamped name; with more than one image a
/// `-N` suffix is added before the extension.
#[must_use]
pub fn resolve_output_path(
    explicit: Option<&str>,
    format: OutputFormat,
    index: usize,
    total: usize,
) -> PathBuf {
    let base = match explicit {
        Some(p) => PathBuf::from(p),
        None => PathBuf::from(auto_filename(Utc::now(), format)),
    };
    if total <= 1 {
        return base;
    }
    let stem = base.file_stem().unwrap_or_default().to_string_lossy();
    let ext = base
        .extension()
        .map_or_else(|| Cow::Borrowed(format.extension()), OsStr::to_string_lossy);
    base.with_file_name(format!("{stem}-{}.{ext}", index + 1))
}

/// Save an image asset to a file, converting format if necessary.
///
/// # Errors
///
/// Returns an error if the payload is invalid, the file cannot be written,
/// or format conversion fails.
pub fn save_image(
    image: &ImageAsset,
    target_format: OutputFormat,
    output_path: &Path,
) -> Result<(), StudioError> {
    let data = image.bytes()?;
    if image.mime_type() == target_format.mime_type() {
        std::fs::write(output_path, data).map_err(StudioError::Io)
    } else {
        convert_and_save(&data, target_format, output_path)
    }
}

/// Convert image bytes to the target format and save.
fn convert_and_save(
    data: &[u8],
    target_format: OutputFormat,
    output_path: &Path,
) -> Result<(), StudioError> {
    let img = image::load_from_memory(data)
        .map_err(|e| StudioError::ImageConversion(format!("Failed to decode image: {e}")))?;

    let image_format = target_format.image_format();

    // JPEG has no alpha channel.
    let img = if image_format == image::ImageFormat::Jpeg {
        image::DynamicImage::ImageRgb8(img.to_rgb8())
    } else {
        img
    };

    img.save_with_format(output_path, image_format)
        .map_err(|e| StudioError::ImageConversion(format!("Failed to save as {target_format}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn sanitize_basic() {
        assert_eq!(sanitize_for_filename("Hello World", 50), "hello-world");
    }

    #[test]
    fn sanitize_empty() {
        assert_eq!(sanitize_for_filename("", 50), "image");
        assert_eq!(sanitize_for_filename("!!!", 50), "image");
    }

    #[test]
    fn sanitize_truncates() {
        let long = "a".repeat(100);
        assert!(sanitize_for_filename(&long, 10).len() <= 10);
    }

    #[test]
    fn auto_filename_is_timestamped() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 10, 49, 5).unwrap();
        assert_eq!(auto_filename(now, OutputFormat::Jpeg), "generated_image_2026-10-19T10-49-05-000Z.jpeg");
        assert_eq!(auto_filename(now, OutputFormat::Png), "generated_image_2026-10-19T10-49-05-000Z.png");
    }

    #[test]
    fn normalized_name() {
        assert_eq!(
            normalized_filename(Path::new("/photos/Red Mug.PNG"), AspectRatio::Landscape),
            "red-mug-16x9.jpeg"
        );
    }

    #[test]
    fn resolve_explicit_single() {
        let path = resolve_output_path(Some("shot.png"), OutputFormat::Png, 0, 1);
        assert_eq!(path, PathBuf::from("shot.png"));
    }

    #[test]
    fn resolve_explicit_numbered() {
        let path = resolve_output_path(Some("out/shot.png"), OutputFormat::Png, 1, 3);
        assert_eq!(path, PathBuf::from("out/shot-2.png"));
    }

    #[test]
    fn resolve_numbered_without_extension() {
        let path = resolve_output_path(Some("shot"), OutputFormat::Png, 0, 3);
        assert_eq!(path, PathBuf::from("shot-1.png"));
    }

    #[test]
    fn resolve_auto() {
        let path = resolve_output_path(None, OutputFormat::Webp, 0, 1);
        assert!(path.to_str().unwrap().starts_with("generated_image_"));
        assert_eq!(path.extension().unwrap(), "webp");
    }

    #[test]
    fn save_converts_png_to_jpeg() {
        let dir = std::env::temp_dir().join("product_studio_output_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("converted.jpeg");

        let mut png = std::io::Cursor::new(Vec::new());
        image::DynamicImage::new_rgba8(4, 4).write_to(&mut png, image::ImageFormat::Png).unwrap();
        let asset = ImageAsset::from_bytes(&png.into_inner(), "image/png");

        save_image(&asset, OutputFormat::Jpeg, &path).unwrap();
        let data = std::fs::read(&path).unwrap();
        assert_eq!(&data[..3], &[0xFF, 0xD8, 0xFF]);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
