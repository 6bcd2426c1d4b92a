//! In-memory image assets carried between the normalizer and the remote service.

use std::path::Path;

use base64::Engine;
use image::{DynamicImage, ImageFormat};
use serde::{Deserialize, Serialize};

use crate::error::StudioError;

/// An encoded raster image: base64 payload plus the MIME type of its format.
///
/// Immutable once constructed; transformations return a new asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAsset {
    payload: String,
    mime_type: String,
}

impl ImageAsset {
    /// Wrap raw encoded bytes.
    ///
    /// The bytes are not inspected: callers pass output they just encoded or
    /// sniffed, so they must already be an image of `mime_type`.
    #[must_use]
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            payload: base64::engine::general_purpose::STANDARD.encode(bytes),
            mime_type: mime_type.into(),
        }
    }

    /// Read an image file, sniffing its format from the content.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a known raster format.
    pub fn from_path(path: &Path) -> Result<Self, StudioError> {
        let bytes = std::fs::read(path)?;
        let format = image::guess_format(&bytes)
            .or_else(|_| ImageFormat::from_path(path))
            .map_err(|e| {
                StudioError::Decode(format!("Unrecognized image format {}: {e}", path.display()))
            })?;
        Ok(Self::from_bytes(&bytes, format.to_mime_type()))
    }

    /// Parse a `data:<mime>;base64,<payload>` URL.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::Decode`] if the URL is not a base64 data URL or
    /// its payload is not a recognizable raster image.
    pub fn from_data_url(url: &str) -> Result<Self, StudioError> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| StudioError::Decode("Not a data URL".into()))?;
        let (mime_type, payload) = rest
            .split_once(";base64,")
            .ok_or_else(|| StudioError::Decode("Data URL is not base64 encoded".into()))?;
        if mime_type.is_empty() {
            return Err(StudioError::Decode("Data URL has no MIME type".into()));
        }
        let asset = Self { payload: payload.to_string(), mime_type: mime_type.to_string() };
        image::guess_format(&asset.bytes()?).map_err(|e| {
            StudioError::Decode(format!("Data URL payload is not an image ({mime_type}): {e}"))
        })?;
        Ok(asset)
    }

    /// The base64 payload.
    #[must_use]
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// The MIME type of the encoded format.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Decoded payload bytes.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::Decode`] if the payload is not valid base64.
    pub fn bytes(&self) -> Result<Vec<u8>, StudioError> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.payload)
            .map_err(|e| StudioError::Decode(format!("Invalid base64 payload: {e}")))
    }

    /// Decode the payload into pixels.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::Decode`] if the payload is not a decodable image.
    pub fn decode(&self) -> Result<DynamicImage, StudioError> {
        let bytes = self.bytes()?;
        image::load_from_memory(&bytes)
            .map_err(|e| StudioError::Decode(format!("Failed to decode {}: {e}", self.mime_type)))
    }
}

/// Compose a base64 data URL.
#[must_use]
pub fn data_url(mime_type: &str, payload: &str) -> String {
    format!("data:{mime_type};base64,{payload}")
}
