//! Port for the remote generative model.
//!
//! Four call shapes: plain text, image + text, image + text constrained by a
//! JSON schema, and image editing. Every call answers with the ordered
//! fragments of the model's reply.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::asset::ImageAsset;
use crate::error::StudioError;

/// Text-only completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRequest {
    /// The resolved model identifier.
    pub model: String,
    /// The instruction text.
    pub prompt: String,
}

/// Image + text completion request answered with free text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRequest {
    /// The resolved model identifier.
    pub model: String,
    /// The image to analyze.
    pub image: ImageAsset,
    /// The instruction text.
    pub prompt: String,
}

/// Image + text completion request answered with JSON matching `schema`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredRequest {
    /// The resolved model identifier.
    pub model: String,
    /// The image to analyze.
    pub image: ImageAsset,
    /// The instruction text.
    pub prompt: String,
    /// Response schema in the service's schema dialect.
    pub schema: serde_json::Value,
}

/// Image editing request: the normalized product image plus the edit prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditRequest {
    /// The resolved image model identifier.
    pub model: String,
    /// The normalized source image.
    pub image: ImageAsset,
    /// The edit instruction built by [`crate::prompt::build_edit_prompt`].
    pub prompt: String,
}

/// One typed unit of a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fragment {
    /// Free text.
    Text {
        /// The text.
        text: String,
    },
    /// Inline binary data, base64 encoded.
    InlineData {
        /// MIME type of the data (e.g., `"image/png"`).
        mime_type: String,
        /// Base64 payload.
        data: String,
    },
}

/// A reply: fragments in the order the service sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceReply {
    /// The fragments.
    pub fragments: Vec<Fragment>,
}

/// Boxed future returned by [`GenerativeService`] methods.
pub type ServiceFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ServiceReply, StudioError>> + Send + 'a>>;

/// A remote generative model.
pub trait GenerativeService: Send + Sync {
    /// Complete a text prompt.
    fn complete_text(&self, request: &TextRequest) -> ServiceFuture<'_>;

    /// Describe or analyze an image.
    fn describe_image(&self, request: &ImageRequest) -> ServiceFuture<'_>;

    /// Analyze an image and answer with schema-constrained JSON text.
    fn complete_structured(&self, request: &StructuredRequest) -> ServiceFuture<'_>;

    /// Produce an edited image (and possibly text) from an image and prompt.
    fn edit_image(&self, request: &EditRequest) -> ServiceFuture<'_>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragments_are_tagged() {
        let reply = ServiceReply {
            fragments: vec![
                Fragment::Text { text: "ok".into() },
                Fragment::InlineData { mime_type: "image/png".into(), data: "AAEC".into() },
            ],
        };
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["fragments"][0]["kind"], "text");
        assert_eq!(json["fragments"][1]["kind"], "inline_data");
        assert_eq!(json["fragments"][1]["mime_type"], "image/png");

        let back: ServiceReply = serde_json::from_value(json).unwrap();
        assert_eq!(back, reply);
    }

    #[test]
    fn edit_request_serializes_image_asset() {
        let request = EditRequest {
            model: "gemini-2.5-flash-image-preview".into(),
            image: ImageAsset::from_bytes(&[0xFF, 0xD8], "image/jpeg"),
            prompt: "a shot".into(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["image"]["mime_type"], "image/jpeg");
        assert_eq!(json["image"]["payload"], "/9g=");
    }
}
