//! Request/response mediation between the studio and the generative model.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::asset::{data_url, ImageAsset};
use crate::error::StudioError;
use crate::ports::{
    EditRequest, Fragment, GenerativeService, ImageRequest, StructuredRequest, TextRequest,
};
use crate::prompt;
use crate::vocab::{CameraPerspective, LightingStyle};

/// What an edit call produced.
///
/// Both fields may be empty. A missing image with text present is a valid
/// outcome: the text usually explains why no image was produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditResult {
    /// `data:` URL of the generated image.
    pub image_url: Option<String>,
    /// Text returned next to (or instead of) the image.
    pub text: Option<String>,
}

/// Style parameters suggested by the model for a product image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleSuggestion {
    /// Suggested lighting.
    pub lighting_style: LightingStyle,
    /// Suggested camera angle.
    pub camera_perspective: CameraPerspective,
    /// Suggested scene description.
    pub scene_description: String,
}

/// Mediates all calls to the generative model.
pub struct Studio<'a> {
    service: &'a dyn GenerativeService,
    text_model: String,
    image_model: String,
}

impl<'a> Studio<'a> {
    /// Create a studio over the given service and model identifiers.
    pub fn new(
        service: &'a dyn GenerativeService,
        text_model: impl Into<String>,
        image_model: impl Into<String>,
    ) -> Self {
        Self { service, text_model: text_model.into(), image_model: image_model.into() }
    }

    /// Build an edit request for the image model.
    #[must_use]
    pub fn edit_request(&self, image: ImageAsset, prompt: String) -> EditRequest {
        EditRequest { model: self.image_model.clone(), image, prompt }
    }

    /// Submit an edit and extract the generated image and text.
    ///
    /// # Errors
    ///
    /// Returns a service error if the call fails, or
    /// [`StudioError::MalformedResponse`] if the reply has neither image nor text.
    pub async fn submit_edit(&self, request: &EditRequest) -> Result<EditResult, StudioError> {
        info!(model = %request.model, "submitting edit");
        let reply = self.service.edit_image(request).await.inspect_err(|e| {
            warn!(error = %e, "edit call failed");
        })?;

        let result = extract_edit_result(&reply.fragments);
        debug!(
            fragments = reply.fragments.len(),
            has_image = result.image_url.is_some(),
            has_text = result.text.is_some(),
            "edit reply"
        );
        if result.image_url.is_none() && result.text.is_none() {
            return Err(StudioError::MalformedResponse(
                "Edit reply contained neither an image nor text".into(),
            ));
        }
        Ok(result)
    }

    /// Expand a short idea into a detailed scene description.
    ///
    /// # Errors
    ///
    /// Returns a service error if the call fails or the reply has no text.
    pub async fn get_scene_idea_from_text(&self, idea: &str) -> Result<String, StudioError> {
        let request =
            TextRequest { model: self.text_model.clone(), prompt: prompt::scene_idea_from_text(idea) };
        let reply = self.service.complete_text(&request).await?;
        require_text(&reply.fragments, "scene idea")
    }

    /// Derive a scene description from a style reference image.
    ///
    /// # Errors
    ///
    /// Returns a service error if the call fails or the reply has no text.
    pub async fn get_scene_idea_from_image(
        &self,
        image: &ImageAsset,
    ) -> Result<String, StudioError> {
        let request = ImageRequest {
            model: self.text_model.clone(),
            image: image.clone(),
            prompt: prompt::SCENE_IDEA_FROM_IMAGE.to_string(),
        };
        let reply = self.service.describe_image(&request).await?;
        require_text(&reply.fragments, "scene idea")
    }

    /// Ask the model for lighting, camera and scene suggestions.
    ///
    /// # Errors
    ///
    /// Returns a service error if the call fails, or
    /// [`StudioError::MalformedResponse`] if the reply is not a complete suggestion.
    pub async fn get_style_suggestions(
        &self,
        image: &ImageAsset,
        notes: &str,
    ) -> Result<StyleSuggestion, StudioError> {
        let request = StructuredRequest {
            model: self.text_model.clone(),
            image: image.clone(),
            prompt: prompt::style_suggestions(notes),
            schema: prompt::style_suggestion_schema(),
        };
        let reply = self.service.complete_structured(&request).await?;
        let text = reply_text(&reply.fragments).ok_or_else(|| {
            StudioError::MalformedResponse("Style suggestion reply contained no text".into())
        })?;
        parse_style_suggestion(&text)
    }
}

/// Scan every fragment; the last image and the last text win.
#[must_use]
pub fn extract_edit_result(fragments: &[Fragment]) -> EditResult {
    let mut result = EditResult::default();
    for fragment in fragments {
        match fragment {
            Fragment::Text { text } => result.text = Some(text.clone()),
            Fragment::InlineData { mime_type, data } => {
                result.image_url = Some(data_url(mime_type, data));
            }
        }
    }
    result
}

/// Concatenate all text fragments, or `None` if there are none.
#[must_use]
pub fn reply_text(fragments: &[Fragment]) -> Option<String> {
    let mut text: Option<String> = None;
    for fragment in fragments {
        if let Fragment::Text { text: part } = fragment {
            text.get_or_insert_with(String::new).push_str(part);
        }
    }
    text
}

fn require_text(fragments: &[Fragment], what: &str) -> Result<String, StudioError> {
    reply_text(fragments)
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| StudioError::service(format!("The model returned no {what} text")))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSuggestion {
    lighting_style: Option<String>,
    camera_perspective: Option<String>,
    scene_description: Option<String>,
}

/// Parse a structured suggestion reply.
///
/// # Errors
///
/// Returns [`StudioError::MalformedResponse`] if the text is not JSON, a field
/// is missing or empty, or a value is outside its vocabulary.
pub fn parse_style_suggestion(text: &str) -> Result<StyleSuggestion, StudioError> {
    let raw: RawSuggestion = serde_json::from_str(text.trim()).map_err(|e| {
        StudioError::MalformedResponse(format!(
            "Failed to parse style suggestions; the model may have returned invalid JSON: {e}"
        ))
    })?;

    let field = |value: Option<String>, name: &str| {
        value.filter(|v| !v.trim().is_empty()).ok_or_else(|| {
            StudioError::MalformedResponse(format!("Style suggestion is missing {name}"))
        })
    };
    let lighting = field(raw.lighting_style, "lightingStyle")?;
    let camera = field(raw.camera_perspective, "cameraPerspective")?;
    let scene_description = field(raw.scene_description, "sceneDescription")?;

    Ok(StyleSuggestion {
        lighting_style: lighting.parse().map_err(StudioError::MalformedResponse)?,
        camera_perspective: camera.parse().map_err(StudioError::MalformedResponse)?,
        scene_description,
    })
}
