//! Prompt text sent to the model.
//!
//! The edit prompt wording and ordering are tuned against the image model;
//! keep them byte-stable.

use serde_json::{json, Value};

use crate::vocab::{AspectRatio, CameraPerspective, LightingStyle};

const SCENE_BEGIN: &str = "--- SCENE DESCRIPTION ---";
const SCENE_END: &str = "--- END SCENE DESCRIPTION ---";

/// Build the instruction sent alongside the normalized product image.
///
/// A scene is wrapped in the scene markers verbatim. Scene text that is empty
/// or whitespace-only counts as no scene and selects the plain-background
/// sentence; that is the one input where the text differs from the tuned
/// prompt, which wrapped any non-empty string.
#[must_use]
pub fn build_edit_prompt(
    aspect_ratio: AspectRatio,
    lighting: LightingStyle,
    camera: CameraPerspective,
    scene: Option<&str>,
) -> String {
    let mut prompt = String::from(
        "Generate a high-resolution, photorealistic product shot of the subject from the first image. ",
    );
    prompt.push_str(
        "The image should have a professional, clean aesthetic suitable for an e-commerce website or marketing campaign. ",
    );
    prompt.push_str(&format!("The aspect ratio must be {aspect_ratio}. "));
    prompt.push_str(&format!(
        "The lighting should be {lighting}, creating a specific mood and highlighting the product's features. "
    ));
    prompt.push_str(&format!(
        "The camera angle should be a {camera}, providing a clear and engaging view of the product. "
    ));

    match scene.filter(|s| !s.trim().is_empty()) {
        Some(scene) => prompt.push_str(&format!("\n\n{SCENE_BEGIN}\n{scene}\n{SCENE_END}\n\n")),
        None => prompt.push_str(
            "The background should be simple and non-distracting, complementing the product. ",
        ),
    }

    prompt.push_str("Ensure the final image is polished and visually appealing.");
    prompt
}

/// Instruction that expands a short idea into a full scene description.
#[must_use]
pub fn scene_idea_from_text(idea: &str) -> String {
    format!(
        "You are a creative director for product photoshoots. A user will provide a short scene idea. \
         Expand it into a detailed, descriptive prompt for an AI image generator. Focus on creating a \
         vivid and appealing setting. Do not mention the product itself, only the scene.\n\n\
         User Idea: \"{idea}\"\n\n\
         Detailed Scene Description:"
    )
}

/// Instruction that derives a scene description from a style reference image.
pub const SCENE_IDEA_FROM_IMAGE: &str = "You are a creative director for product photoshoots. \
    Analyze the provided image. Based on its style, mood, and environment, generate a single, \
    detailed scene description that can be used as a prompt for an AI image generator to place a \
    new product into a similar setting. Describe the background, lighting, color palette, and \
    overall atmosphere. Do not describe any specific object that might be in the foreground of \
    the reference image.";

/// Instruction that asks for style suggestions for a product image.
#[must_use]
pub fn style_suggestions(notes: &str) -> String {
    let notes = if notes.trim().is_empty() { "None" } else { notes };
    format!(
        "You are an expert product photographer and creative director. Analyze the provided product \
         image. Based on the product and the user's optional notes, suggest the best lighting style, \
         camera perspective, and a creative scene description to generate a stunning product shot.\n\n\
         User notes: \"{notes}\"\n\n\
         Your response must be a valid JSON object matching the provided schema."
    )
}

/// Response schema constraining the style suggestion reply.
#[must_use]
pub fn style_suggestion_schema() -> Value {
    let lighting: Vec<&str> = LightingStyle::ALL.iter().map(|v| v.as_str()).collect();
    let camera: Vec<&str> = CameraPerspective::ALL.iter().map(|v| v.as_str()).collect();
    json!({
        "type": "OBJECT",
        "properties": {
            "lightingStyle": {
                "type": "STRING",
                "enum": lighting,
                "description": "The recommended lighting style for the product."
            },
            "cameraPerspective": {
                "type": "STRING",
                "enum": camera,
                "description": "The recommended camera perspective."
            },
            "sceneDescription": {
                "type": "STRING",
                "description": "A creative and detailed scene description for the product photoshoot."
            }
        },
        "required": ["lightingStyle", "cameraPerspective", "sceneDescription"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEAD: &str = "Generate a high-resolution, photorealistic product shot of the subject from the first image. \
The image should have a professional, clean aesthetic suitable for an e-commerce website or marketing campaign. \
The aspect ratio must be 1:1. \
The lighting should be Studio Softbox, creating a specific mood and highlighting the product's features. \
The camera angle should be a Eye-Level Shot, providing a clear and engaging view of the product. ";

    #[test]
    fn prompt_without_scene_uses_fallback() {
        let prompt = build_edit_prompt(
            AspectRatio::Square,
            LightingStyle::StudioSoftbox,
            CameraPerspective::EyeLevel,
            None,
        );
        let expected = format!(
            "{HEAD}The background should be simple and non-distracting, complementing the product. \
             Ensure the final image is polished and visually appealing."
        );
        assert_eq!(prompt, expected);
    }

    #[test]
    fn prompt_with_scene_wraps_in_markers() {
        let prompt = build_edit_prompt(
            AspectRatio::Square,
            LightingStyle::StudioSoftbox,
            CameraPerspective::EyeLevel,
            Some("A sunny beach with palm trees."),
        );
        let expected = format!(
            "{HEAD}\n\n--- SCENE DESCRIPTION ---\nA sunny beach with palm trees.\n--- END SCENE DESCRIPTION ---\n\n\
             Ensure the final image is polished and visually appealing."
        );
        assert_eq!(prompt, expected);
        assert!(!prompt.contains("non-distracting"));
    }

    #[test]
    fn blank_scene_counts_as_absent() {
        let blank = build_edit_prompt(
            AspectRatio::Landscape,
            LightingStyle::NeonPunk,
            CameraPerspective::DutchAngle,
            Some("   \n"),
        );
        let none = build_edit_prompt(
            AspectRatio::Landscape,
            LightingStyle::NeonPunk,
            CameraPerspective::DutchAngle,
            None,
        );
        assert_eq!(blank, none);
    }

    #[test]
    fn prompt_is_deterministic_and_ordered() {
        let build = || {
            build_edit_prompt(
                AspectRatio::Portrait,
                LightingStyle::GoldenHour,
                CameraPerspective::MacroCloseUp,
                Some("marble"),
            )
        };
        let prompt = build();
        assert_eq!(prompt, build());

        let ratio = prompt.find("must be 3:4").unwrap();
        let light = prompt.find("Golden Hour Sunlight").unwrap();
        let camera = prompt.find("Macro Close-Up").unwrap();
        let scene = prompt.find(SCENE_BEGIN).unwrap();
        let close = prompt.find("Ensure the final image").unwrap();
        assert!(ratio < light && light < camera && camera < scene && scene < close);
    }

    #[test]
    fn suggestion_prompt_defaults_notes() {
        assert!(style_suggestions("").contains("User notes: \"None\""));
        assert!(style_suggestions("luxury watch").contains("User notes: \"luxury watch\""));
    }

    #[test]
    fn idea_prompt_quotes_idea() {
        let prompt = scene_idea_from_text("rainy city");
        assert!(prompt.contains("User Idea: \"rainy city\""));
        assert!(prompt.ends_with("Detailed Scene Description:"));
    }

    #[test]
    fn schema_enumerates_vocabularies() {
        let schema = style_suggestion_schema();
        let lighting = schema["properties"]["lightingStyle"]["enum"].as_array().unwrap();
        assert_eq!(lighting.len(), LightingStyle::ALL.len());
        assert_eq!(lighting[1], "Golden Hour Sunlight");
        let camera = schema["properties"]["cameraPerspective"]["enum"].as_array().unwrap();
        assert_eq!(camera.len(), CameraPerspective::ALL.len());
        assert_eq!(schema["required"].as_array().unwrap().len(), 3);
    }
}
