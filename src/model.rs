//! Model name resolution.

/// Default model for text and analysis calls.
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";

/// Default model for image edits.
pub const DEFAULT_IMAGE_MODEL: &str = "nano-banana";

/// Short name aliases for popular models.
const ALIASES: &[(&str, &str)] = &[
    ("nano-banana", "gemini-2.5-flash-image-preview"),
    ("flash", "gemini-2.5-flash"),
    ("pro", "gemini-2.5-pro"),
];

/// Resolve a model name (alias or exact) to the full model identifier.
#[must_use]
pub fn resolve_model(name: &str) -> String {
    for &(alias, full) in ALIASES {
        if name == alias {
            return full.to_string();
        }
    }
    name.to_string()
}

/// Check that a resolved model name belongs to the Gemini family.
///
/// # Errors
///
/// Returns an error if the model name doesn't start with `gemini`.
pub fn validate_model(model: &str) -> Result<(), String> {
    if model.starts_with("gemini") {
        Ok(())
    } else {
        Err(format!("Unknown model '{model}'. Expected a 'gemini-*' model or an alias."))
    }
}
