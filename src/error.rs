//! Unified error type for product-studio.

use thiserror::Error;

/// Errors that can occur while preparing images or talking to the model.
#[derive(Debug, Error)]
pub enum StudioError {
    /// A source image could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The remote service rejected or failed the call.
    #[error("Service error ({status}): {message}")]
    Service {
        /// HTTP status code (0 when no HTTP status applies).
        status: u16,
        /// Error message from the service.
        message: String,
    },

    /// A network error occurred before the service could answer.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The call succeeded but the reply broke its contract.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Image encoding or format conversion error.
    #[error("Image conversion error: {0}")]
    ImageConversion(String),

    /// No API key configured.
    #[error("No API key for {provider}. Set {env_var} or add it to config file.")]
    MissingApiKey {
        /// The provider name.
        provider: String,
        /// The environment variable name.
        env_var: String,
    },
}

impl StudioError {
    /// Shorthand for a [`StudioError::Service`] without an HTTP status.
    pub fn service(message: impl Into<String>) -> Self {
        Self::Service { status: 0, message: message.into() }
    }

    /// Whether the remote call itself failed (as opposed to returning bad content).
    #[must_use]
    pub fn is_service_failure(&self) -> bool {
        matches!(self, Self::Service { .. } | Self::Network(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(StudioError::service("quota").is_service_failure());
        assert!(!StudioError::MalformedResponse("bad json".into()).is_service_failure());
        assert!(!StudioError::Decode("truncated".into()).is_service_failure());
    }

    #[test]
    fn service_display_includes_status() {
        let err = StudioError::Service { status: 429, message: "quota exceeded".into() };
        assert_eq!(err.to_string(), "Service error (429): quota exceeded");
    }
}
