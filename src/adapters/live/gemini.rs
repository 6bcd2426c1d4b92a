//! Live adapter for the Gemini `generateContent` API.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::asset::ImageAsset;
use crate::error::StudioError;
use crate::ports::generative_service::{
    EditRequest, Fragment, GenerativeService, ImageRequest, ServiceFuture, ServiceReply,
    StructuredRequest, TextRequest,
};

/// Live Gemini service that calls the Google AI API.
pub struct GeminiService {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiService {
    /// Create a new Gemini service with the given API key and endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        api_key: String,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, StudioError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, api_key, base_url: base_url.into().trim_end_matches('/').to_string() })
    }

    async fn generate(&self, model: &str, body: Value) -> Result<ServiceReply, StudioError> {
        let url = format!("{}/{model}:generateContent", self.base_url);
        debug!(%url, "calling Gemini");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(StudioError::Service { status: status.as_u16(), message: response_text });
        }

        parse_reply(&response_text)
    }
}

impl GenerativeService for GeminiService {
    fn complete_text(&self, request: &TextRequest) -> ServiceFuture<'_> {
        let model = request.model.clone();
        let body = json!({
            "contents": [{ "parts": [{ "text": request.prompt }] }]
        });
        Box::pin(async move { self.generate(&model, body).await })
    }

    fn describe_image(&self, request: &ImageRequest) -> ServiceFuture<'_> {
        let model = request.model.clone();
        let body = json!({
            "contents": [{ "parts": [inline_part(&request.image), { "text": request.prompt }] }]
        });
        Box::pin(async move { self.generate(&model, body).await })
    }

    fn complete_structured(&self, request: &StructuredRequest) -> ServiceFuture<'_> {
        let model = request.model.clone();
        let body = json!({
            "contents": [{ "parts": [inline_part(&request.image), { "text": request.prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": request.schema,
            }
        });
        Box::pin(async move { self.generate(&model, body).await })
    }

    fn edit_image(&self, request: &EditRequest) -> ServiceFuture<'_> {
        let model = request.model.clone();
        let body = edit_body(request);
        Box::pin(async move { self.generate(&model, body).await })
    }
}

fn inline_part(image: &ImageAsset) -> Value {
    json!({ "inlineData": { "mimeType": image.mime_type(), "data": image.payload() } })
}

fn edit_body(request: &EditRequest) -> Value {
    json!({
        "contents": [{ "parts": [inline_part(&request.image), { "text": request.prompt }] }],
        "generationConfig": { "responseModalities": ["IMAGE", "TEXT"] }
    })
}

/// Turn a `generateContent` body into fragments from the first candidate.
fn parse_reply(body: &str) -> Result<ServiceReply, StudioError> {
    let parsed: GeminiResponse = serde_json::from_str(body).map_err(|e| StudioError::Service {
        status: 200,
        message: format!("Failed to parse response: {e}"),
    })?;

    let Some(candidate) = parsed.candidates.into_iter().next() else {
        let reason = parsed.prompt_feedback.and_then(|f| f.block_reason);
        warn!(block_reason = ?reason, "Gemini returned no candidates");
        return Ok(ServiceReply::default());
    };

    let fragments = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter(|part| !part.thought)
        .filter_map(|part| match (part.text, part.inline_data) {
            (Some(text), _) => Some(Fragment::Text { text }),
            (None, Some(inline)) => {
                Some(Fragment::InlineData { mime_type: inline.mime_type, data: inline.data })
            }
            (None, None) => None,
        })
        .collect();

    Ok(ServiceReply { fragments })
}

// --- Gemini API response types ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    text: Option<String>,
    inline_data: Option<GeminiInlineData>,
    #[serde(default)]
    thought: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}
