/// OpenAI API client for natural-language event parsing
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use calpilot_core::parsing::ports::EventParser;
use calpilot_domain::{ParsedBatch, ParserConfig, Result as DomainResult};
use chrono::{Datelike, Local};
use reqwest::Method;
use tracing::{debug, info};

use crate::http::HttpClient;

use super::types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ContentPart, ImageUrl,
    MessageContent, ParsedEventWire, ParserError,
};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_TEXT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_VISION_MODEL: &str = "gpt-4o";

/// Completion budget per parse call. Distinct from the domain's 2000-token
/// safeguard, which caps the provider-reported total for the whole request.
const MAX_COMPLETION_TOKENS: u32 = 2000;
const PARSE_TEMPERATURE: f32 = 0.3;

/// OpenAI API client for parsing text and schedule photos into events
pub struct OpenAiParser {
    http_client: HttpClient,
    api_key: String,
    text_model: String,
    vision_model: String,
    api_url: String,
}

impl OpenAiParser {
    /// Create a new parsing client
    ///
    /// # Arguments
    /// * `api_key` - OpenAI API key (required)
    /// * `http_client` - HTTP client (single attempt per send)
    pub fn new(api_key: String, http_client: HttpClient) -> Self {
        Self {
            http_client,
            api_key,
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            api_url: OPENAI_API_URL.to_string(),
        }
    }

    /// Create a client from the application's parser configuration
    pub fn from_config(config: &ParserConfig, http_client: HttpClient) -> Self {
        Self::new(config.api_key.clone(), http_client)
            .with_models(config.text_model.clone(), config.vision_model.clone())
    }

    /// Override the models used for text and image parsing
    pub fn with_models(
        mut self,
        text_model: impl Into<String>,
        vision_model: impl Into<String>,
    ) -> Self {
        self.text_model = text_model.into();
        self.vision_model = vision_model.into();
        self
    }

    /// Create a new client with custom API URL (for testing)
    #[cfg(test)]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Call the Chat Completions API once and validate the response
    async fn call_api(
        &self,
        model: &str,
        content: MessageContent,
    ) -> Result<ParsedBatch, ParserError> {
        let request_payload = ChatCompletionRequest {
            model: model.to_string(),
            messages: vec![ChatMessage { role: "user".to_string(), content }],
            max_tokens: MAX_COMPLETION_TOKENS,
            temperature: PARSE_TEMPERATURE,
        };

        let request_builder = self
            .http_client
            .request(Method::POST, &self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request_payload);

        // Exactly one network attempt; transient failures propagate unchanged.
        let response = self.http_client.send(request_builder).await.map_err(|err| match err {
            calpilot_domain::CalPilotError::Network(msg) => ParserError::Network(msg),
            calpilot_domain::CalPilotError::Internal(msg) => ParserError::Network(msg),
            other => ParserError::Network(format!("HTTP error: {other}")),
        })?;

        let status = response.status();
        debug!(status = status.as_u16(), "received model response");

        if !status.is_success() {
            return Err(handle_error_status(status.as_u16(), response).await);
        }

        let body = response.text().await.map_err(|err| {
            ParserError::Network(format!("failed to read response body: {err}"))
        })?;

        let completion: ChatCompletionResponse =
            serde_json::from_str(&body).map_err(|err| ParserError::InvalidResponse {
                message: format!("completion envelope did not decode: {err}"),
                raw: body.clone(),
            })?;

        let choice = completion.choices.first().ok_or_else(|| ParserError::InvalidResponse {
            message: "response contained no choices".to_string(),
            raw: body.clone(),
        })?;

        let content = &choice.message.content;
        let wire_events: Vec<ParsedEventWire> =
            serde_json::from_str(content).map_err(|err| ParserError::InvalidResponse {
                message: format!("expected a JSON array of events: {err}"),
                raw: content.clone(),
            })?;

        let events = wire_events
            .into_iter()
            .enumerate()
            .map(|(index, wire)| wire.into_candidate(index))
            .collect::<Result<Vec<_>, _>>()?;

        // Provider-reported total for this single call, taken verbatim.
        let tokens_used = i64::from(completion.usage.total_tokens);

        info!(events = events.len(), tokens = tokens_used, "model parse complete");

        Ok(ParsedBatch { events, tokens_used })
    }
}

#[async_trait]
impl EventParser for OpenAiParser {
    async fn parse_text(&self, text: &str) -> DomainResult<ParsedBatch> {
        debug!(chars = text.len(), "parsing free text");

        let prompt = text_prompt(text, Local::now().year());
        self.call_api(&self.text_model, MessageContent::Text(prompt)).await.map_err(Into::into)
    }

    async fn parse_image(&self, image: &[u8]) -> DomainResult<ParsedBatch> {
        debug!(bytes = image.len(), "parsing schedule photo");

        let encoded = BASE64.encode(image);
        let parts = vec![
            ContentPart::Text { text: image_prompt(Local::now().year()) },
            ContentPart::ImageUrl {
                image_url: ImageUrl { url: format!("data:image/jpeg;base64,{encoded}") },
            },
        ];
        self.call_api(&self.vision_model, MessageContent::Parts(parts)).await.map_err(Into::into)
    }
}

/// The fixed instructional prompt for free-text parsing
fn text_prompt(text: &str, year: i32) -> String {
    format!(
        "Parse the following text and extract calendar events. \
         Return a JSON array of events with the following structure:\n\
         [\n\
         \x20 {{\n\
         \x20   \"event_name\": \"string\",\n\
         \x20   \"event_date\": \"YYYY-MM-DD\" (assume {year} if year not specified),\n\
         \x20   \"event_time\": \"HH:MM:SS\" or null if not specified,\n\
         \x20   \"event_tag\": \"string\" or empty string,\n\
         \x20   \"is_all_day\": boolean (true if no time specified)\n\
         \x20 }}\n\
         ]\n\n\
         Text: \"{text}\"\n\n\
         Only return the JSON array, no additional text."
    )
}

/// The fixed instructional prompt for schedule-photo parsing
fn image_prompt(year: i32) -> String {
    format!(
        "Analyze this image and extract any calendar events, schedules, or dates mentioned. \
         Return a JSON array of events with the following structure:\n\
         [\n\
         \x20 {{\n\
         \x20   \"event_name\": \"string\",\n\
         \x20   \"event_date\": \"YYYY-MM-DD\" (assume {year} if year not specified),\n\
         \x20   \"event_time\": \"HH:MM:SS\" or null if not specified,\n\
         \x20   \"event_tag\": \"string\" or empty string,\n\
         \x20   \"is_all_day\": boolean (true if no time specified)\n\
         \x20 }}\n\
         ]\n\n\
         Only return the JSON array, no additional text."
    )
}

/// Map HTTP error status codes to parser errors
async fn handle_error_status(status: u16, response: reqwest::Response) -> ParserError {
    let message = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

    match status {
        401 | 403 => ParserError::Authentication(format!("Invalid API key ({status})")),
        _ => ParserError::Api { status, message },
    }
}
