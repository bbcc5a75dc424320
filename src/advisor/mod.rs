//! Remote tactical advisor
//!
//! Two request/response operations backed by a hosted language model:
//! [`Advisor::send_chat_message`] and [`Advisor::analyze_image`]. Neither ever
//! fails from the caller's point of view. Errors are logged and replaced by a
//! fixed fallback line, so nothing here can reach the simulation.
//!
//! HTTP goes through the [`Transport`] trait. The browser build uses
//! `fetch::FetchTransport`; tests script replies with a mock.

pub mod image;
pub mod request;
pub mod terminal;

#[cfg(target_arch = "wasm32")]
pub mod fetch;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use image::ImagePayload;
pub use request::{ChatTurn, Role};
pub use terminal::{AnalysisStatus, Terminal};

use request::{GenerateRequest, GenerateResponse};

pub const CHAT_PERSONA: &str = "You are COMMANDER GEMINI, a veteran tactical advisor for a special operations unit. \
Your responses should be brief, authoritative, and helpful. \
Use military terminology (e.g., \"Copy that,\" \"Negative,\" \"Intel suggests\"). \
Provide tactical advice, weapon recommendations, and encouragement to the operative.";

pub const VISION_PERSONA: &str = "You are a SATELLITE RECONNAISSANCE AI. \
Analyze the provided image for tactical threats, terrain advantages, and potential enemy positions. \
Provide a structured \"INTEL REPORT\" identifying key objects and strategic value.";

pub const CHAT_TEMPERATURE: f32 = 0.7;
pub const VISION_TEMPERATURE: f32 = 0.4;
pub const DEFAULT_VISION_PROMPT: &str = "Analyze this image for tactical intelligence.";

/// Fallback lines shown instead of an error
pub mod fallback {
    pub const CHAT_FAILED: &str = "Connection to Command failed. Check network status.";
    pub const CHAT_EMPTY: &str = "Communication disrupted. Retrying...";
    pub const VISION_FAILED: &str = "Unable to process reconnaissance data.";
    pub const VISION_EMPTY: &str = "Image analysis inconclusive.";
}

#[derive(Debug)]
pub enum AdvisorError {
    /// Request never completed (network, CORS, aborted)
    Transport(String),
    /// Service answered with a non-success status
    Status(u16),
    /// Body was not the expected JSON
    Decode(serde_json::Error),
    /// Image data could not be read
    InvalidImage(String),
    /// Service answered but produced no text
    EmptyReply,
}

impl fmt::Display for AdvisorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdvisorError::Transport(msg) => write!(f, "transport error: {}", msg),
            AdvisorError::Status(code) => write!(f, "service returned HTTP {}", code),
            AdvisorError::Decode(e) => write!(f, "malformed response: {}", e),
            AdvisorError::InvalidImage(msg) => write!(f, "invalid image: {}", msg),
            AdvisorError::EmptyReply => write!(f, "empty reply"),
        }
    }
}

impl std::error::Error for AdvisorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AdvisorError::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for AdvisorError {
    fn from(e: serde_json::Error) -> Self {
        AdvisorError::Decode(e)
    }
}

pub type AdvisorResult<T> = Result<T, AdvisorError>;

/// Where and how to reach the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-3-pro-preview".to_string(),
            api_key: String::new(),
        }
    }
}

impl AdvisorConfig {
    pub fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint.trim_end_matches('/'),
            self.model,
            self.api_key
        )
    }
}

/// POST a JSON body, return the response body
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn post_json(&self, url: &str, body: String) -> AdvisorResult<String>;
}

pub struct Advisor<T: Transport> {
    transport: T,
    config: AdvisorConfig,
}

impl<T: Transport> Advisor<T> {
    pub fn new(transport: T, config: AdvisorConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    async fn generate(&self, request: &GenerateRequest) -> AdvisorResult<String> {
        let body = serde_json::to_string(request)?;
        let raw = self
            .transport
            .post_json(&self.config.generate_url(), body)
            .await?;
        let response: GenerateResponse = serde_json::from_str(&raw)?;
        let text = response.text();
        if text.trim().is_empty() {
            return Err(AdvisorError::EmptyReply);
        }
        Ok(text)
    }

    pub async fn try_chat(&self, message: &str, prior: &[ChatTurn]) -> AdvisorResult<String> {
        let request = GenerateRequest::chat(CHAT_PERSONA, CHAT_TEMPERATURE, prior, message);
        self.generate(&request).await
    }

    pub async fn try_analyze(
        &self,
        image: &ImagePayload,
        prompt: Option<&str>,
    ) -> AdvisorResult<String> {
        let prompt = prompt
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(DEFAULT_VISION_PROMPT);
        let request = GenerateRequest::vision(VISION_PERSONA, VISION_TEMPERATURE, prompt, image);
        self.generate(&request).await
    }

    /// Reply text, or a fallback line when the service can't be reached
    pub async fn send_chat_message(&self, message: &str, prior: &[ChatTurn]) -> String {
        match self.try_chat(message, prior).await {
            Ok(text) => text,
            Err(AdvisorError::EmptyReply) => {
                log::warn!("Advisor chat returned no text");
                fallback::CHAT_EMPTY.to_string()
            }
            Err(e) => {
                log::error!("Advisor chat failed: {}", e);
                fallback::CHAT_FAILED.to_string()
            }
        }
    }

    /// Intel report for raw image bytes (content type is sniffed)
    pub async fn analyze_image(&self, bytes: &[u8], prompt: Option<&str>) -> String {
        let image = ImagePayload::from_bytes(bytes);
        self.analyze_payload(&image, prompt).await
    }

    /// Intel report for a `data:` URL as produced by a file reader
    pub async fn analyze_data_url(&self, data_url: &str, prompt: Option<&str>) -> String {
        match ImagePayload::from_data_url(data_url) {
            Ok(image) => self.analyze_payload(&image, prompt).await,
            Err(e) => {
                log::error!("Advisor image rejected: {}", e);
                fallback::VISION_FAILED.to_string()
            }
        }
    }

    async fn analyze_payload(&self, image: &ImagePayload, prompt: Option<&str>) -> String {
        match self.try_analyze(image, prompt).await {
            Ok(text) => text,
            Err(AdvisorError::EmptyReply) => {
                log::warn!("Advisor vision returned no text");
                fallback::VISION_EMPTY.to_string()
            }
            Err(e) => {
                log::error!("Advisor vision failed: {}", e);
                fallback::VISION_FAILED.to_string()
            }
        }
    }
}
