pub mod extract;
pub mod types;

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;

use crate::config::Config;

pub use extract::extract_text;
pub use types::{Content, GenerateContentRequest, GenerationConfig, InlineData, Part, ProviderRole};

/// Failure reported while talking to the generative model.
///
/// The `Display` text is what callers inspect to tell credential and quota
/// problems apart, so `Api` keeps the provider's body verbatim.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Request to model provider failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("[{status}] {body}")]
    Api { status: StatusCode, body: String },
}

#[async_trait]
pub trait GenerativeModel: Send + Sync {
    fn name(&self) -> &str;

    /// Sends one `generateContent` call and returns the raw JSON response.
    async fn generate_content(&self, request: &GenerateContentRequest) -> Result<Value, ProviderError>;
}

// Client for the Gemini REST API
pub struct GeminiModel {
    api_base: String,
    model: String,
    api_key: Option<String>,
    client: Client,
}

impl GeminiModel {
    pub fn new(config: &Config) -> Result<Self> {
        info!("Initializing Gemini client for model {}", config.model);

        if config.api_key.is_none() {
            warn!("GEMINI_API_KEY not found in environment variables!");
            warn!("Create a .env file containing GEMINI_API_KEY=your_api_key_here");
        } else {
            info!("Gemini API key configured");
        }

        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            api_base: config.api_base.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.api_base, self.model)
    }
}

#[async_trait]
impl GenerativeModel for GeminiModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate_content(&self, request: &GenerateContentRequest) -> Result<Value, ProviderError> {
        let url = self.endpoint();
        info!(
            "Sending generateContent to {} ({} turn(s))",
            self.model,
            request.contents.len()
        );

        let mut builder = self.client.post(&url).json(request);
        // Without a key the provider answers with its own authentication error
        if let Some(key) = &self.api_key {
            builder = builder.header("x-goog-api-key", key);
        }

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await?;
            debug!("Provider error body: {}", body);
            return Err(ProviderError::Api { status, body });
        }

        let response_json: Value = response.json().await?;
        debug!("Response JSON: {}", response_json);
        Ok(response_json)
    }
}
