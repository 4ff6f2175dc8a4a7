//! Pure OpenAI REST API client
//!
//! A clean, minimal client for the OpenAI API with no domain-specific logic.
//! Supports chat completions, the Responses API with hosted file search,
//! file uploads, and vector store file attachment.
//!
//! # Example
//!
//! ```rust,ignore
//! use openai_client::{OpenAIClient, ChatRequest, Message, ResponsesRequest};
//!
//! let client = OpenAIClient::from_env()?;
//!
//! // Chat completion
//! let response = client.chat_completion(
//!     ChatRequest::new("gpt-4.1-mini").message(Message::user("Hello!")),
//! ).await?;
//!
//! // File search against a vector store
//! let search = client.create_response(
//!     ResponsesRequest::new("gpt-4.1-mini", "How do refunds work?")
//!         .file_search(["vs_123"]),
//! ).await?;
//! ```

pub mod error;
pub mod types;

pub use error::{OpenAIError, Result};
pub use types::*;

use std::path::Path;

use reqwest::{multipart, Client};
use serde::Serialize;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Pure OpenAI API client.
#[derive(Clone)]
pub struct OpenAIClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAIClient {
    /// Create a new OpenAI client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create from environment variable `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| OpenAIError::Config("OPENAI_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    /// Set a custom base URL (for Azure, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Get the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Chat completion.
    ///
    /// Send messages to the chat completion API and get a response.
    pub async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
        let start = std::time::Instant::now();

        let body = self.post_json("chat/completions", &request).await?;
        let response = ChatResponse::from_value(body)?;

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis(),
            response_len = response.content.len(),
            "OpenAI chat completion"
        );

        Ok(response)
    }

    /// Responses API call.
    ///
    /// Used with the hosted `file_search` tool to query a vector store.
    pub async fn create_response(&self, request: ResponsesRequest) -> Result<ResponsesResponse> {
        let start = std::time::Instant::now();

        debug!(
            model = %request.model,
            input_preview = %truncate_to_char_boundary(&request.input, 200),
            tool_count = request.tools.len(),
            "Sending Responses API request"
        );

        let body = self.post_json("responses", &request).await?;
        let response = ResponsesResponse::from_value(body)?;

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis(),
            output_items = response.output.len(),
            "OpenAI response received"
        );

        Ok(response)
    }

    /// Upload a local file for use with assistants/file search.
    pub async fn upload_file(&self, path: &Path) -> Result<FileObject> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| OpenAIError::Config(format!("Not a file path: {}", path.display())))?;

        let form = multipart::Form::new()
            .text("purpose", "assistants")
            .part("file", multipart::Part::bytes(bytes).file_name(file_name.clone()));

        let response = self
            .http_client
            .post(format!("{}/files", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, file = %file_name, "File upload request failed");
                OpenAIError::Network(e.to_string())
            })?;

        let body = Self::read_body(response).await?;
        serde_json::from_value(body).map_err(|e| OpenAIError::Parse(e.to_string()))
    }

    /// Attach an uploaded file to a vector store.
    pub async fn attach_file_to_vector_store(
        &self,
        vector_store_id: &str,
        file_id: &str,
    ) -> Result<VectorStoreFile> {
        let body = self
            .post_json(
                &format!("vector_stores/{}/files", vector_store_id),
                &AttachFileRequest { file_id },
            )
            .await?;

        serde_json::from_value(body).map_err(|e| OpenAIError::Parse(e.to_string()))
    }

    /// POST a JSON body and return the decoded JSON response.
    async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<serde_json::Value> {
        let response = self
            .http_client
            .post(format!("{}/{}", self.base_url, path))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, path, "OpenAI request failed");
                OpenAIError::Network(e.to_string())
            })?;

        Self::read_body(response).await
    }

    async fn read_body(response: reqwest::Response) -> Result<serde_json::Value> {
        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "OpenAI API error");
            return Err(OpenAIError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        response
            .json()
            .await
            .map_err(|e| OpenAIError::Parse(e.to_string()))
    }
}
