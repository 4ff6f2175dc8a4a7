// OpenAI implementation of the kernel traits
//
// Thin adapter over openai-client; what to prompt for lives in the agent and
// retrieval modules.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use openai_client::{
    ChatRequest, ChatResponse, FileObject, OpenAIClient, ResponsesRequest, ResponsesResponse,
    VectorStoreFile,
};

use super::{BaseCompletion, BaseDocumentStore, BaseFileSearch};
use crate::config::Config;

/// Wrapper around OpenAIClient that implements the kernel traits
#[derive(Clone)]
pub struct OpenAIAdapter(pub Arc<OpenAIClient>);

impl OpenAIAdapter {
    pub fn new(client: Arc<OpenAIClient>) -> Self {
        Self(client)
    }

    /// Build a client from configuration. A missing API key is not an error
    /// here; every call will be rejected by the provider instead.
    pub fn from_config(config: &Config) -> Self {
        if !config.has_api_key() {
            tracing::warn!("OPENAI_API_KEY is not set; provider calls will fail and answers will degrade");
        }

        let client = OpenAIClient::new(config.openai_api_key.clone())
            .with_base_url(config.openai_base_url.clone());
        Self(Arc::new(client))
    }
}

#[async_trait]
impl BaseCompletion for OpenAIAdapter {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse> {
        let model = request.model.clone();

        tracing::info!(model = %model, messages = request.messages.len(), "Calling OpenAI chat completion");

        self.0
            .chat_completion(request)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, model = %model, "OpenAI chat completion failed");
                e
            })
            .context("Failed to call OpenAI chat completion")
    }
}

#[async_trait]
impl BaseFileSearch for OpenAIAdapter {
    async fn file_search(&self, request: ResponsesRequest) -> Result<ResponsesResponse> {
        let vector_stores = request.vector_store_ids().collect::<Vec<_>>().join(",");

        tracing::info!(
            model = %request.model,
            vector_stores = %vector_stores,
            "Searching vector store"
        );

        self.0
            .create_response(request)
            .await
            .context("Failed to search vector store")
    }
}

#[async_trait]
impl BaseDocumentStore for OpenAIAdapter {
    async fn upload(&self, path: &Path) -> Result<FileObject> {
        self.0
            .upload_file(path)
            .await
            .with_context(|| format!("Failed to upload {}", path.display()))
    }

    async fn attach(&self, vector_store_id: &str, file_id: &str) -> Result<VectorStoreFile> {
        self.0
            .attach_file_to_vector_store(vector_store_id, file_id)
            .await
            .with_context(|| format!("Failed to attach {} to {}", file_id, vector_store_id))
    }
}
