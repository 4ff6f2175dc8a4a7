// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Retrieval, fallback and prompt composition are domain code that use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseCompletion, BaseFileSearch)

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;
use openai_client::{ChatRequest, ChatResponse, FileObject, ResponsesRequest, ResponsesResponse, VectorStoreFile};

// =============================================================================
// Completion Trait (Infrastructure - chat completions)
// =============================================================================

#[async_trait]
pub trait BaseCompletion: Send + Sync {
    /// Run a chat completion, returning the text and the raw provider body
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse>;
}

// =============================================================================
// File Search Trait (Infrastructure - vector store retrieval)
// =============================================================================

#[async_trait]
pub trait BaseFileSearch: Send + Sync {
    /// Run a file-search-augmented generation call against a vector store
    async fn file_search(&self, request: ResponsesRequest) -> Result<ResponsesResponse>;
}

// =============================================================================
// Document Store Trait (Infrastructure - ingestion)
// =============================================================================

#[async_trait]
pub trait BaseDocumentStore: Send + Sync {
    /// Upload a local file to the provider
    async fn upload(&self, path: &Path) -> Result<FileObject>;

    /// Attach an uploaded file to a vector store so it becomes searchable
    async fn attach(&self, vector_store_id: &str, file_id: &str) -> Result<VectorStoreFile>;
}
