// TestDependencies - mock implementations for testing
//
// Provides scripted provider doubles that can be injected into AgentDeps.
// Each mock pops queued replies in order, then falls back to its default.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use openai_client::{
    ChatRequest, ChatResponse, FileObject, ResponsesRequest, ResponsesResponse, VectorStoreFile,
};
use serde_json::json;

use super::{AgentDeps, BaseCompletion, BaseDocumentStore, BaseFileSearch};
use crate::config::Config;
use crate::retrieval::BaseRetriever;
use crate::types::RetrievalOutcome;

/// A scripted reply.
#[derive(Debug, Clone)]
enum Scripted<T> {
    Reply(T),
    Fail(String),
    Panic(String),
}

impl<T: Clone> Scripted<T> {
    /// Resolve the script; panics are raised after all locks are released.
    fn resolve(self) -> Result<T> {
        match self {
            Scripted::Reply(value) => Ok(value),
            Scripted::Fail(message) => Err(anyhow!(message)),
            Scripted::Panic(message) => panic!("{}", message),
        }
    }
}

fn next_script<T: Clone>(queue: &Mutex<VecDeque<Scripted<T>>>, default: &Mutex<Scripted<T>>) -> Scripted<T> {
    let queued = queue.lock().unwrap().pop_front();
    queued.unwrap_or_else(|| default.lock().unwrap().clone())
}

// =============================================================================
// Mock Completion
// =============================================================================

pub struct MockCompletion {
    replies: Mutex<VecDeque<Scripted<String>>>,
    default: Mutex<Scripted<String>>,
    calls: Mutex<Vec<ChatRequest>>,
}

impl Default for MockCompletion {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCompletion {
    pub const DEFAULT_REPLY: &'static str = "Mock answer from the documentation.";

    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            default: Mutex::new(Scripted::Reply(Self::DEFAULT_REPLY.to_string())),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails unless a reply was queued.
    pub fn failing(self, message: &str) -> Self {
        *self.default.lock().unwrap() = Scripted::Fail(message.to_string());
        self
    }

    /// Queue a successful reply.
    pub fn with_reply(self, content: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Scripted::Reply(content.to_string()));
        self
    }

    /// Queue a failed call.
    pub fn with_failure(self, message: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Scripted::Fail(message.to_string()));
        self
    }

    /// Queue a call that panics.
    pub fn with_panic(self, message: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Scripted::Panic(message.to_string()));
        self
    }

    /// Get all requests that were sent
    pub fn calls(&self) -> Vec<ChatRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// The chat completion body the provider would return for `content`.
    pub fn completion_body(content: &str) -> serde_json::Value {
        json!({
            "id": "chatcmpl-mock",
            "object": "chat.completion",
            "model": "mock",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        })
    }
}

#[async_trait]
impl BaseCompletion for MockCompletion {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse> {
        self.calls.lock().unwrap().push(request);

        let content = next_script(&self.replies, &self.default).resolve()?;
        Ok(ChatResponse::from_value(Self::completion_body(&content))?)
    }
}

// =============================================================================
// Mock File Search
// =============================================================================

pub struct MockFileSearch {
    responses: Mutex<VecDeque<Scripted<serde_json::Value>>>,
    default: Mutex<Scripted<serde_json::Value>>,
    calls: Mutex<Vec<ResponsesRequest>>,
}

impl Default for MockFileSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFileSearch {
    /// By default the search returns a body with no output at all.
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            default: Mutex::new(Scripted::Reply(json!({"id": "resp_mock", "output": []}))),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails unless a response was queued.
    pub fn failing(self, message: &str) -> Self {
        *self.default.lock().unwrap() = Scripted::Fail(message.to_string());
        self
    }

    /// Queue a raw Responses API body.
    pub fn with_response(self, body: serde_json::Value) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Scripted::Reply(body));
        self
    }

    pub fn with_failure(self, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Scripted::Fail(message.to_string()));
        self
    }

    pub fn with_panic(self, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Scripted::Panic(message.to_string()));
        self
    }

    /// Get all search requests that were sent
    pub fn calls(&self) -> Vec<ResponsesRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl BaseFileSearch for MockFileSearch {
    async fn file_search(&self, request: ResponsesRequest) -> Result<ResponsesResponse> {
        self.calls.lock().unwrap().push(request);

        let body = next_script(&self.responses, &self.default).resolve()?;
        Ok(ResponsesResponse::from_value(body)?)
    }
}

// =============================================================================
// Mock Document Store
// =============================================================================

#[derive(Default)]
pub struct MockDocumentStore {
    /// File names whose upload should fail
    failing_files: Mutex<Vec<String>>,
    uploads: Mutex<Vec<PathBuf>>,
    attachments: Mutex<Vec<(String, String)>>,
}

impl MockDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make uploads of the given file name fail.
    pub fn failing_for(self, file_name: &str) -> Self {
        self.failing_files.lock().unwrap().push(file_name.to_string());
        self
    }

    /// Get all paths that were uploaded
    pub fn uploads(&self) -> Vec<PathBuf> {
        self.uploads.lock().unwrap().clone()
    }

    /// Get all (vector_store_id, file_id) attachments
    pub fn attachments(&self) -> Vec<(String, String)> {
        self.attachments.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseDocumentStore for MockDocumentStore {
    async fn upload(&self, path: &Path) -> Result<FileObject> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if self.failing_files.lock().unwrap().contains(&file_name) {
            return Err(anyhow!("upload rejected: {}", file_name));
        }

        let mut uploads = self.uploads.lock().unwrap();
        uploads.push(path.to_path_buf());

        Ok(FileObject {
            id: format!("file-mock-{}", uploads.len()),
            filename: Some(file_name),
            bytes: None,
            purpose: Some("assistants".to_string()),
        })
    }

    async fn attach(&self, vector_store_id: &str, file_id: &str) -> Result<VectorStoreFile> {
        self.attachments
            .lock()
            .unwrap()
            .push((vector_store_id.to_string(), file_id.to_string()));

        Ok(VectorStoreFile {
            id: file_id.to_string(),
            status: Some("in_progress".to_string()),
            vector_store_id: Some(vector_store_id.to_string()),
        })
    }
}

// =============================================================================
// Mock Retriever
// =============================================================================

/// Returns the same outcome for every query, bypassing the search pipeline.
pub struct MockRetriever {
    outcome: RetrievalOutcome,
    queries: Mutex<Vec<String>>,
}

impl MockRetriever {
    pub fn new(outcome: RetrievalOutcome) -> Self {
        Self {
            outcome,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Get all queries that were searched
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseRetriever for MockRetriever {
    async fn search(&self, query: &str) -> RetrievalOutcome {
        self.queries.lock().unwrap().push(query.to_string());
        self.outcome.clone()
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Mock collaborators plus a configuration, convertible into `AgentDeps`.
///
/// Keep the `Arc`s to inspect recorded calls after the run.
pub struct TestDependencies {
    pub completion: Arc<MockCompletion>,
    pub file_search: Arc<MockFileSearch>,
    pub documents: Arc<MockDocumentStore>,
    pub config: Config,
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            completion: Arc::new(MockCompletion::new()),
            file_search: Arc::new(MockFileSearch::new()),
            documents: Arc::new(MockDocumentStore::new()),
            config: Config {
                openai_api_key: "sk-test".to_string(),
                ..Config::default()
            },
        }
    }

    pub fn completion(mut self, completion: MockCompletion) -> Self {
        self.completion = Arc::new(completion);
        self
    }

    pub fn file_search(mut self, file_search: MockFileSearch) -> Self {
        self.file_search = Arc::new(file_search);
        self
    }

    pub fn documents(mut self, documents: MockDocumentStore) -> Self {
        self.documents = Arc::new(documents);
        self
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn deps(&self) -> AgentDeps {
        AgentDeps::new(
            self.completion.clone(),
            self.file_search.clone(),
            self.documents.clone(),
            Arc::new(self.config.clone()),
        )
    }
}
