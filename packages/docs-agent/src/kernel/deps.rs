//! Agent dependencies (using traits for testability)
//!
//! Central container handed to the orchestrator, retriever and uploader.
//! All provider access goes through trait objects so tests can swap in mocks.

use std::sync::Arc;

use super::{BaseCompletion, BaseDocumentStore, BaseFileSearch, OpenAIAdapter};
use crate::config::Config;

#[derive(Clone)]
pub struct AgentDeps {
    pub completion: Arc<dyn BaseCompletion>,
    pub file_search: Arc<dyn BaseFileSearch>,
    pub documents: Arc<dyn BaseDocumentStore>,
    /// Immutable process-wide configuration
    pub config: Arc<Config>,
}

impl AgentDeps {
    pub fn new(
        completion: Arc<dyn BaseCompletion>,
        file_search: Arc<dyn BaseFileSearch>,
        documents: Arc<dyn BaseDocumentStore>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            completion,
            file_search,
            documents,
            config,
        }
    }

    /// Wire every collaborator to the OpenAI API.
    pub fn openai(config: Arc<Config>) -> Self {
        let adapter = Arc::new(OpenAIAdapter::from_config(&config));
        Self::new(adapter.clone(), adapter.clone(), adapter, config)
    }
}
