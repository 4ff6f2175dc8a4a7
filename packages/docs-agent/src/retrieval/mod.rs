//! Document retrieval against the provider-hosted vector store.
//!
//! The search response shape differs between API generations (annotation
//! citations, legacy tool-output citations, uncited text). [`RetrievalMachine`]
//! picks the first usable shape; anything short of that degrades to
//! [`FallbackGenerator`] with a [`RetrievalErrorKind`] explaining why.

pub mod fallback;
pub mod machine;
pub(crate) mod shapes;

pub use fallback::FallbackGenerator;
pub use machine::{Resolution, RetrievalMachine, RetrievalStage, Transition};
pub use shapes::{CITATION_SCORE, PLAIN_TEXT_SCORE, PLAIN_TEXT_SOURCE};

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use anyhow::{bail, Result};
use async_trait::async_trait;
use futures::FutureExt;
use openai_client::ResponsesRequest;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::kernel::{AgentDeps, BaseFileSearch};
use crate::types::{RetrievalError, RetrievalErrorKind, RetrievalOutcome, SearchResult};

/// Source of documentation context for the orchestrator.
#[async_trait]
pub trait BaseRetriever: Send + Sync {
    /// Never fails; degradation is reported through the outcome's error.
    async fn search(&self, query: &str) -> RetrievalOutcome;
}

pub struct DocumentRetriever {
    file_search: Arc<dyn BaseFileSearch>,
    fallback: FallbackGenerator,
    config: Arc<Config>,
}

impl DocumentRetriever {
    pub fn new(deps: &AgentDeps) -> Self {
        Self {
            file_search: deps.file_search.clone(),
            fallback: FallbackGenerator::new(deps.completion.clone(), deps.config.clone()),
            config: deps.config.clone(),
        }
    }

    /// Search the documentation.
    ///
    /// Never fails: every failure degrades to fallback results tagged with an
    /// error kind.
    pub async fn search(&self, query: &str) -> RetrievalOutcome {
        info!(query = %query, vector_store_id = %self.config.vector_store_id, "Searching documentation");

        let request = match self.search_request(query) {
            Ok(request) => request,
            Err(e) => {
                error!(error = %e, "Cannot build documentation search request");
                return self
                    .degrade(query, RetrievalErrorKind::DocumentationSearchError)
                    .await;
            }
        };

        match AssertUnwindSafe(self.search_vector_store(query, request))
            .catch_unwind()
            .await
        {
            Ok(outcome) => outcome,
            Err(_) => {
                error!("Documentation search panicked");
                self.degrade(query, RetrievalErrorKind::DocumentationSearchError)
                    .await
            }
        }
    }

    /// Run the non-grounded fallback directly.
    pub async fn fallback_search(&self, query: &str) -> Vec<SearchResult> {
        self.fallback.fallback_search(query).await
    }

    fn search_request(&self, query: &str) -> Result<ResponsesRequest> {
        let vector_store_id = self.config.vector_store_id.trim();
        if vector_store_id.is_empty() {
            bail!("vector store id is not configured");
        }

        let settings = &self.config.agent;
        Ok(ResponsesRequest::new(settings.model.clone(), query)
            .instructions(format!(
                "You are a helpful assistant that searches {} documentation",
                settings.product_name
            ))
            .file_search([vector_store_id]))
    }

    async fn search_vector_store(&self, query: &str, request: ResponsesRequest) -> RetrievalOutcome {
        let response = match self.file_search.file_search(request).await {
            Ok(response) => Some(response),
            Err(e) => {
                warn!(error = %format!("{:#}", e), "Vector search failed");
                None
            }
        };

        let citation_label = format!("{} documentation", self.config.agent.product_name);
        let machine = match &response {
            Some(response) => RetrievalMachine::new(response, &citation_label),
            None => RetrievalMachine::failed(&citation_label),
        };

        let (resolution, path) = machine.run();
        debug!(path = ?path, "Retrieval stages visited");

        match resolution {
            Resolution::Settled {
                stage,
                results,
                error,
            } => {
                info!(stage = ?stage, result_count = results.len(), "Documentation search settled");
                if let Some(error) = &error {
                    warn!(kind = %error.kind, "No citation-backed documents; using model output");
                }
                RetrievalOutcome {
                    results,
                    error,
                    stage,
                }
            }
            Resolution::Fallback(kind) => {
                info!(kind = %kind, "No usable search results, using fallback generation");
                self.degrade(query, kind).await
            }
        }
    }

    async fn degrade(&self, query: &str, kind: RetrievalErrorKind) -> RetrievalOutcome {
        RetrievalOutcome {
            results: self.fallback.fallback_search(query).await,
            error: Some(RetrievalError::new(kind)),
            stage: RetrievalStage::Fallback,
        }
    }
}

#[async_trait]
impl BaseRetriever for DocumentRetriever {
    async fn search(&self, query: &str) -> RetrievalOutcome {
        DocumentRetriever::search(self, query).await
    }
}
