//! Documentation Q&A agent
//!
//! Answers questions about a payment provider's documentation with
//! retrieval-augmented generation: search a provider-hosted vector store,
//! bound the retrieved context, generate a grounded answer, and fall back to
//! general-knowledge generation when retrieval comes up empty.
//!
//! # Modules
//!
//! - [`agent`] - Query orchestration and prompt composition
//! - [`retrieval`] - Vector store search, response shape handling, fallback
//! - [`kernel`] - Provider traits, OpenAI adapter and test doubles
//! - [`upload`] - Documentation ingestion into the vector store
//! - [`server`] - HTTP surface for the chat UI

pub mod agent;
pub mod config;
pub mod kernel;
pub mod logging;
pub mod retrieval;
pub mod server;
pub mod types;
pub mod upload;

pub use agent::DocsAgent;
pub use config::{AgentSettings, Config};
pub use kernel::AgentDeps;
pub use retrieval::{BaseRetriever, DocumentRetriever, FallbackGenerator, RetrievalStage};
pub use types::{
    AgentAnswer, AnswerMetadata, RetrievalError, RetrievalErrorKind, RetrievalOutcome,
    SearchResult,
};
