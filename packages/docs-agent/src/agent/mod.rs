//! Query orchestration: retrieve, bound the context, generate, disclose.
//!
//! # Example
//!
//! ```rust,ignore
//! use docs_agent::{AgentDeps, Config, DocsAgent};
//!
//! let config = Arc::new(Config::from_env()?);
//! let agent = DocsAgent::new(AgentDeps::openai(config));
//!
//! let answer = agent.answer("What payment methods does Checkout.com support?").await;
//! println!("{}", answer.response);
//! ```

pub mod context;
pub mod prompt;

pub use context::{AssembledContext, NO_DOCUMENTATION_CONTEXT, TRUNCATION_MARKER};

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use anyhow::{bail, Result};
use futures::FutureExt;
use openai_client::{ChatRequest, Message};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::kernel::{AgentDeps, BaseCompletion};
use crate::retrieval::{BaseRetriever, DocumentRetriever};
use crate::types::{AgentAnswer, AnswerMetadata};

/// The documentation assistant.
///
/// Stateless between calls; share it behind an `Arc` across requests.
pub struct DocsAgent {
    completion: Arc<dyn BaseCompletion>,
    retriever: Arc<dyn BaseRetriever>,
    config: Arc<Config>,
}

impl DocsAgent {
    pub fn new(deps: AgentDeps) -> Self {
        let retriever = Arc::new(DocumentRetriever::new(&deps));
        Self::with_retriever(deps, retriever)
    }

    /// Use `retriever` instead of searching the configured vector store.
    pub fn with_retriever(deps: AgentDeps, retriever: Arc<dyn BaseRetriever>) -> Self {
        Self {
            completion: deps.completion,
            retriever,
            config: deps.config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Answer a question about the documentation.
    ///
    /// Never fails: on any error the fixed apology is returned with the error
    /// attached for diagnostics.
    pub async fn answer(&self, question: &str) -> AgentAnswer {
        match AssertUnwindSafe(self.try_answer(question))
            .catch_unwind()
            .await
        {
            Ok(Ok(answer)) => answer,
            Ok(Err(e)) => {
                error!(error = %format!("{:#}", e), "Error running agent");
                AgentAnswer::apology(format!("{:#}", e))
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                error!(panic = %message, "Agent panicked");
                AgentAnswer::apology(message)
            }
        }
    }

    async fn try_answer(&self, question: &str) -> Result<AgentAnswer> {
        let settings = &self.config.agent;

        let outcome = self.retriever.search(question).await;

        let retrieval_note = outcome.error.as_ref().map(|error| {
            warn!(kind = %error.kind, message = %error.message, "Vector search error");
            prompt::retrieval_note(&error.message)
        });

        let context = context::assemble(&outcome.results, settings);
        debug!(
            stage = ?outcome.stage,
            retrieved = outcome.results.len(),
            snippets = context.snippet_count,
            context_chars = context.char_count(),
            "Assembled documentation context"
        );

        let request = ChatRequest::new(settings.model.clone())
            .message(Message::system(prompt::system_prompt(
                &settings.product_name,
                &context.text,
                retrieval_note.as_deref(),
            )))
            .message(Message::user(question))
            .output_budget(settings.max_output_tokens);

        let completion = self.completion.complete(request).await?;

        let mut response = completion.content;
        if response.trim().is_empty() {
            bail!("completion returned no text");
        }

        if let Some(error) = &outcome.error {
            if !response.contains(&error.message) {
                response.push_str(&prompt::degraded_disclosure(&error.message));
            }
        }

        info!(
            response_len = response.len(),
            degraded = outcome.is_degraded(),
            "Answer generated"
        );

        Ok(AgentAnswer {
            response,
            metadata: Some(AnswerMetadata {
                context: outcome.results,
                retrieval_error: outcome.error,
            }),
            raw_provider_response: Some(completion.raw),
            error: None,
        })
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
