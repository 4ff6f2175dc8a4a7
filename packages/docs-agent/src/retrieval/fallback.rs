//! Non-grounded answer generation used when retrieval yields nothing usable.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use openai_client::{ChatRequest, Message};
use tracing::{debug, error, warn};

use crate::agent::prompt;
use crate::config::Config;
use crate::kernel::BaseCompletion;
use crate::types::SearchResult;

/// Relevance reported for a successful fallback answer (simulated).
pub const FALLBACK_SCORE: f32 = 0.95;

/// Relevance reported when even fallback generation failed.
pub const FALLBACK_FAILURE_SCORE: f32 = 0.5;

pub const FALLBACK_FAILURE_SOURCE: &str = "Fallback response";

pub struct FallbackGenerator {
    completion: Arc<dyn BaseCompletion>,
    config: Arc<Config>,
}

impl FallbackGenerator {
    pub fn new(completion: Arc<dyn BaseCompletion>, config: Arc<Config>) -> Self {
        Self { completion, config }
    }

    /// Answer from general knowledge about the product.
    ///
    /// Always returns exactly one result and never fails.
    pub async fn fallback_search(&self, query: &str) -> Vec<SearchResult> {
        let settings = &self.config.agent;
        let request = ChatRequest::new(settings.model.clone())
            .message(Message::system(prompt::fallback_prompt(
                &settings.product_name,
                query,
            )))
            .message(Message::user(query))
            .temperature(settings.fallback_temperature)
            .output_budget(settings.max_output_tokens);

        let outcome = AssertUnwindSafe(self.completion.complete(request))
            .catch_unwind()
            .await;

        let result = match outcome {
            Ok(Ok(response)) => {
                debug!(response_len = response.content.len(), "Fallback answer generated");
                SearchResult::new(
                    response.content,
                    format!("{} general knowledge (fallback)", settings.product_name),
                    FALLBACK_SCORE,
                )
            }
            Ok(Err(e)) => {
                warn!(error = %format!("{:#}", e), "Fallback generation failed");
                self.failure_result()
            }
            Err(_) => {
                error!("Fallback generation panicked");
                self.failure_result()
            }
        };

        vec![result]
    }

    fn failure_result(&self) -> SearchResult {
        SearchResult::new(
            format!(
                "I couldn't find specific information about that in the {} documentation.",
                self.config.agent.product_name
            ),
            FALLBACK_FAILURE_SOURCE,
            FALLBACK_FAILURE_SCORE,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::MockCompletion;

    fn generator(mock: MockCompletion) -> (FallbackGenerator, Arc<MockCompletion>) {
        let mock = Arc::new(mock);
        let generator = FallbackGenerator::new(mock.clone(), Arc::new(Config::default()));
        (generator, mock)
    }

    #[tokio::test]
    async fn test_success_wraps_answer_as_single_result() {
        let (generator, mock) = generator(MockCompletion::new().with_reply("Cards and APMs."));

        let results = generator.fallback_search("payment methods?").await;

        assert_eq!(
            results,
            vec![SearchResult::new(
                "Cards and APMs.",
                "Checkout.com general knowledge (fallback)",
                0.95
            )]
        );

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].temperature, Some(0.2));
        assert_eq!(calls[0].max_tokens, Some(2000));
        assert_eq!(calls[0].messages[0].role, "system");
        assert!(calls[0].messages[0].content.contains("payment methods?"));
        assert_eq!(calls[0].messages[1].content, "payment methods?");
    }

    #[tokio::test]
    async fn test_failure_returns_fixed_result() {
        let (generator, _) = generator(MockCompletion::new().with_failure("401 invalid key"));

        let results = generator.fallback_search("anything").await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].source, "Fallback response");
        assert_eq!(results[0].score, 0.5);
        assert!(results[0].content.contains("Checkout.com documentation"));
    }

    #[tokio::test]
    async fn test_panic_is_contained() {
        let (generator, _) = generator(MockCompletion::new().with_panic("provider exploded"));

        let results = generator.fallback_search("anything").await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].score, FALLBACK_FAILURE_SCORE);
    }
}
