//! Retrieval state machine.
//!
//! Decides, from a decoded search response, which shape to trust or whether
//! to hand over to fallback generation. Pure and synchronous: no IO happens
//! here, so every transition can be asserted directly in tests.
//!
//! ```text
//! Primary ──none──▶ Legacy ──none──▶ PlainText ──none──▶ Fallback(NoResultsError)
//!    │                │                  │
//!  settle           settle        settle + NoDocumentMatches
//!
//! Failed ──▶ Fallback(VectorSearchError)
//! Fallback ──▶ delegate to the fallback generator
//! ```

use openai_client::ResponsesResponse;
use serde::Serialize;

use super::shapes::ResponseShape;
use crate::types::{RetrievalError, RetrievalErrorKind, SearchResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum RetrievalStage {
    /// Probe annotation citations on message output
    #[default]
    Primary,
    /// Probe legacy tool outputs
    Legacy,
    /// Probe uncited output text
    PlainText,
    /// Hand over to fallback generation
    Fallback,
    /// The search call produced no decodable response
    Failed,
}

/// Result of a single step.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Move to another stage and keep going
    Advance(RetrievalStage),
    /// Stop with results from the current stage
    Settle {
        results: Vec<SearchResult>,
        error: Option<RetrievalError>,
    },
    /// Stop and let the fallback generator answer, tagged with this kind
    Delegate(RetrievalErrorKind),
}

/// Terminal decision of a machine run.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Settled {
        stage: RetrievalStage,
        results: Vec<SearchResult>,
        error: Option<RetrievalError>,
    },
    Fallback(RetrievalErrorKind),
}

pub struct RetrievalMachine<'a> {
    stage: RetrievalStage,
    response: Option<&'a ResponsesResponse>,
    fallback_kind: RetrievalErrorKind,
    citation_label: &'a str,
    path: Vec<RetrievalStage>,
}

impl<'a> RetrievalMachine<'a> {
    /// Start probing a decoded response.
    pub fn new(response: &'a ResponsesResponse, citation_label: &'a str) -> Self {
        Self::start(RetrievalStage::Primary, Some(response), citation_label)
    }

    /// Start from a failed search call.
    pub fn failed(citation_label: &'a str) -> Self {
        Self::start(RetrievalStage::Failed, None, citation_label)
    }

    fn start(
        stage: RetrievalStage,
        response: Option<&'a ResponsesResponse>,
        citation_label: &'a str,
    ) -> Self {
        Self {
            stage,
            response,
            fallback_kind: RetrievalErrorKind::NoResultsError,
            citation_label,
            path: vec![stage],
        }
    }

    pub fn stage(&self) -> RetrievalStage {
        self.stage
    }

    /// Stages visited so far, in order.
    pub fn path(&self) -> &[RetrievalStage] {
        &self.path
    }

    /// Take one transition from the current stage.
    pub fn step(&mut self) -> Transition {
        use RetrievalStage::*;

        let transition = match (self.stage, self.response) {
            (Primary, Some(response)) => match ResponseShape::annotated(response) {
                Some(shape) => self.settle(shape),
                None => Transition::Advance(Legacy),
            },
            (Legacy, Some(response)) => match ResponseShape::legacy(response) {
                Some(shape) => self.settle(shape),
                None => Transition::Advance(PlainText),
            },
            (PlainText, Some(response)) => match ResponseShape::plain_text(response) {
                Some(shape) => self.settle(shape),
                None => {
                    self.fallback_kind = RetrievalErrorKind::NoResultsError;
                    Transition::Advance(Fallback)
                }
            },
            (Primary | Legacy | PlainText, None) => Transition::Advance(Failed),
            (Failed, _) => {
                self.fallback_kind = RetrievalErrorKind::VectorSearchError;
                Transition::Advance(Fallback)
            }
            (Fallback, _) => Transition::Delegate(self.fallback_kind),
        };

        if let Transition::Advance(next) = &transition {
            self.stage = *next;
            self.path.push(*next);
        }

        transition
    }

    /// Step until the machine settles or delegates.
    pub fn run(mut self) -> (Resolution, Vec<RetrievalStage>) {
        loop {
            match self.step() {
                Transition::Advance(_) => continue,
                Transition::Settle { results, error } => {
                    let resolution = Resolution::Settled {
                        stage: self.stage,
                        results,
                        error,
                    };
                    return (resolution, self.path);
                }
                Transition::Delegate(kind) => return (Resolution::Fallback(kind), self.path),
            }
        }
    }

    fn settle(&self, shape: ResponseShape) -> Transition {
        let (results, error) = shape.normalize(self.citation_label);
        Transition::Settle { results, error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use RetrievalStage::*;

    const LABEL: &str = "Checkout.com documentation";

    fn response(body: serde_json::Value) -> ResponsesResponse {
        ResponsesResponse::from_value(body).unwrap()
    }

    #[test]
    fn test_primary_settles_on_annotations() {
        let r = response(json!({
            "output": [{"type": "message", "content": [{
                "type": "output_text", "text": "Refunds take 5 days.",
                "annotations": [{"type": "file_citation", "filename": "refunds.md"}]
            }]}],
            "tool_use_outputs": [{"type": "file_search", "file_citations": [{"text": "legacy"}]}]
        }));

        let mut machine = RetrievalMachine::new(&r, LABEL);
        match machine.step() {
            Transition::Settle { results, error } => {
                assert_eq!(results[0].source, "refunds.md");
                assert!(error.is_none());
            }
            other => panic!("expected settle, got {:?}", other),
        }
        assert_eq!(machine.stage(), Primary);
    }

    #[test]
    fn test_primary_advances_to_legacy() {
        let r = response(json!({
            "tool_use_outputs": [{"type": "file_search", "file_citations": [{"text": "legacy", "file_id": "f1"}]}]
        }));

        let mut machine = RetrievalMachine::new(&r, LABEL);
        assert_eq!(machine.step(), Transition::Advance(Legacy));
        assert!(matches!(machine.step(), Transition::Settle { .. }));
        assert_eq!(machine.path(), &[Primary, Legacy]);
    }

    #[test]
    fn test_plain_text_settles_with_soft_error() {
        let r = response(json!({"output_text": "From general knowledge."}));

        let (resolution, path) = RetrievalMachine::new(&r, LABEL).run();
        assert_eq!(path, vec![Primary, Legacy, PlainText]);
        match resolution {
            Resolution::Settled { stage, results, error } => {
                assert_eq!(stage, PlainText);
                assert_eq!(results.len(), 1);
                assert_eq!(results[0].score, 0.8);
                assert_eq!(error.unwrap().kind, RetrievalErrorKind::NoDocumentMatches);
            }
            other => panic!("expected settled, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_response_delegates_with_no_results() {
        let r = response(json!({"output": []}));

        let (resolution, path) = RetrievalMachine::new(&r, LABEL).run();
        assert_eq!(resolution, Resolution::Fallback(RetrievalErrorKind::NoResultsError));
        assert_eq!(path, vec![Primary, Legacy, PlainText, Fallback]);
    }

    #[test]
    fn test_failed_delegates_with_vector_search_error() {
        let mut machine = RetrievalMachine::failed(LABEL);
        assert_eq!(machine.stage(), Failed);
        assert_eq!(machine.step(), Transition::Advance(Fallback));
        assert_eq!(
            machine.step(),
            Transition::Delegate(RetrievalErrorKind::VectorSearchError)
        );
    }

    #[test]
    fn test_fallback_is_terminal() {
        let mut machine = RetrievalMachine::failed(LABEL);
        let _ = machine.step();
        for _ in 0..3 {
            assert!(matches!(machine.step(), Transition::Delegate(_)));
            assert_eq!(machine.stage(), Fallback);
        }
    }
}
