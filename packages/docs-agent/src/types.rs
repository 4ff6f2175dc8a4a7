//! Request-scoped records exchanged between retrieval and the orchestrator.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::retrieval::RetrievalStage;

/// A piece of documentation (or synthetic stand-in) offered as evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub content: String,
    /// File name, file id, or a fixed label
    pub source: String,
    /// Relevance in `[0, 1]`
    pub score: f32,
}

impl SearchResult {
    pub fn new(content: impl Into<String>, source: impl Into<String>, score: f32) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
            score,
        }
    }
}

/// Why retrieval degraded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RetrievalErrorKind {
    /// The search ran but nothing was backed by a citation
    NoDocumentMatches,
    /// The search returned nothing usable; fallback generation was used
    NoResultsError,
    /// The search call itself failed; fallback generation was used
    VectorSearchError,
    /// Unexpected failure around the search; fallback generation was used
    DocumentationSearchError,
}

impl RetrievalErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoDocumentMatches => "NoDocumentMatches",
            Self::NoResultsError => "NoResultsError",
            Self::VectorSearchError => "VectorSearchError",
            Self::DocumentationSearchError => "DocumentationSearchError",
        }
    }

    /// User-facing explanation attached to this kind.
    pub fn message(&self) -> &'static str {
        match self {
            Self::NoDocumentMatches => {
                "The search didn't find relevant documents in the knowledge base."
            }
            Self::NoResultsError | Self::VectorSearchError | Self::DocumentationSearchError => {
                "The information you requested could not be found in our knowledge base."
            }
        }
    }

    /// Whether the fallback generator produced the accompanying results.
    pub fn used_fallback(&self) -> bool {
        !matches!(self, Self::NoDocumentMatches)
    }
}

impl fmt::Display for RetrievalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Advisory error attached to a retrieval outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalError {
    #[serde(rename = "type")]
    pub kind: RetrievalErrorKind,
    pub message: String,
}

impl RetrievalError {
    pub fn new(kind: RetrievalErrorKind) -> Self {
        Self {
            kind,
            message: kind.message().to_string(),
        }
    }
}

impl fmt::Display for RetrievalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.kind, self.message)
    }
}

/// What the retrieval adapter hands back to the orchestrator.
///
/// `error` does not imply `results` is empty: degraded results usually
/// accompany it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievalOutcome {
    /// Relevance-ranked by the provider, not re-sorted
    pub results: Vec<SearchResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RetrievalError>,
    /// Stage that produced `results`
    #[serde(skip)]
    pub stage: RetrievalStage,
}

impl RetrievalOutcome {
    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

/// Context and diagnostics returned with a successful answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerMetadata {
    /// Every retrieved result, before filtering
    pub context: Vec<SearchResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieval_error: Option<RetrievalError>,
}

/// The terminal artifact handed to the chat UI.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentAnswer {
    /// Never empty
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<AnswerMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_provider_response: Option<serde_json::Value>,
    /// Diagnostic marker set only when answering failed outright
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AgentAnswer {
    pub const APOLOGY: &'static str =
        "I'm sorry, I encountered an error while processing your request. Please try again.";

    /// The answer returned when anything fails outside the degraded paths.
    pub fn apology(error: impl Into<String>) -> Self {
        Self {
            response: Self::APOLOGY.to_string(),
            metadata: None,
            raw_provider_response: None,
            error: Some(error.into()),
        }
    }

    pub fn is_apology(&self) -> bool {
        self.error.is_some()
    }

    /// Context results, empty for an apology.
    pub fn context(&self) -> &[SearchResult] {
        self.metadata
            .as_ref()
            .map(|m| m.context.as_slice())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds_carry_fixed_messages() {
        let soft = RetrievalError::new(RetrievalErrorKind::NoDocumentMatches);
        assert_eq!(
            soft.message,
            "The search didn't find relevant documents in the knowledge base."
        );
        assert!(!soft.kind.used_fallback());

        for kind in [
            RetrievalErrorKind::NoResultsError,
            RetrievalErrorKind::VectorSearchError,
            RetrievalErrorKind::DocumentationSearchError,
        ] {
            assert!(kind.used_fallback());
            assert_eq!(
                RetrievalError::new(kind).message,
                "The information you requested could not be found in our knowledge base."
            );
        }
    }

    #[test]
    fn test_retrieval_error_serializes_kind_as_type() {
        let value =
            serde_json::to_value(RetrievalError::new(RetrievalErrorKind::VectorSearchError))
                .unwrap();
        assert_eq!(value["type"], "VectorSearchError");
    }

    #[test]
    fn test_answer_serializes_camel_case_and_skips_absent_fields() {
        let answer = AgentAnswer {
            response: "Cards and wallets.".into(),
            metadata: Some(AnswerMetadata {
                context: vec![SearchResult::new("doc", "payments.md", 0.95)],
                retrieval_error: None,
            }),
            raw_provider_response: Some(serde_json::json!({"id": "chatcmpl-1"})),
            error: None,
        };

        let value = serde_json::to_value(&answer).unwrap();
        assert_eq!(value["metadata"]["context"][0]["source"], "payments.md");
        assert!(value["metadata"].get("retrievalError").is_none());
        assert_eq!(value["rawProviderResponse"]["id"], "chatcmpl-1");
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_apology_is_never_empty() {
        let answer = AgentAnswer::apology("boom");
        assert!(!answer.response.is_empty());
        assert!(answer.is_apology());
        assert!(answer.context().is_empty());
    }
}
