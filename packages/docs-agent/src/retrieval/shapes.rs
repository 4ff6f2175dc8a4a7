//! Known Responses API body shapes and their normalization.
//!
//! Each shape is detected by its own probe; the retrieval machine decides the
//! probing order. Citations never leave this module: `normalize` turns a
//! detected shape into `SearchResult`s.

use openai_client::ResponsesResponse;

use crate::types::{RetrievalError, RetrievalErrorKind, SearchResult};

/// Stand-in relevance for citation-backed results.
///
/// The provider exposes no relevance score on the citation paths, so this is
/// a placeholder and not a measured confidence.
pub const CITATION_SCORE: f32 = 0.95;

/// Relevance for uncited model output.
pub const PLAIN_TEXT_SCORE: f32 = 0.8;

pub const PLAIN_TEXT_SOURCE: &str = "Model knowledge - no document citations";

/// A provider pointer from generated text back to a file.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Citation {
    pub text: String,
    pub file_id: Option<String>,
    /// File name or path, whichever the shape provides first
    pub file_name: Option<String>,
}

impl Citation {
    fn into_search_result(self, fallback_label: &str) -> SearchResult {
        let source = self
            .file_name
            .or(self.file_id)
            .unwrap_or_else(|| fallback_label.to_string());

        SearchResult::new(self.text, source, CITATION_SCORE)
    }
}

/// A detected response shape.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ResponseShape {
    /// `message` output items carrying `file_citation` annotations
    Annotated(Vec<Citation>),
    /// `tool_use_outputs` entry of type `file_search` (older API generation)
    LegacyToolOutput(Vec<Citation>),
    /// Output text without any citation
    PlainText(String),
}

impl ResponseShape {
    /// Probe `message` items for `file_citation` annotations.
    ///
    /// The first content part carrying at least one citation wins; every
    /// citation in it shares that part's text.
    pub fn annotated(response: &ResponsesResponse) -> Option<Self> {
        response
            .output
            .iter()
            .filter(|item| item.kind == "message")
            .flat_map(|item| item.content.iter())
            .find_map(|part| {
                let citations: Vec<Citation> = part
                    .annotations
                    .iter()
                    .filter(|annotation| annotation.kind == "file_citation")
                    .map(|annotation| Citation {
                        text: part.text.clone().unwrap_or_default(),
                        file_id: non_empty(annotation.file_id.as_deref()),
                        file_name: non_empty(annotation.filename.as_deref()),
                    })
                    .collect();

                (!citations.is_empty()).then_some(citations)
            })
            .map(Self::Annotated)
    }

    /// Probe the legacy `tool_use_outputs` field.
    pub fn legacy(response: &ResponsesResponse) -> Option<Self> {
        let output = response
            .tool_use_outputs
            .iter()
            .find(|output| output.kind == "file_search")?;

        if output.file_citations.is_empty() {
            return None;
        }

        let citations = output
            .file_citations
            .iter()
            .map(|citation| Citation {
                text: citation.text.clone().unwrap_or_default(),
                file_id: non_empty(citation.file_id.as_deref()),
                file_name: non_empty(citation.file_path.as_deref())
                    .or_else(|| non_empty(citation.file_name.as_deref())),
            })
            .collect();

        Some(Self::LegacyToolOutput(citations))
    }

    /// Probe for non-blank output text.
    pub fn plain_text(response: &ResponsesResponse) -> Option<Self> {
        response.text().map(Self::PlainText)
    }

    /// Convert the shape into results plus the advisory error it implies.
    pub fn normalize(self, citation_label: &str) -> (Vec<SearchResult>, Option<RetrievalError>) {
        match self {
            Self::Annotated(citations) | Self::LegacyToolOutput(citations) => (
                citations
                    .into_iter()
                    .map(|c| c.into_search_result(citation_label))
                    .collect(),
                None,
            ),
            Self::PlainText(text) => (
                vec![SearchResult::new(text, PLAIN_TEXT_SOURCE, PLAIN_TEXT_SCORE)],
                Some(RetrievalError::new(RetrievalErrorKind::NoDocumentMatches)),
            ),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const LABEL: &str = "Checkout.com documentation";

    fn response(body: serde_json::Value) -> ResponsesResponse {
        ResponsesResponse::from_value(body).unwrap()
    }

    #[test]
    fn test_annotated_uses_content_text_and_filename() {
        let r = response(json!({
            "output": [
                {"type": "file_search_call", "status": "completed"},
                {"type": "message", "content": [{
                    "type": "output_text",
                    "text": "Cards, Apple Pay and iDEAL are supported.",
                    "annotations": [
                        {"type": "file_citation", "file_id": "file-1", "filename": "payment-methods.md"},
                        {"type": "file_citation", "file_id": "file-2", "filename": ""},
                        {"type": "url_citation", "url": "https://example.com"}
                    ]
                }]}
            ]
        }));

        let shape = ResponseShape::annotated(&r).unwrap();
        let (results, error) = shape.normalize(LABEL);

        assert!(error.is_none());
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].source, "payment-methods.md");
        assert_eq!(results[1].source, "file-2");
        assert!(results
            .iter()
            .all(|r| r.content == "Cards, Apple Pay and iDEAL are supported."
                && r.score == CITATION_SCORE));
    }

    #[test]
    fn test_annotated_falls_back_to_label() {
        let r = response(json!({
            "output": [{"type": "message", "content": [{
                "type": "output_text",
                "text": "x",
                "annotations": [{"type": "file_citation"}]
            }]}]
        }));

        let (results, _) = ResponseShape::annotated(&r).unwrap().normalize(LABEL);
        assert_eq!(results[0].source, LABEL);
    }

    #[test]
    fn test_annotated_first_cited_part_wins() {
        let r = response(json!({
            "output": [{"type": "message", "content": [
                {"type": "output_text", "text": "uncited", "annotations": []},
                {"type": "output_text", "text": "first", "annotations": [{"type": "file_citation", "file_id": "a"}]},
                {"type": "output_text", "text": "second", "annotations": [{"type": "file_citation", "file_id": "b"}]}
            ]}]
        }));

        let (results, _) = ResponseShape::annotated(&r).unwrap().normalize(LABEL);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].content, "first");
    }

    #[test]
    fn test_annotated_ignores_non_message_items() {
        let r = response(json!({
            "output": [{"type": "reasoning", "content": [{
                "type": "output_text", "text": "x",
                "annotations": [{"type": "file_citation", "file_id": "a"}]
            }]}]
        }));
        assert!(ResponseShape::annotated(&r).is_none());
    }

    #[test]
    fn test_legacy_source_precedence() {
        let r = response(json!({
            "tool_use_outputs": [
                {"type": "code_interpreter"},
                {"type": "file_search", "file_citations": [
                    {"text": "a", "file_path": "docs/a.md", "file_name": "a.md", "file_id": "f1"},
                    {"text": "b", "file_name": "b.md", "file_id": "f2"},
                    {"text": "c", "file_path": "", "file_id": "f3"},
                    {}
                ]}
            ]
        }));

        let (results, error) = ResponseShape::legacy(&r).unwrap().normalize(LABEL);
        assert!(error.is_none());
        let sources: Vec<&str> = results.iter().map(|r| r.source.as_str()).collect();
        assert_eq!(sources, vec!["docs/a.md", "b.md", "f3", LABEL]);
        assert_eq!(results[3].content, "");
    }

    #[test]
    fn test_legacy_with_empty_citations_is_not_detected() {
        let r = response(json!({
            "tool_use_outputs": [{"type": "file_search", "file_citations": []}]
        }));
        assert!(ResponseShape::legacy(&r).is_none());
    }

    #[test]
    fn test_plain_text_is_a_soft_error() {
        let r = response(json!({"output_text": "General answer."}));

        let (results, error) = ResponseShape::plain_text(&r).unwrap().normalize(LABEL);
        assert_eq!(results, vec![SearchResult::new("General answer.", PLAIN_TEXT_SOURCE, 0.8)]);
        assert_eq!(error.unwrap().kind, RetrievalErrorKind::NoDocumentMatches);
    }

    #[test]
    fn test_blank_text_is_not_plain_text() {
        let r = response(json!({"output_text": "  \n"}));
        assert!(ResponseShape::plain_text(&r).is_none());
    }
}
