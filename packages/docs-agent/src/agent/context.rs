//! Bounded documentation context for the generation prompt.

use std::borrow::Cow;

use crate::config::AgentSettings;
use crate::types::SearchResult;

/// Context used when no result clears the relevance threshold.
pub const NO_DOCUMENTATION_CONTEXT: &str = "No relevant documentation found.";

/// Appended to snippets cut at the character budget.
pub const TRUNCATION_MARKER: &str = "...";

/// Context block ready to embed in the system prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledContext {
    pub text: String,
    /// Number of snippets that made it into `text`
    pub snippet_count: usize,
}

impl AssembledContext {
    /// Length of `text` in characters, the unit snippet budgets use.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Results above the threshold, in retrieval order, capped at `max_snippets`.
///
/// No re-sorting happens; the provider's order is trusted.
pub fn select_relevant<'a>(
    results: &'a [SearchResult],
    settings: &AgentSettings,
) -> Vec<&'a SearchResult> {
    results
        .iter()
        .filter(|result| result.score > settings.relevance_threshold)
        .take(settings.max_snippets)
        .collect()
}

/// Cut `text` to at most `max_chars` characters, appending the marker if cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => Cow::Owned(format!("{}{}", &text[..end], TRUNCATION_MARKER)),
        None => Cow::Borrowed(text),
    }
}

fn render_snippet(result: &SearchResult, max_chars: usize) -> String {
    format!(
        "Content: {}\nSource: {}\n---\n",
        truncate_chars(&result.content, max_chars),
        result.source
    )
}

/// Build the documentation context from retrieval results.
pub fn assemble(results: &[SearchResult], settings: &AgentSettings) -> AssembledContext {
    let selected = select_relevant(results, settings);

    if selected.is_empty() {
        return AssembledContext {
            text: NO_DOCUMENTATION_CONTEXT.to_string(),
            snippet_count: 0,
        };
    }

    let text = selected
        .iter()
        .map(|result| render_snippet(result, settings.max_snippet_chars))
        .collect::<Vec<_>>()
        .join("\n");

    AssembledContext {
        text,
        snippet_count: selected.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(content: &str, source: &str, score: f32) -> SearchResult {
        SearchResult::new(content, source, score)
    }

    #[test]
    fn test_char_count_counts_characters_not_bytes() {
        let assembled = assemble(&[result("Zahlung über Karte", "de.md", 0.9)], &AgentSettings::default());

        assert_eq!(assembled.char_count(), assembled.text.chars().count());
        assert!(assembled.char_count() < assembled.text.len());
    }

    #[test]
    fn test_threshold_is_strict_and_order_is_kept() {
        let results = vec![
            result("a", "a.md", 0.9),
            result("b", "b.md", 0.7),
            result("c", "c.md", 0.75),
        ];

        let selected = select_relevant(&results, &AgentSettings::default());
        let sources: Vec<&str> = selected.iter().map(|r| r.source.as_str()).collect();
        assert_eq!(sources, vec!["a.md", "c.md"]);
    }

    #[test]
    fn test_at_most_three_snippets_after_filtering() {
        let results = vec![
            result("low", "0.md", 0.1),
            result("1", "1.md", 0.95),
            result("2", "2.md", 0.95),
            result("3", "3.md", 0.95),
            result("4", "4.md", 0.95),
        ];

        let context = assemble(&results, &AgentSettings::default());
        assert_eq!(context.snippet_count, 3);
        assert!(context.text.contains("Source: 3.md"));
        assert!(!context.text.contains("Source: 4.md"));
        assert!(!context.text.contains("Source: 0.md"));
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let text = "é".repeat(10);
        assert_eq!(truncate_chars(&text, 10), text);
        assert_eq!(truncate_chars(&text, 4), format!("{}...", "é".repeat(4)));
    }

    #[test]
    fn test_long_snippet_is_truncated_with_marker() {
        let long = "x".repeat(6000);
        let context = assemble(&[result(&long, "big.md", 0.95)], &AgentSettings::default());

        let expected = format!("Content: {}...\nSource: big.md\n---\n", "x".repeat(5000));
        assert_eq!(context.text, expected);
    }

    #[test]
    fn test_snippets_are_joined_with_delimiters() {
        let context = assemble(
            &[result("one", "1.md", 0.9), result("two", "2.md", 0.8)],
            &AgentSettings::default(),
        );
        assert_eq!(
            context.text,
            "Content: one\nSource: 1.md\n---\n\nContent: two\nSource: 2.md\n---\n"
        );
    }

    #[test]
    fn test_nothing_relevant_uses_fixed_context() {
        let context = assemble(&[result("meh", "m.md", 0.5)], &AgentSettings::default());
        assert_eq!(context.text, NO_DOCUMENTATION_CONTEXT);
        assert_eq!(context.snippet_count, 0);

        assert_eq!(assemble(&[], &AgentSettings::default()).text, NO_DOCUMENTATION_CONTEXT);
    }

    #[test]
    fn test_limits_follow_settings() {
        let settings = AgentSettings {
            relevance_threshold: 0.4,
            max_snippets: 1,
            max_snippet_chars: 3,
            ..AgentSettings::default()
        };
        let context = assemble(&[result("abcdef", "a.md", 0.5), result("z", "z.md", 0.9)], &settings);
        assert_eq!(context.text, "Content: abc...\nSource: a.md\n---\n");
    }
}
