//! Prompt text.

/// System prompt for the grounded answer.
///
/// `retrieval_note` becomes a sixth instruction when retrieval degraded.
pub fn system_prompt(product: &str, context: &str, retrieval_note: Option<&str>) -> String {
    let mut prompt = format!(
        "You are a helpful AI assistant that answers questions about {product} documentation. Be concise.

When responding:
1. Base your answers on the documentation provided in the context.
2. If the answer is in the documentation, answer confidently.
3. If information is missing, acknowledge this and suggest contacting {product} support.
4. Don't make up information beyond what's in the context.
5. Keep responses brief but helpful.
"
    );

    if let Some(note) = retrieval_note {
        prompt.push_str(&format!("6. {}\n", note));
    }

    prompt.push_str(&format!("\nContext from documentation:\n{}", context));
    prompt
}

/// Note carried into the prompt when retrieval reported an error.
pub fn retrieval_note(message: &str) -> String {
    format!("Note: {}", message)
}

/// Disclosure appended to an answer produced with degraded retrieval.
pub fn degraded_disclosure(message: &str) -> String {
    format!(
        "\n\n(Note: {} I've provided an answer based on general knowledge instead.)",
        message
    )
}

/// System prompt for the non-grounded fallback answer.
pub fn fallback_prompt(product: &str, query: &str) -> String {
    format!(
        "You're helping retrieve information about {product} from their documentation.
The user is asking: \"{query}\".
Please provide a concise answer based on what you know about {product}'s payment processing services, \
APIs, and integration methods. Focus specifically on their documentation."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_without_note() {
        let prompt = system_prompt("Checkout.com", "CTX", None);
        assert!(prompt.contains("5. Keep responses brief but helpful.\n\nContext from documentation:\nCTX"));
        assert!(!prompt.contains("6."));
        assert!(prompt.contains("contacting Checkout.com support"));
    }

    #[test]
    fn test_system_prompt_with_note() {
        let prompt = system_prompt("Checkout.com", "CTX", Some("Note: degraded."));
        assert!(prompt.contains("6. Note: degraded.\n\nContext from documentation:\nCTX"));
    }

    #[test]
    fn test_fallback_prompt_quotes_question() {
        let prompt = fallback_prompt("Checkout.com", "How do refunds work?");
        assert!(prompt.contains("The user is asking: \"How do refunds work?\"."));
        assert!(prompt.contains("Checkout.com's payment processing services, APIs"));
    }
}
