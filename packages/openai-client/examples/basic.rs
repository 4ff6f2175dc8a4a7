//! Basic OpenAI client usage example

use openai_client::{ChatRequest, Message, OpenAIClient, ResponsesRequest};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize from environment
    let client = OpenAIClient::from_env()?;

    // Simple chat completion
    println!("=== Chat Completion ===");
    let response = client
        .chat_completion(
            ChatRequest::new("gpt-4.1-mini")
                .message(Message::system("You are a helpful assistant."))
                .message(Message::user("What is a payment gateway in one sentence?"))
                .temperature(0.2)
                .max_tokens(100),
        )
        .await?;

    println!("Response: {}", response.content);

    // File search
    let Ok(vector_store_id) = std::env::var("VECTOR_STORE_ID") else {
        println!("\nSet VECTOR_STORE_ID to try file search");
        return Ok(());
    };

    println!("\n=== File Search ===");
    let search = client
        .create_response(
            ResponsesRequest::new("gpt-4.1-mini", "How are refunds processed?")
                .instructions("You are a helpful assistant that searches the documentation")
                .file_search([vector_store_id]),
        )
        .await?;

    println!("Output items: {}", search.output.len());
    println!("Text: {}", search.text().unwrap_or_default());

    Ok(())
}
