//! OpenAI API request and response types.

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};

use crate::error::{OpenAIError, Result};

// =============================================================================
// Chat Completion
// =============================================================================

/// Chat completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model to use (e.g., "gpt-4.1-mini", "gpt-4o")
    pub model: String,

    /// Conversation messages
    pub messages: Vec<Message>,

    /// Sampling temperature (0.0 to 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Maximum tokens in completion (for older models)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Maximum completion tokens (for o1, o3, gpt-5)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u32>,
}

impl Default for ChatRequest {
    fn default() -> Self {
        Self {
            model: "gpt-4.1-mini".to_string(),
            messages: Vec::new(),
            temperature: None,
            max_tokens: None,
            max_completion_tokens: None,
        }
    }
}

impl ChatRequest {
    /// Create a new chat request with the given model.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Add a message to the conversation.
    pub fn message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Set temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set max tokens (for older models).
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set max completion tokens (for newer models).
    pub fn max_completion_tokens(mut self, max_completion_tokens: u32) -> Self {
        self.max_completion_tokens = Some(max_completion_tokens);
        self
    }

    /// Set the output budget using whichever field the model accepts.
    pub fn output_budget(self, tokens: u32) -> Self {
        if Self::uses_max_completion_tokens(&self.model) {
            self.max_completion_tokens(tokens)
        } else {
            self.max_tokens(tokens)
        }
    }

    /// Check if a model requires max_completion_tokens instead of max_tokens.
    pub fn uses_max_completion_tokens(model: &str) -> bool {
        model.starts_with("o1")
            || model.starts_with("o3")
            || model.starts_with("gpt-5")
            || model.contains("-o1")
            || model.contains("-o3")
    }
}

/// Chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Role: "system", "user", "assistant"
    pub role: String,

    /// Message content
    pub content: String,
}

impl Message {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Chat completion response.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    /// Response content (empty when the model returned `null`)
    pub content: String,

    /// Token usage statistics
    pub usage: Option<Usage>,

    /// The full JSON body returned by the API
    pub raw: serde_json::Value,
}

impl ChatResponse {
    /// Decode a chat completion body, keeping the raw JSON alongside.
    pub fn from_value(raw: serde_json::Value) -> Result<Self> {
        let parsed: ChatResponseRaw = serde_json::from_value(raw.clone())
            .map_err(|e| OpenAIError::Parse(format!("Invalid chat completion body: {}", e)))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.unwrap_or_default())
            .ok_or_else(|| OpenAIError::Parse("No choices in chat completion".into()))?;

        Ok(Self {
            content,
            usage: parsed.usage,
            raw,
        })
    }
}

/// Raw chat response from API (for internal parsing).
#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponseRaw {
    pub choices: Vec<ChatChoice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatMessageResponse {
    pub content: Option<String>,
}

/// Token usage statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens in the prompt
    pub prompt_tokens: u32,

    /// Tokens in the completion
    pub completion_tokens: u32,

    /// Total tokens used
    pub total_tokens: u32,
}

// =============================================================================
// Responses API (file search)
// =============================================================================

/// Request to the Responses API.
#[derive(Debug, Clone, Serialize)]
pub struct ResponsesRequest {
    pub model: String,

    /// User input text
    pub input: String,

    /// System-level instructions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,

    /// Hosted tools available to the model
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ResponseTool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl ResponsesRequest {
    pub fn new(model: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            input: input.into(),
            instructions: None,
            tools: Vec::new(),
            max_output_tokens: None,
        }
    }

    /// Set the instructions.
    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Attach the hosted `file_search` tool bound to the given vector stores.
    pub fn file_search<I, S>(mut self, vector_store_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tools.push(ResponseTool::FileSearch {
            vector_store_ids: vector_store_ids.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Vector store ids referenced by all file search tools.
    pub fn vector_store_ids(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().flat_map(|tool| match tool {
            ResponseTool::FileSearch { vector_store_ids } => {
                vector_store_ids.iter().map(String::as_str)
            }
        })
    }
}

/// Hosted tool definition for the Responses API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseTool {
    FileSearch { vector_store_ids: Vec<String> },
}

/// Response from the Responses API.
///
/// The body shape has changed across API generations, so every field is
/// optional, unknown fields are ignored, and a field of the wrong type decodes
/// as its default instead of rejecting the whole body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponsesResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,

    /// Output items (`message`, `file_search_call`, ...)
    #[serde(default, deserialize_with = "lenient_seq")]
    pub output: Vec<OutputItem>,

    /// Aggregated output text, when the server includes it
    #[serde(default, deserialize_with = "lenient")]
    pub output_text: Option<String>,

    /// Tool outputs from the older response format
    #[serde(default, deserialize_with = "lenient_seq")]
    pub tool_use_outputs: Vec<ToolUseOutput>,

    /// The full JSON body returned by the API
    #[serde(skip)]
    pub raw: serde_json::Value,
}

impl ResponsesResponse {
    /// Decode a Responses API body, keeping the raw JSON alongside.
    pub fn from_value(raw: serde_json::Value) -> Result<Self> {
        let mut parsed: Self = serde_json::from_value(raw.clone())
            .map_err(|e| OpenAIError::Parse(format!("Invalid responses body: {}", e)))?;
        parsed.raw = raw;
        Ok(parsed)
    }

    /// Output text of the response.
    ///
    /// Prefers the `output_text` field; otherwise joins the `output_text`
    /// parts of every message item. Blank text counts as absent.
    pub fn text(&self) -> Option<String> {
        if let Some(text) = self.output_text.as_deref() {
            if !text.trim().is_empty() {
                return Some(text.to_string());
            }
        }

        let joined = self
            .output
            .iter()
            .filter(|item| item.kind == "message")
            .flat_map(|item| item.content.iter())
            .filter(|part| part.kind == "output_text")
            .filter_map(|part| part.text.as_deref())
            .collect::<Vec<_>>()
            .join("");

        if joined.trim().is_empty() {
            None
        } else {
            Some(joined)
        }
    }
}

/// One item of `output`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputItem {
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub kind: String,

    #[serde(default, deserialize_with = "lenient_seq")]
    pub content: Vec<OutputContent>,
}

/// A content part inside a `message` output item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputContent {
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub kind: String,

    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<String>,

    #[serde(default, deserialize_with = "lenient_seq")]
    pub annotations: Vec<Annotation>,
}

/// Annotation attached to a content part.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Annotation {
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub kind: String,

    #[serde(default, deserialize_with = "lenient")]
    pub file_id: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub filename: Option<String>,
}

/// Legacy tool output entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolUseOutput {
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub kind: String,

    #[serde(default, deserialize_with = "lenient_seq")]
    pub file_citations: Vec<FileCitation>,
}

/// Legacy file citation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileCitation {
    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub file_id: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub file_path: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub file_name: Option<String>,
}

// =============================================================================
// Files & Vector Stores
// =============================================================================

/// A file stored with the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct FileObject {
    pub id: String,

    #[serde(default)]
    pub filename: Option<String>,

    #[serde(default)]
    pub bytes: Option<u64>,

    #[serde(default)]
    pub purpose: Option<String>,
}

/// A file attached to a vector store.
#[derive(Debug, Clone, Deserialize)]
pub struct VectorStoreFile {
    pub id: String,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub vector_store_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AttachFileRequest<'a> {
    pub file_id: &'a str,
}

// =============================================================================
// Utilities
// =============================================================================

/// Decode a field, falling back to its default when it is `null` or of an
/// unexpected type.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Decode a list, skipping elements that do not decode. Anything other than
/// an array yields an empty list.
fn lenient_seq<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };

    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// Truncate a string to at most `max_bytes` bytes at a character boundary.
pub fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) && end > 0 {
        end -= 1;
    }
    &s[..end]
}
