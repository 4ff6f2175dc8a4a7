use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

/// Tuning knobs for retrieval and generation.
///
/// None of these values were derived from measurements; they are defaults
/// that can be overridden from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSettings {
    /// Product whose documentation the agent answers about
    pub product_name: String,
    /// Model used for search, grounded answers and fallback answers
    pub model: String,
    /// Results must score strictly above this to enter the prompt
    pub relevance_threshold: f32,
    /// Maximum number of snippets placed in the prompt
    pub max_snippets: usize,
    /// Maximum characters kept per snippet
    pub max_snippet_chars: usize,
    /// Output token budget for every completion call
    pub max_output_tokens: u32,
    pub fallback_temperature: f32,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            product_name: "Checkout.com".to_string(),
            model: "gpt-4.1-mini".to_string(),
            relevance_threshold: 0.7,
            max_snippets: 3,
            max_snippet_chars: 5000,
            max_output_tokens: 2000,
            fallback_temperature: 0.2,
        }
    }
}

/// Application configuration loaded from environment variables
///
/// Read once at startup and shared behind an `Arc`; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    /// Empty when unset; provider calls then fail and the agent degrades
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub vector_store_name: String,
    pub vector_store_id: String,
    pub default_file_id: String,
    pub port: u16,
    /// Empty means any origin
    pub allowed_origins: Vec<String>,
    pub agent: AgentSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: String::new(),
            openai_base_url: "https://api.openai.com/v1".to_string(),
            vector_store_name: "ckodocs".to_string(),
            vector_store_id: "vs_67d17cedee54819198e647fc9392a0c6".to_string(),
            default_file_id: "file-Vk8ao5oKko58kyBLXEQjYH".to_string(),
            port: 3000,
            allowed_origins: Vec::new(),
            agent: AgentSettings::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env files if present (development)
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let agent_defaults = defaults.agent;
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let agent = AgentSettings {
            product_name: var("DOCS_PRODUCT_NAME").unwrap_or(agent_defaults.product_name),
            model: var("DOCS_AGENT_MODEL").unwrap_or(agent_defaults.model),
            relevance_threshold: parse_or(
                var("DOCS_RELEVANCE_THRESHOLD"),
                agent_defaults.relevance_threshold,
                "DOCS_RELEVANCE_THRESHOLD",
            )?,
            max_snippets: parse_or(
                var("DOCS_MAX_SNIPPETS"),
                agent_defaults.max_snippets,
                "DOCS_MAX_SNIPPETS",
            )?,
            max_snippet_chars: parse_or(
                var("DOCS_MAX_SNIPPET_CHARS"),
                agent_defaults.max_snippet_chars,
                "DOCS_MAX_SNIPPET_CHARS",
            )?,
            max_output_tokens: parse_or(
                var("DOCS_MAX_OUTPUT_TOKENS"),
                agent_defaults.max_output_tokens,
                "DOCS_MAX_OUTPUT_TOKENS",
            )?,
            fallback_temperature: parse_or(
                var("DOCS_FALLBACK_TEMPERATURE"),
                agent_defaults.fallback_temperature,
                "DOCS_FALLBACK_TEMPERATURE",
            )?,
        };

        Ok(Self {
            openai_api_key: lookup("OPENAI_API_KEY").unwrap_or_default(),
            openai_base_url: var("OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
            vector_store_name: var("VECTOR_STORE_NAME").unwrap_or(defaults.vector_store_name),
            vector_store_id: var("VECTOR_STORE_ID").unwrap_or(defaults.vector_store_id),
            default_file_id: var("FILE_ID").unwrap_or(defaults.default_file_id),
            port: parse_or(var("PORT"), defaults.port, "PORT")?,
            allowed_origins: var("ALLOWED_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            agent,
        })
    }

    pub fn has_api_key(&self) -> bool {
        !self.openai_api_key.trim().is_empty()
    }
}

fn parse_or<T>(value: Option<String>, default: T, key: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid number, got {:?}", key, raw)),
        None => Ok(default),
    }
}
