//! Shared LLM client and interaction utilities
//!
//! Provides a common interface for OpenAI API interactions used across services.

use rig::completion::Prompt;
use rig::providers::openai;

const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// Shared LLM client wrapper
#[derive(Clone)]
pub struct LlmClient {
    client: openai::Client,
}

impl LlmClient {
    /// Create a new LLM client with the provided API key
    pub fn new(api_key: &str) -> Self {
        Self {
            client: openai::Client::new(api_key),
        }
    }

    /// Create a client from the OPENAI_API_KEY environment variable
    pub fn from_env() -> Result<Self, String> {
        std::env::var(ENV_OPENAI_API_KEY)
            .map(|key| Self::new(&key))
            .map_err(|_| format!("{} is not set", ENV_OPENAI_API_KEY))
    }

    /// Run a single completion and return the raw model text.
    ///
    /// The caller owns parsing; audit responses are treated as untrusted
    /// until the validator has normalized them.
    pub async fn complete(
        &self,
        model: &str,
        preamble: &str,
        prompt: &str,
    ) -> Result<String, String> {
        let agent = self.client.agent(model).preamble(preamble).build();

        agent.prompt(prompt).await.map_err(|e| e.to_string())
    }
}
