use serde::{Deserialize, Serialize};

/// Configuration for the reasoning-model endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model identifier sent to the provider.
    pub model_id: String,
    /// Bearer token for the provider.
    pub api_key: String,
    /// Override for the API base URL (OpenAI-compatible providers).
    pub api_base_url: Option<String>,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Completion token budget.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    1024
}

impl ModelConfig {
    /// The effective API base URL.
    pub fn base_url(&self) -> &str {
        self.api_base_url
            .as_deref()
            .unwrap_or("https://api.openai.com")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied_when_omitted() {
        let config: ModelConfig = toml_like_json(
            r#"{"model_id": "gpt-4o-mini", "api_key": "k", "api_base_url": null}"#,
        );
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.base_url(), "https://api.openai.com");
    }

    #[test]
    fn test_base_url_override() {
        let config: ModelConfig = toml_like_json(
            r#"{"model_id": "m", "api_key": "k", "api_base_url": "https://llm.internal"}"#,
        );
        assert_eq!(config.base_url(), "https://llm.internal");
    }

    fn toml_like_json(raw: &str) -> ModelConfig {
        serde_json::from_str(raw).unwrap()
    }
}
