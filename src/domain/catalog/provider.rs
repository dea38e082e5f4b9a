use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::CatalogError;

/// LLM provider a model identifier belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LlmProvider {
    #[serde(rename = "OPENAI")]
    OpenAi,
    #[serde(rename = "OPENROUTER")]
    OpenRouter,
    #[serde(rename = "AZURE_OPENAI")]
    AzureOpenAi,
    #[serde(rename = "HUGGINGFACE")]
    HuggingFace,
    Perplexity,
    TogetherAi,
    Anthropic,
    Bedrock,
    Groq,
    Mistral,
    CohereChat,
}

impl LlmProvider {
    pub const ALL: [LlmProvider; 11] = [
        Self::OpenAi,
        Self::OpenRouter,
        Self::AzureOpenAi,
        Self::HuggingFace,
        Self::Perplexity,
        Self::TogetherAi,
        Self::Anthropic,
        Self::Bedrock,
        Self::Groq,
        Self::Mistral,
        Self::CohereChat,
    ];

    /// Wire name of the provider (e.g. `OPENAI`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI",
            Self::OpenRouter => "OPENROUTER",
            Self::AzureOpenAi => "AZURE_OPENAI",
            Self::HuggingFace => "HUGGINGFACE",
            Self::Perplexity => "PERPLEXITY",
            Self::TogetherAi => "TOGETHER_AI",
            Self::Anthropic => "ANTHROPIC",
            Self::Bedrock => "BEDROCK",
            Self::Groq => "GROQ",
            Self::Mistral => "MISTRAL",
            Self::CohereChat => "COHERE_CHAT",
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LlmProvider {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| CatalogError::unknown_provider(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_round_trip() {
        for provider in LlmProvider::ALL {
            assert_eq!(provider.as_str().parse::<LlmProvider>().unwrap(), provider);
        }
    }

    #[test]
    fn test_provider_parse_is_case_sensitive() {
        assert!("openai".parse::<LlmProvider>().is_err());
        assert!("OPENAI".parse::<LlmProvider>().is_ok());
    }

    #[test]
    fn test_provider_serialization() {
        let json = serde_json::to_string(&LlmProvider::TogetherAi).unwrap();
        assert_eq!(json, "\"TOGETHER_AI\"");

        let provider: LlmProvider = serde_json::from_str("\"OPENAI\"").unwrap();
        assert_eq!(provider, LlmProvider::OpenAi);
    }
}
