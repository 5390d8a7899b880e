//! ModelProviderHint - Preferred model backend for the host runtime
//!
//! The persona only carries the tag. Choosing and calling the backend is the
//! runtime's job, so nothing in this crate branches on the variant.

use serde::{Deserialize, Serialize};

/// Model backend the runtime should prefer for this persona
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ModelProviderHint {
    #[serde(rename = "openai")]
    OpenAI,
    Anthropic,
    Grok,
    Groq,
    LlamaCloud,
    LlamaLocal,
    Google,
    Ollama,
    #[serde(rename = "openrouter")]
    OpenRouter,
    Together,
    Heurist,
    Galadriel,
    #[serde(rename = "gaianet")]
    GaiaNet,
    #[serde(rename = "redpill")]
    RedPill,
    Venice,
}

impl ModelProviderHint {
    pub const ALL: [ModelProviderHint; 15] = [
        ModelProviderHint::OpenAI,
        ModelProviderHint::Anthropic,
        ModelProviderHint::Grok,
        ModelProviderHint::Groq,
        ModelProviderHint::LlamaCloud,
        ModelProviderHint::LlamaLocal,
        ModelProviderHint::Google,
        ModelProviderHint::Ollama,
        ModelProviderHint::OpenRouter,
        ModelProviderHint::Together,
        ModelProviderHint::Heurist,
        ModelProviderHint::Galadriel,
        ModelProviderHint::GaiaNet,
        ModelProviderHint::RedPill,
        ModelProviderHint::Venice,
    ];

    /// Wire name used in persona files
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelProviderHint::OpenAI => "openai",
            ModelProviderHint::Anthropic => "anthropic",
            ModelProviderHint::Grok => "grok",
            ModelProviderHint::Groq => "groq",
            ModelProviderHint::LlamaCloud => "llama_cloud",
            ModelProviderHint::LlamaLocal => "llama_local",
            ModelProviderHint::Google => "google",
            ModelProviderHint::Ollama => "ollama",
            ModelProviderHint::OpenRouter => "openrouter",
            ModelProviderHint::Together => "together",
            ModelProviderHint::Heurist => "heurist",
            ModelProviderHint::Galadriel => "galadriel",
            ModelProviderHint::GaiaNet => "gaianet",
            ModelProviderHint::RedPill => "redpill",
            ModelProviderHint::Venice => "venice",
        }
    }
}

impl std::fmt::Display for ModelProviderHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ModelProviderHint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| format!("Unknown model provider: {}", s))
    }
}
