//! Example dialogues - Short conversations showing how the persona replies

use serde::Serialize;
use serde_json::{Map, Value};

/// One utterance within an example dialogue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Turn {
    /// Placeholder such as `{{user1}}`, or the persona's own name
    pub speaker: String,
    pub content: TurnContent,
}

/// Turn payload. Only `text` is required; anything else (e.g. `action`) is kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnContent {
    pub text: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Turn {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            content: TurnContent {
                text: text.into(),
                extra: Map::new(),
            },
        }
    }

    /// Add an opaque content field
    pub fn with_content_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.content.extra.insert(key.into(), value);
        self
    }

    /// Whether the speaker is a `{{...}}` counterpart placeholder
    pub fn is_placeholder(&self) -> bool {
        is_placeholder(&self.speaker)
    }

    pub fn text(&self) -> &str {
        &self.content.text
    }
}

/// Whether a speaker token stands for an arbitrary counterpart
pub fn is_placeholder(speaker: &str) -> bool {
    let speaker = speaker.trim();
    speaker.len() > 4 && speaker.starts_with("{{") && speaker.ends_with("}}")
}

/// An ordered example conversation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ExampleDialogue {
    turns: Vec<Turn>,
}

impl ExampleDialogue {
    pub fn new(turns: Vec<Turn>) -> Self {
        Self { turns }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Whether any turn is attributed to `name`
    pub fn has_turn_by(&self, name: &str) -> bool {
        self.turns
            .iter()
            .any(|t| !t.is_placeholder() && t.speaker.trim() == name.trim())
    }
}
