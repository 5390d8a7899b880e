//! ContextBundle - Persona fragments selected for one channel
//!
//! Handed to an external prompt-construction step.

use serde::Serialize;

use super::ExampleDialogue;
use crate::domain::value_objects::Channel;

/// Examples matching the bundle's channel
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum Examples {
    /// Example dialogues, for conversational replies
    Chat(Vec<ExampleDialogue>),
    /// Example posts, for standalone posts
    Post(Vec<String>),
}

impl Examples {
    pub fn len(&self) -> usize {
        match self {
            Examples::Chat(dialogues) => dialogues.len(),
            Examples::Post(posts) => posts.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn channel(&self) -> Channel {
        match self {
            Examples::Chat(_) => Channel::Chat,
            Examples::Post(_) => Channel::Post,
        }
    }
}

/// Ordered, bounded selection of persona fragments
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextBundle {
    pub channel: Channel,
    pub persona_name: String,
    pub system: String,
    pub bio: Vec<String>,
    pub lore: Vec<String>,
    pub examples: Examples,
    /// `style.all` first, then channel-specific directives
    pub style: Vec<String>,
    pub topics: Vec<String>,
    pub adjectives: Vec<String>,
}
