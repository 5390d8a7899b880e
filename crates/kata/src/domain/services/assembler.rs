//! Persona Assembler
//!
//! Selects bounded, ordered fragments of a persona for one channel.
//! Selection always takes prefixes in stored order, never samples, so the
//! same arguments give the same bundle.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{ContextBundle, Examples, Persona};
use crate::domain::value_objects::Channel;

/// Words shorter than this never make a topic relevant
const MIN_TOPIC_WORD_LEN: usize = 4;

/// Limits for one assembly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyOptions {
    pub channel: Channel,
    pub max_examples: usize,
    pub max_style_directives: usize,
    pub max_bio: usize,
    pub max_lore: usize,
    pub max_topics: usize,
    pub max_adjectives: usize,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            channel: Channel::Chat,
            max_examples: 5,
            max_style_directives: 10,
            max_bio: 10,
            max_lore: 10,
            max_topics: 5,
            max_adjectives: 3,
        }
    }
}

impl AssemblyOptions {
    pub fn for_channel(channel: Channel) -> Self {
        Self {
            channel,
            ..Self::default()
        }
    }
}

/// Select fragments for `channel` with default bio/lore/topic limits.
pub fn select_fragments(
    persona: &Persona,
    channel: Channel,
    max_examples: usize,
    max_style_directives: usize,
) -> ContextBundle {
    let options = AssemblyOptions {
        channel,
        max_examples,
        max_style_directives,
        ..AssemblyOptions::default()
    };
    select_fragments_with::<&str>(persona, &options, &[])
}

/// Select fragments with explicit limits and the recent message history.
///
/// History only affects topic selection.
pub fn select_fragments_with<S: AsRef<str>>(
    persona: &Persona,
    options: &AssemblyOptions,
    history: &[S],
) -> ContextBundle {
    let examples = match options.channel {
        Channel::Chat => Examples::Chat(prefix(persona.message_examples(), options.max_examples)),
        Channel::Post => Examples::Post(prefix(persona.post_examples(), options.max_examples)),
    };

    // `all` is consumed first, so truncation drops channel directives first.
    let style: Vec<String> = persona
        .style()
        .directives(options.channel)
        .take(options.max_style_directives)
        .cloned()
        .collect();

    let bundle = ContextBundle {
        channel: options.channel,
        persona_name: persona.name().to_string(),
        system: persona.system().to_string(),
        bio: prefix(persona.bio(), options.max_bio),
        lore: prefix(persona.lore(), options.max_lore),
        examples,
        style,
        topics: select_topics(persona.topics(), history, options.max_topics),
        adjectives: prefix(persona.adjectives(), options.max_adjectives),
    };

    tracing::debug!(
        persona = %persona.name(),
        channel = %options.channel,
        examples = bundle.examples.len(),
        style = bundle.style.len(),
        topics = bundle.topics.len(),
        "Assembled context bundle"
    );
    bundle
}

fn prefix<T: Clone>(items: &[T], max: usize) -> Vec<T> {
    items.iter().take(max).cloned().collect()
}

/// Topics mentioned in the history, in stored order.
///
/// Falls back to the stored-order prefix when there is no history or nothing
/// in it matches.
fn select_topics<S: AsRef<str>>(topics: &[String], history: &[S], max: usize) -> Vec<String> {
    let haystack = history
        .iter()
        .map(|message| message.as_ref().to_lowercase())
        .collect::<Vec<_>>()
        .join("\n");

    if !haystack.trim().is_empty() {
        let relevant: Vec<String> = topics
            .iter()
            .filter(|topic| mentions(&haystack, topic))
            .take(max)
            .cloned()
            .collect();
        if !relevant.is_empty() {
            return relevant;
        }
    }
    prefix(topics, max)
}

fn mentions(haystack: &str, topic: &str) -> bool {
    topic
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| word.chars().count() >= MIN_TOPIC_WORD_LEN)
        .any(|word| haystack.contains(word))
}
