//! Output formatting for context bundles

use anyhow::{Context, Result};
use kata::{ContextBundle, Examples};

/// Bundle output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text with clear sections
    #[default]
    Raw,
    /// Pretty-printed JSON
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "raw" | "text" => Ok(OutputFormat::Raw),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Valid: raw, json", s)),
        }
    }
}

pub fn render_bundle(bundle: &ContextBundle, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Raw => Ok(format_raw(bundle)),
        OutputFormat::Json => {
            serde_json::to_string_pretty(bundle).context("Failed to serialize context bundle")
        }
    }
}

/// Raw format with clear sections. Empty sections are left out.
fn format_raw(bundle: &ContextBundle) -> String {
    let mut out = String::new();

    out.push_str("=== SYSTEM ===\n");
    out.push_str(&bundle.system);
    out.push('\n');

    push_list(&mut out, "BIO", &bundle.bio);
    push_list(&mut out, "LORE", &bundle.lore);
    push_list(&mut out, "TOPICS", &bundle.topics);
    push_list(&mut out, "ADJECTIVES", &bundle.adjectives);
    push_list(
        &mut out,
        &format!("STYLE ({})", bundle.channel),
        &bundle.style,
    );

    match &bundle.examples {
        Examples::Chat(dialogues) if !dialogues.is_empty() => {
            out.push_str("\n=== MESSAGE EXAMPLES ===\n");
            for (i, dialogue) in dialogues.iter().enumerate() {
                if i > 0 {
                    out.push('\n');
                }
                for turn in dialogue.turns() {
                    out.push_str(&format!("{}: {}\n", turn.speaker, turn.text()));
                }
            }
        }
        Examples::Post(posts) => push_list(&mut out, "POST EXAMPLES", posts),
        Examples::Chat(_) => {}
    }

    out
}

fn push_list(out: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    out.push_str(&format!("\n=== {} ===\n", title));
    for item in items {
        out.push_str(&format!("- {}\n", item));
    }
}
