//! Built-in persona presets
//!
//! Embedded persona files that ship with the crate. Each call parses and
//! validates the embedded source, returning a fresh immutable value.

use crate::domain::{validate, DomainError, Persona};

/// UBI.eth: proof-of-personhood protocol persona
const UBIDOTETH: &str = include_str!("ubidoteth.json");

/// (preset name, JSON source)
const PRESETS: [(&str, &str); 1] = [("ubidoteth", UBIDOTETH)];

/// Preset used when nothing else is configured
pub const DEFAULT_PRESET: &str = "ubidoteth";

/// Names of all presets
pub fn names() -> Vec<&'static str> {
    PRESETS.iter().map(|(name, _)| *name).collect()
}

/// Raw JSON source of a preset
pub fn source(name: &str) -> Option<&'static str> {
    PRESETS
        .iter()
        .find(|(preset, _)| preset.eq_ignore_ascii_case(name.trim()))
        .map(|(_, source)| *source)
}

/// Load and validate a preset
pub fn get(name: &str) -> Result<Persona, DomainError> {
    let source = source(name).ok_or_else(|| DomainError::not_found("Preset", name))?;
    let candidate: serde_json::Value = serde_json::from_str(source)?;
    Ok(validate(&candidate)?)
}

/// The default persona
pub fn default_persona() -> Result<Persona, DomainError> {
    get(DEFAULT_PRESET)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{select_fragments, validate_report, Channel, Examples, ModelProviderHint};

    #[test]
    fn test_every_preset_validates_cleanly() {
        for name in names() {
            let candidate: serde_json::Value = serde_json::from_str(source(name).unwrap()).unwrap();
            let report = validate_report(&candidate)
                .unwrap_or_else(|errors| panic!("{name}: {errors:?}"));
            assert!(report.warnings.is_empty(), "{name}: {:?}", report.warnings);
        }
    }

    #[test]
    fn test_default_persona() {
        let persona = default_persona().unwrap();
        assert_eq!(persona.name(), "UBI.eth");
        assert_eq!(persona.username(), "ubieth");
        assert_eq!(persona.model_provider_hint(), ModelProviderHint::LlamaLocal);
        assert_eq!(persona.message_examples().len(), 10);
        assert_eq!(persona.style().all.len(), 14);
        assert!(persona.is_resolved());
        assert_eq!(persona.agent_id(), default_persona().unwrap().agent_id());
    }

    #[test]
    fn test_default_persona_chat_bundle() {
        let persona = default_persona().unwrap();
        let bundle = select_fragments(&persona, Channel::Chat, 2, 16);

        assert_eq!(bundle.style.len(), 16);
        assert_eq!(bundle.style[14], "provide exact figures");
        let Examples::Chat(dialogues) = bundle.examples else {
            panic!("Expected chat examples");
        };
        assert_eq!(
            dialogues[0].turns()[0].text(),
            "How exactly does your distribution work?"
        );
    }

    #[test]
    fn test_unknown_preset() {
        assert!(matches!(get("nobody"), Err(DomainError::NotFound { .. })));
        assert!(source("UBIDOTETH").is_some());
    }
}
