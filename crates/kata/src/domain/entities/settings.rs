//! Settings - Opaque runtime settings carried by a persona

use serde::Serialize;
use serde_json::{Map, Value};

/// Runtime settings
///
/// `secrets` and `voice` are recognized but never interpreted. Unrecognized
/// keys are kept in `extra` so they survive a validate/serialize round trip.
#[derive(Clone, Default, PartialEq, Serialize)]
pub struct Settings {
    /// Credential name -> value
    pub secrets: Map<String, Value>,
    /// Voice synthesis parameters
    pub voice: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Settings {
    /// True when nothing at all is configured
    pub fn is_unset(&self) -> bool {
        self.secrets.is_empty() && self.voice.is_empty() && self.extra.is_empty()
    }

    /// The recognized sub-map stored under `key`, if any
    pub(crate) fn recognized_mut(&mut self, key: &str) -> Option<&mut Map<String, Value>> {
        match key {
            "secrets" => Some(&mut self.secrets),
            "voice" => Some(&mut self.voice),
            _ => None,
        }
    }

    /// Names of the configured secrets
    pub fn secret_names(&self) -> impl Iterator<Item = &str> {
        self.secrets.keys().map(String::as_str)
    }
}

// Secret values must never end up in logs.
impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let secrets: Vec<(&str, &str)> = self.secret_names().map(|k| (k, "<redacted>")).collect();
        f.debug_struct("Settings")
            .field("secrets", &secrets)
            .field("voice", &self.voice)
            .field("extra", &self.extra)
            .finish()
    }
}
