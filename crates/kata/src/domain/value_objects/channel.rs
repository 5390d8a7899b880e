//! Channel - Output mode a context bundle is assembled for

use serde::{Deserialize, Serialize};

/// Output channel
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Conversational reply to a message
    #[default]
    Chat,
    /// Standalone, unsolicited post
    Post,
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::Chat => write!(f, "chat"),
            Channel::Post => write!(f, "post"),
        }
    }
}

impl std::str::FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chat" => Ok(Channel::Chat),
            "post" => Ok(Channel::Post),
            _ => Err(format!("Unknown channel: {}. Valid: chat, post", s)),
        }
    }
}
