//! Style - Imperative directives per output channel

use serde::Serialize;

use crate::domain::value_objects::Channel;

/// The exact key set a style mapping must have
pub const STYLE_KEYS: [&str; 3] = ["all", "chat", "post"];

/// Style directives
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StyleGuide {
    /// Applies to every channel
    pub all: Vec<String>,
    /// Conversational replies only
    pub chat: Vec<String>,
    /// Standalone posts only
    pub post: Vec<String>,
}

impl StyleGuide {
    /// Channel-specific directives (without `all`)
    pub fn for_channel(&self, channel: Channel) -> &[String] {
        match channel {
            Channel::Chat => &self.chat,
            Channel::Post => &self.post,
        }
    }

    /// `all` followed by the channel-specific directives
    pub fn directives(&self, channel: Channel) -> impl Iterator<Item = &String> {
        self.all.iter().chain(self.for_channel(channel))
    }

    pub fn is_unset(&self) -> bool {
        self.all.is_empty() && self.chat.is_empty() && self.post.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directives_put_all_first() {
        let style = StyleGuide {
            all: vec!["a1".into()],
            chat: vec!["c1".into()],
            post: vec!["p1".into(), "p2".into()],
        };
        let chat: Vec<&String> = style.directives(Channel::Chat).collect();
        assert_eq!(chat, ["a1", "c1"]);
        let post: Vec<&String> = style.directives(Channel::Post).collect();
        assert_eq!(post, ["a1", "p1", "p2"]);
    }
}
