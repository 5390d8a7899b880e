//! Persona - Identity, voice and behavioral guidance of one agent
//!
//! Pure domain entity without infrastructure dependencies.
//! A `Persona` only exists after validation (see `domain::services::validator`),
//! and is never changed afterwards: inheritance produces a new value.

use serde::Serialize;
use uuid::Uuid;

use super::{ExampleDialogue, Settings, StyleGuide};
use crate::domain::value_objects::ModelProviderHint;

/// Persona - Validated agent descriptor
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    pub(crate) name: String,
    pub(crate) username: String,
    #[serde(rename = "modelProvider")]
    pub(crate) model_provider_hint: ModelProviderHint,
    pub(crate) settings: Settings,
    pub(crate) plugins: Vec<String>,
    pub(crate) system: String,
    pub(crate) bio: Vec<String>,
    pub(crate) lore: Vec<String>,
    pub(crate) message_examples: Vec<ExampleDialogue>,
    pub(crate) post_examples: Vec<String>,
    pub(crate) topics: Vec<String>,
    pub(crate) style: StyleGuide,
    pub(crate) adjectives: Vec<String>,
    pub(crate) extends: Vec<String>,
}

impl Persona {
    /// Human-facing display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Handle-facing identifier
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn model_provider_hint(&self) -> ModelProviderHint {
        self.model_provider_hint
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn plugins(&self) -> &[String] {
        &self.plugins
    }

    /// Top-level behavioral directive
    pub fn system(&self) -> &str {
        &self.system
    }

    pub fn bio(&self) -> &[String] {
        &self.bio
    }

    pub fn lore(&self) -> &[String] {
        &self.lore
    }

    pub fn message_examples(&self) -> &[ExampleDialogue] {
        &self.message_examples
    }

    pub fn post_examples(&self) -> &[String] {
        &self.post_examples
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    pub fn style(&self) -> &StyleGuide {
        &self.style
    }

    pub fn adjectives(&self) -> &[String] {
        &self.adjectives
    }

    /// References to parent personas, in increasing precedence
    pub fn extends(&self) -> &[String] {
        &self.extends
    }

    /// Whether `extends` has been resolved (or was never used)
    pub fn is_resolved(&self) -> bool {
        self.extends.is_empty()
    }

    /// Whether `reference` names this persona (by name or username)
    pub fn answers_to(&self, reference: &str) -> bool {
        let reference = reference.trim();
        self.name == reference || self.username == reference
    }

    /// Stable agent identifier derived from the name
    pub fn agent_id(&self) -> Uuid {
        Uuid::new_v5(&Uuid::NAMESPACE_OID, self.name.as_bytes())
    }

    /// Adopt every field this persona leaves unset from `parent`.
    ///
    /// Identity fields (`name`, `username`, `modelProvider`) and `extends`
    /// are never inherited.
    pub(crate) fn inherit_unset_from(&mut self, parent: &Persona) {
        if self.settings.is_unset() && !parent.settings.is_unset() {
            self.settings = parent.settings.clone();
        }
        if self.system.trim().is_empty() && !parent.system.trim().is_empty() {
            self.system = parent.system.clone();
        }
        if self.style.is_unset() && !parent.style.is_unset() {
            self.style = parent.style.clone();
        }
        inherit_list(&mut self.plugins, &parent.plugins);
        inherit_list(&mut self.bio, &parent.bio);
        inherit_list(&mut self.lore, &parent.lore);
        inherit_list(&mut self.message_examples, &parent.message_examples);
        inherit_list(&mut self.post_examples, &parent.post_examples);
        inherit_list(&mut self.topics, &parent.topics);
        inherit_list(&mut self.adjectives, &parent.adjectives);
    }

    /// Consume the parents list once everything has been merged in
    pub(crate) fn into_resolved(mut self) -> Self {
        self.extends.clear();
        self
    }
}

fn inherit_list<T: Clone>(child: &mut Vec<T>, parent: &[T]) {
    if child.is_empty() && !parent.is_empty() {
        *child = parent.to_vec();
    }
}
