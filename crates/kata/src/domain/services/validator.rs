//! Persona Validator
//!
//! Turns a loosely-typed candidate (parsed JSON, TOML, an embedded literal)
//! into a `Persona`. Each field stops at its first problem, but every field is
//! checked, so a caller sees the complete error set in one pass.

use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};

use crate::domain::entities::{
    ExampleDialogue, Persona, Settings, StyleGuide, Turn, TurnContent, STYLE_KEYS,
};
use crate::domain::errors::{ValidationError, ValidationWarning, Violation};
use crate::domain::value_objects::ModelProviderHint;

/// Fields every candidate must carry
pub const REQUIRED_FIELDS: [&str; 11] = [
    "name",
    "username",
    "modelProvider",
    "system",
    "bio",
    "lore",
    "messageExamples",
    "postExamples",
    "topics",
    "style",
    "adjectives",
];

/// Fields that default to empty when absent
pub const OPTIONAL_FIELDS: [&str; 3] = ["settings", "plugins", "extends"];

/// (alias, canonical) spellings accepted on input
const FIELD_ALIASES: [(&str, &str); 1] = [("modelProviderHint", "modelProvider")];

/// Successful validation outcome
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub persona: Persona,
    pub warnings: Vec<ValidationWarning>,
}

/// Validate a candidate, logging any warnings.
pub fn validate(candidate: &Value) -> Result<Persona, Vec<ValidationError>> {
    let report = validate_report(candidate)?;
    for warning in &report.warnings {
        tracing::warn!(
            persona = %report.persona.name(),
            path = %warning.path,
            "{}",
            warning.message
        );
    }
    Ok(report.persona)
}

/// Validate a candidate and hand warnings back to the caller.
pub fn validate_report(candidate: &Value) -> Result<ValidationReport, Vec<ValidationError>> {
    let Some(object) = candidate.as_object() else {
        return Err(vec![ValidationError::wrong_type("$", "mapping")]);
    };
    let mut checker = Checker::new(object);

    let name = checker.text("name");
    let username = checker.text("username");
    let model_provider_hint = checker.provider();
    let settings = checker.settings();
    let plugins = checker.text_list("plugins", Presence::Optional);
    let extends = checker.text_list("extends", Presence::Optional);
    let inherits = extends.as_ref().is_some_and(|parents| !parents.is_empty());
    let system = checker.system(inherits);
    let bio = checker.text_list("bio", Presence::Required);
    let lore = checker.text_list("lore", Presence::Required);
    let message_examples = checker.message_examples();
    let post_examples = checker.text_list("postExamples", Presence::Required);
    let topics = checker.unique_list("topics");
    let style = checker.style();
    let adjectives = checker.unique_list("adjectives");
    checker.unknown_fields();

    let Checker {
        errors,
        mut warnings,
        ..
    } = checker;

    // Every `None` above pushed at least one error.
    let (
        Some(name),
        Some(username),
        Some(model_provider_hint),
        Some(settings),
        Some(plugins),
        Some(extends),
        Some(system),
        Some(bio),
        Some(lore),
        Some(message_examples),
        Some(post_examples),
        Some(topics),
        Some(style),
        Some(adjectives),
    ) = (
        name,
        username,
        model_provider_hint,
        settings,
        plugins,
        extends,
        system,
        bio,
        lore,
        message_examples,
        post_examples,
        topics,
        style,
        adjectives,
    )
    else {
        return Err(errors);
    };

    for (i, dialogue) in message_examples.iter().enumerate() {
        if !dialogue.has_turn_by(&name) {
            warnings.push(ValidationWarning::new(
                format!("messageExamples[{i}]"),
                format!("no turn is attributed to '{name}'"),
            ));
        }
    }

    Ok(ValidationReport {
        persona: Persona {
            name,
            username,
            model_provider_hint,
            settings,
            plugins,
            system,
            bio,
            lore,
            message_examples,
            post_examples,
            topics,
            style,
            adjectives,
            extends,
        },
        warnings,
    })
}

impl TryFrom<&Value> for Persona {
    type Error = Vec<ValidationError>;

    fn try_from(candidate: &Value) -> Result<Self, Self::Error> {
        validate(candidate)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Presence {
    Required,
    Optional,
}

struct Checker<'a> {
    object: &'a Map<String, Value>,
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationWarning>,
}

impl<'a> Checker<'a> {
    fn new(object: &'a Map<String, Value>) -> Self {
        Self {
            object,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn fail<T>(&mut self, error: ValidationError) -> Option<T> {
        self.errors.push(error);
        None
    }

    fn lookup(&self, key: &str) -> Option<&'a Value> {
        let object = self.object;
        object.get(key).or_else(|| {
            FIELD_ALIASES
                .iter()
                .filter(|(_, canonical)| *canonical == key)
                .find_map(|(alias, _)| object.get(*alias))
        })
    }

    /// Look a field up, recording `Missing` when a required one is absent.
    fn field(&mut self, key: &str, presence: Presence) -> Option<&'a Value> {
        let value = self.lookup(key);
        if value.is_none() && presence == Presence::Required {
            self.errors.push(ValidationError::missing(key));
        }
        value
    }

    fn text(&mut self, key: &str) -> Option<String> {
        let value = self.field(key, Presence::Required)?;
        self.text_at(key.to_string(), value)
    }

    fn text_at(&mut self, path: String, value: &Value) -> Option<String> {
        match value.as_str() {
            None => self.fail(ValidationError::wrong_type(path, "string")),
            Some(s) if s.trim().is_empty() => self.fail(ValidationError::empty(path)),
            Some(s) => Some(s.to_string()),
        }
    }

    fn text_list(&mut self, key: &str, presence: Presence) -> Option<Vec<String>> {
        match self.field(key, presence) {
            Some(value) => self.text_list_at(key.to_string(), value),
            None if presence == Presence::Optional => Some(Vec::new()),
            None => None,
        }
    }

    fn text_list_at(&mut self, path: String, value: &Value) -> Option<Vec<String>> {
        let Some(items) = value.as_array() else {
            return self.fail(ValidationError::wrong_type(path, "sequence of strings"));
        };
        let mut texts = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            texts.push(self.text_at(format!("{path}[{i}]"), item)?);
        }
        Some(texts)
    }

    /// Exact duplicates are errors; duplicates ignoring case are warnings.
    fn unique_list(&mut self, key: &str) -> Option<Vec<String>> {
        let items = self.text_list(key, Presence::Required)?;
        let mut exact = HashSet::with_capacity(items.len());
        let mut folded: HashMap<String, usize> = HashMap::with_capacity(items.len());

        for (i, item) in items.iter().enumerate() {
            if !exact.insert(item.as_str()) {
                return self.fail(ValidationError::new(
                    format!("{key}[{i}]"),
                    Violation::Duplicate(item.clone()),
                ));
            }
            match folded.get(&item.trim().to_lowercase()) {
                Some(&first) => self.warnings.push(ValidationWarning::new(
                    format!("{key}[{i}]"),
                    format!("'{}' duplicates '{}' ignoring case", item, items[first]),
                )),
                None => {
                    folded.insert(item.trim().to_lowercase(), i);
                }
            }
        }
        Some(items)
    }

    fn provider(&mut self) -> Option<ModelProviderHint> {
        let value = self.field("modelProvider", Presence::Required)?;
        let Some(raw) = value.as_str() else {
            return self.fail(ValidationError::wrong_type("modelProvider", "string"));
        };
        match raw.parse() {
            Ok(provider) => Some(provider),
            Err(_) => self.fail(ValidationError::new(
                "modelProvider",
                Violation::UnknownProvider(raw.to_string()),
            )),
        }
    }

    /// A blank `system` is accepted only when a parent can supply it.
    fn system(&mut self, inherits: bool) -> Option<String> {
        let value = self.field("system", Presence::Required)?;
        match value.as_str() {
            None => self.fail(ValidationError::wrong_type("system", "string")),
            Some(s) if s.trim().is_empty() && !inherits => {
                self.fail(ValidationError::empty("system"))
            }
            Some(s) => Some(s.to_string()),
        }
    }

    fn settings(&mut self) -> Option<Settings> {
        let Some(value) = self.field("settings", Presence::Optional) else {
            return Some(Settings::default());
        };
        let Some(map) = value.as_object() else {
            return self.fail(ValidationError::wrong_type("settings", "mapping"));
        };

        let mut settings = Settings::default();
        for (key, value) in map {
            let Some(slot) = settings.recognized_mut(key) else {
                settings.extra.insert(key.clone(), value.clone());
                continue;
            };
            match value.as_object() {
                Some(inner) => *slot = inner.clone(),
                None => {
                    return self.fail(ValidationError::wrong_type(
                        format!("settings.{key}"),
                        "mapping",
                    ))
                }
            }
        }
        Some(settings)
    }

    fn style(&mut self) -> Option<StyleGuide> {
        let value = self.field("style", Presence::Required)?;
        let Some(map) = value.as_object() else {
            return self.fail(ValidationError::wrong_type(
                "style",
                "mapping with keys all, chat, post",
            ));
        };

        let unexpected: Vec<String> = map
            .keys()
            .filter(|key| !STYLE_KEYS.contains(&key.as_str()))
            .cloned()
            .collect();
        if !unexpected.is_empty() {
            return self.fail(ValidationError::new(
                "style",
                Violation::UnexpectedKeys(unexpected),
            ));
        }

        let all = self.style_key(map, "all");
        let chat = self.style_key(map, "chat");
        let post = self.style_key(map, "post");
        Some(StyleGuide {
            all: all?,
            chat: chat?,
            post: post?,
        })
    }

    fn style_key(&mut self, map: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
        let path = format!("style.{key}");
        match map.get(key) {
            Some(value) => self.text_list_at(path, value),
            None => self.fail(ValidationError::missing(path)),
        }
    }

    /// Broken dialogues are reported individually.
    fn message_examples(&mut self) -> Option<Vec<ExampleDialogue>> {
        let value = self.field("messageExamples", Presence::Required)?;
        let Some(items) = value.as_array() else {
            return self.fail(ValidationError::wrong_type(
                "messageExamples",
                "sequence of dialogues",
            ));
        };

        let mut dialogues = Vec::with_capacity(items.len());
        let mut intact = true;
        for (i, item) in items.iter().enumerate() {
            match self.dialogue(format!("messageExamples[{i}]"), item) {
                Some(dialogue) => dialogues.push(dialogue),
                None => intact = false,
            }
        }
        intact.then_some(dialogues)
    }

    fn dialogue(&mut self, path: String, value: &Value) -> Option<ExampleDialogue> {
        let Some(items) = value.as_array() else {
            return self.fail(ValidationError::wrong_type(path, "sequence of turns"));
        };
        if items.is_empty() {
            return self.fail(ValidationError::empty(path));
        }
        let mut turns = Vec::with_capacity(items.len());
        for (j, item) in items.iter().enumerate() {
            turns.push(self.turn(format!("{path}[{j}]"), item)?);
        }
        Some(ExampleDialogue::new(turns))
    }

    fn turn(&mut self, path: String, value: &Value) -> Option<Turn> {
        let Some(object) = value.as_object() else {
            return self.fail(ValidationError::wrong_type(
                path,
                "mapping with speaker and content",
            ));
        };

        let speaker_path = format!("{path}.speaker");
        let speaker = match object.get("speaker").or_else(|| object.get("user")) {
            Some(value) => self.text_at(speaker_path, value)?,
            None => return self.fail(ValidationError::missing(speaker_path)),
        };

        let content_path = format!("{path}.content");
        let Some(content) = object.get("content") else {
            return self.fail(ValidationError::missing(content_path));
        };
        let Some(content) = content.as_object() else {
            return self.fail(ValidationError::wrong_type(content_path, "mapping"));
        };

        let text_path = format!("{content_path}.text");
        let text = match content.get("text") {
            Some(value) => self.text_at(text_path, value)?,
            None => return self.fail(ValidationError::missing(text_path)),
        };
        let extra = content
            .iter()
            .filter(|(key, _)| key.as_str() != "text")
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Some(Turn {
            speaker,
            content: TurnContent { text, extra },
        })
    }

    fn unknown_fields(&mut self) {
        for key in self.object.keys() {
            let key = key.as_str();
            let known = REQUIRED_FIELDS.contains(&key)
                || OPTIONAL_FIELDS.contains(&key)
                || FIELD_ALIASES.iter().any(|(alias, _)| *alias == key);
            if !known {
                self.warnings
                    .push(ValidationWarning::new(key, "unrecognized field is ignored"));
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn candidate() -> Value {
        json!({
            "name": "UBI.eth",
            "username": "ubieth",
            "modelProvider": "llama_local",
            "settings": {
                "secrets": {},
                "voice": { "model": "en_US-hfc_female-medium" }
            },
            "system": "Roleplay as UBI.eth, a minimalist proof-of-personhood protocol.",
            "bio": [
                "Distributes 1 UBI token per hour to each verified human",
                "Built on zero-knowledge proofs and demurrage curves"
            ],
            "lore": ["Born from the identity paradox in digital systems"],
            "messageExamples": [
                [
                    { "user": "{{user1}}", "content": { "text": "How does distribution work?" } },
                    { "user": "UBI.eth", "content": { "text": "1/3600 tokens every second." } }
                ]
            ],
            "postExamples": ["My demurrage starts at 0.1% monthly"],
            "topics": ["Progressive demurrage curves", "Quadratic governance systems"],
            "style": {
                "all": ["share specific numbers"],
                "chat": ["invite questions"],
                "post": ["announce specific features"]
            },
            "adjectives": ["mathematically-proven", "privacy-preserving"],
            "extends": []
        })
    }

    fn without(fields: &[&str]) -> Value {
        let mut value = candidate();
        let object = value.as_object_mut().unwrap();
        for field in fields {
            object.remove(*field);
        }
        value
    }

    fn paths(errors: &[ValidationError]) -> Vec<&str> {
        errors.iter().map(|e| e.path.as_str()).collect()
    }

    #[test]
    fn test_valid_candidate_passes_without_warnings() {
        let report = validate_report(&candidate()).unwrap();
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);

        let persona = report.persona;
        assert_eq!(persona.name(), "UBI.eth");
        assert_eq!(persona.username(), "ubieth");
        assert_eq!(persona.model_provider_hint(), ModelProviderHint::LlamaLocal);
        assert_eq!(persona.message_examples()[0].turns()[1].speaker, "UBI.eth");
        assert!(persona.is_resolved());
    }

    #[test]
    fn test_validated_persona_validates_again() {
        let persona = validate(&candidate()).unwrap();
        let serialized = serde_json::to_value(&persona).unwrap();
        assert_eq!(validate(&serialized).unwrap(), persona);
    }

    #[test]
    fn test_missing_field_is_named_exactly() {
        for field in REQUIRED_FIELDS {
            let errors = validate(&without(&[field])).unwrap_err();
            assert_eq!(paths(&errors), [field], "removing {field}");
            assert_eq!(errors[0].violation, Violation::Missing);
        }
    }

    #[test]
    fn test_removing_n_fields_yields_n_errors() {
        let errors = validate(&without(&["bio", "style", "username"])).unwrap_err();
        assert!(errors.len() >= 3);
        for field in ["bio", "style", "username"] {
            assert!(paths(&errors).contains(&field));
        }
    }

    #[test]
    fn test_optional_fields_default_to_empty() {
        let persona = validate(&without(&["settings", "plugins", "extends"])).unwrap();
        assert!(persona.settings().is_unset());
        assert!(persona.plugins().is_empty());
        assert!(persona.extends().is_empty());
    }

    #[test]
    fn test_style_with_fourth_key_names_style() {
        let mut value = candidate();
        value["style"]["debug"] = json!(["log everything"]);
        let errors = validate(&value).unwrap_err();
        assert_eq!(paths(&errors), ["style"]);
        assert_eq!(
            errors[0].violation,
            Violation::UnexpectedKeys(vec!["debug".to_string()])
        );
    }

    #[test]
    fn test_style_missing_key_names_sub_path() {
        let mut value = candidate();
        value["style"].as_object_mut().unwrap().remove("post");
        value["style"]["chat"] = json!([]);
        let errors = validate(&value).unwrap_err();
        assert_eq!(paths(&errors), ["style.post"]);
    }

    #[test]
    fn test_blank_sequence_entry() {
        let mut value = candidate();
        value["bio"] = json!(["fine", "   "]);
        let errors = validate(&value).unwrap_err();
        assert_eq!(errors, [ValidationError::empty("bio[1]")]);
    }

    #[test]
    fn test_wrong_types_are_reported() {
        let mut value = candidate();
        value["lore"] = json!("not a list");
        value["name"] = json!(42);
        let errors = validate(&value).unwrap_err();
        assert_eq!(
            errors,
            [
                ValidationError::wrong_type("name", "string"),
                ValidationError::wrong_type("lore", "sequence of strings"),
            ]
        );
    }

    #[test]
    fn test_turn_without_text() {
        let mut value = candidate();
        value["messageExamples"][0][1]["content"] = json!({ "action": "CONTINUE" });
        let errors = validate(&value).unwrap_err();
        assert_eq!(
            paths(&errors),
            ["messageExamples[0][1].content.text"]
        );
    }

    #[test]
    fn test_each_broken_dialogue_is_reported() {
        let mut value = candidate();
        value["messageExamples"] = json!([
            [{ "speaker": "{{user1}}" }],
            [],
            [{ "speaker": "UBI.eth", "content": { "text": "ok" } }]
        ]);
        let errors = validate(&value).unwrap_err();
        assert_eq!(
            paths(&errors),
            ["messageExamples[0][0].content", "messageExamples[1]"]
        );
    }

    #[test]
    fn test_turn_without_speaker() {
        let mut value = candidate();
        value["messageExamples"][0][1] = json!({ "content": { "text": "Anyone there?" } });
        let errors = validate(&value).unwrap_err();
        assert_eq!(
            errors,
            [ValidationError::missing("messageExamples[0][1].speaker")]
        );
    }

    #[test]
    fn test_blank_user_key_is_an_empty_speaker() {
        let mut value = candidate();
        value["messageExamples"][0][0] = json!({ "user": "  ", "content": { "text": "hi" } });
        let errors = validate(&value).unwrap_err();
        assert_eq!(
            errors,
            [ValidationError::empty("messageExamples[0][0].speaker")]
        );
    }

    #[test]
    fn test_speaker_and_content_fields_kept() {
        let mut value = candidate();
        value["messageExamples"][0][1] =
            json!({ "speaker": "UBI.eth", "content": { "text": "Sure.", "action": "NONE" } });
        let persona = validate(&value).unwrap();
        let turn = &persona.message_examples()[0].turns()[1];
        assert_eq!(turn.speaker, "UBI.eth");
        assert_eq!(turn.content.extra.get("action"), Some(&json!("NONE")));
    }

    #[test]
    fn test_blank_system_needs_a_parent() {
        let mut value = candidate();
        value["system"] = json!("");
        assert_eq!(
            validate(&value).unwrap_err(),
            [ValidationError::empty("system")]
        );

        value["extends"] = json!(["base"]);
        let persona = validate(&value).unwrap();
        assert_eq!(persona.system(), "");
    }

    #[test]
    fn test_duplicates() {
        let mut value = candidate();
        value["topics"] = json!(["Mathematical proofs", "Mathematical proofs"]);
        value["adjectives"] = json!(["self-adjusting", "Self-Adjusting"]);

        let errors = validate(&value).unwrap_err();
        assert_eq!(
            errors,
            [ValidationError::new(
                "topics[1]",
                Violation::Duplicate("Mathematical proofs".to_string())
            )]
        );

        value["topics"] = json!(["Mathematical proofs"]);
        let report = validate_report(&value).unwrap();
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].path, "adjectives[1]");
    }

    #[test]
    fn test_provider() {
        let mut value = candidate();
        value["modelProvider"] = json!("skynet");
        assert_eq!(
            validate(&value).unwrap_err(),
            [ValidationError::new(
                "modelProvider",
                Violation::UnknownProvider("skynet".to_string())
            )]
        );

        let mut value = without(&["modelProvider"]);
        value["modelProviderHint"] = json!("anthropic");
        let report = validate_report(&value).unwrap();
        assert_eq!(
            report.persona.model_provider_hint(),
            ModelProviderHint::Anthropic
        );
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_settings_sub_keys() {
        let mut value = candidate();
        value["settings"] = json!({ "secrets": "oops", "model": "x" });
        assert_eq!(
            paths(&validate(&value).unwrap_err()),
            ["settings.secrets"]
        );

        value["settings"] = json!({ "secrets": { "KEY": "v" }, "model": "x" });
        let persona = validate(&value).unwrap();
        assert_eq!(persona.settings().secret_names().collect::<Vec<_>>(), ["KEY"]);
        assert_eq!(persona.settings().extra.get("model"), Some(&json!("x")));
    }

    #[test]
    fn test_warnings() {
        let mut value = candidate();
        value["clients"] = json!(["twitter"]);
        value["messageExamples"] = json!([[
            { "user": "{{user1}}", "content": { "text": "hello?" } }
        ]]);
        let report = validate_report(&value).unwrap();
        let paths: Vec<&str> = report.warnings.iter().map(|w| w.path.as_str()).collect();
        assert_eq!(paths, ["clients", "messageExamples[0]"]);
    }

    #[test]
    fn test_non_mapping_candidate() {
        let errors = validate(&json!(["not", "a", "persona"])).unwrap_err();
        assert_eq!(errors, [ValidationError::wrong_type("$", "mapping")]);
    }

    #[test]
    fn test_try_from() {
        let persona = Persona::try_from(&candidate()).unwrap();
        assert_eq!(persona.name(), "UBI.eth");
    }
}
