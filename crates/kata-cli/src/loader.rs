//! Persona loading from disk
//!
//! Reads persona files (JSON or TOML) into loosely-typed candidates and
//! builds the registry used to resolve `extends`.

use anyhow::{bail, Context, Result};
use kata::{presets, validate_report, DomainError, Persona, PersonaRegistry, ValidationReport};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

const EXTENSIONS: [&str; 2] = ["json", "toml"];

/// Where a persona came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    File(PathBuf),
    Preset(String),
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Origin::File(path) => write!(f, "{}", path.display()),
            Origin::Preset(name) => write!(f, "preset:{}", name),
        }
    }
}

/// Personas available for lookup: presets overlaid by library files
#[derive(Debug, Default)]
pub struct Library {
    pub registry: PersonaRegistry,
    pub origins: HashMap<String, Origin>,
}

impl Library {
    fn add(&mut self, persona: Persona, origin: Origin) {
        self.origins.insert(persona.name().to_string(), origin);
        if let Some(replaced) = self.registry.insert(persona) {
            tracing::debug!(persona = %replaced.name(), "Library entry overrides earlier one");
        }
    }

    pub fn origin(&self, name: &str) -> Option<&Origin> {
        self.origins.get(name)
    }
}

/// Parse a persona file into a candidate value
pub fn read_candidate(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read persona file {:?}", path))?;

    match extension(path).as_deref() {
        Some("toml") => {
            toml::from_str(&content).with_context(|| format!("Failed to parse TOML {:?}", path))
        }
        Some("json") | None => serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON {:?}", path)),
        Some(other) => bail!("Unsupported persona file extension '{}': {:?}", other, path),
    }
}

/// Read and validate a persona file
pub fn load_file(path: &Path) -> Result<ValidationReport> {
    let candidate = read_candidate(path)?;
    validate_report(&candidate)
        .map_err(DomainError::from)
        .with_context(|| format!("Invalid persona {:?}", path))
}

/// Load presets, then every persona file in `dirs` (in order, later wins).
///
/// Invalid files are skipped with a warning so one broken file does not
/// hide the rest of the library.
pub fn load_library(dirs: &[PathBuf]) -> Result<Library> {
    let mut library = Library::default();

    for name in presets::names() {
        let persona = presets::get(name)?;
        library.add(persona, Origin::Preset(name.to_string()));
    }

    for dir in dirs {
        if !dir.is_dir() {
            tracing::warn!("Persona library directory {:?} does not exist", dir);
            continue;
        }
        for path in persona_files(dir)? {
            match load_file(&path) {
                Ok(report) => library.add(report.persona, Origin::File(path)),
                Err(e) => tracing::warn!("Skipping {:?}: {:#}", path, e),
            }
        }
    }

    tracing::debug!(personas = library.registry.len(), "Loaded persona library");
    Ok(library)
}

/// Persona files directly inside `dir`, sorted by path
fn persona_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to list directory {:?}", dir))?;
    for entry in entries {
        let path = entry?.path();
        let supported = extension(&path).is_some_and(|ext| EXTENSIONS.contains(&ext.as_str()));
        if path.is_file() && supported {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHILD_TOML: &str = r#"
name = "Child"
username = "child"
modelProvider = "anthropic"
system = ""
bio = []
lore = ["Raised by a protocol"]
messageExamples = []
postExamples = []
topics = ["Mathematical proofs"]
adjectives = ["curious"]
extends = ["UBI.eth"]

[style]
all = []
chat = []
post = []
"#;

    #[test]
    fn test_read_toml_candidate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("child.toml");
        fs::write(&path, CHILD_TOML).unwrap();

        let report = load_file(&path).unwrap();
        assert_eq!(report.persona.name(), "Child");
        assert_eq!(report.persona.extends(), ["UBI.eth"]);
    }

    #[test]
    fn test_invalid_file_reports_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, r#"{ "name": "Broken" }"#).unwrap();

        let err = load_file(&path).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("username: required field is missing"), "{message}");
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("persona.yaml");
        fs::write(&path, "name: nope").unwrap();
        assert!(read_candidate(&path).is_err());
    }

    #[test]
    fn test_library_contains_presets_and_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("child.toml"), CHILD_TOML).unwrap();
        fs::write(dir.path().join("broken.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let library = load_library(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(library.registry.names(), ["Child", "UBI.eth"]);
        assert_eq!(
            library.origin("UBI.eth"),
            Some(&Origin::Preset("ubidoteth".to_string()))
        );
        assert!(matches!(library.origin("Child"), Some(Origin::File(_))));

        let child = library.registry.get("child").unwrap();
        let resolved = kata::resolve(child, &library.registry).unwrap();
        assert!(resolved.system().starts_with("Roleplay as UBI.eth"));
        assert_eq!(resolved.lore(), ["Raised by a protocol"]);
    }
}
