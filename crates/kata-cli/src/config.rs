//! Configuration management for Kata CLI
//!
//! Stores persona library directories, the default persona and assembly
//! limits in ~/.config/kata/config.toml

use anyhow::{Context, Result};
use kata::{AssemblyOptions, Channel};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = "kata";
const CONFIG_FILE: &str = "config.toml";

/// Default limits for `kata assemble`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyDefaults {
    pub max_examples: usize,
    pub max_style_directives: usize,
    pub max_bio: usize,
    pub max_lore: usize,
    pub max_topics: usize,
    pub max_adjectives: usize,
}

impl Default for AssemblyDefaults {
    fn default() -> Self {
        let options = AssemblyOptions::default();
        Self {
            max_examples: options.max_examples,
            max_style_directives: options.max_style_directives,
            max_bio: options.max_bio,
            max_lore: options.max_lore,
            max_topics: options.max_topics,
            max_adjectives: options.max_adjectives,
        }
    }
}

impl AssemblyDefaults {
    pub fn options(&self, channel: Channel) -> AssemblyOptions {
        AssemblyOptions {
            channel,
            max_examples: self.max_examples,
            max_style_directives: self.max_style_directives,
            max_bio: self.max_bio,
            max_lore: self.max_lore,
            max_topics: self.max_topics,
            max_adjectives: self.max_adjectives,
        }
    }
}

/// CLI Configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directories scanned for persona files
    #[serde(default)]
    pub library_dirs: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_persona: Option<String>,
    #[serde(default)]
    pub assembly: AssemblyDefaults,
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join(CONFIG_DIR);
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Load config from the default location, or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load config from `path`, or create default
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        let config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse config file")?;

        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save config to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory {:?}", dir))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }

    /// Add a library directory; false if already present
    pub fn add_library_dir(&mut self, dir: PathBuf) -> bool {
        if self.library_dirs.contains(&dir) {
            return false;
        }
        self.library_dirs.push(dir);
        true
    }

    /// Remove a library directory
    pub fn remove_library_dir(&mut self, dir: &Path) -> bool {
        let before = self.library_dirs.len();
        self.library_dirs.retain(|d| d != dir);
        self.library_dirs.len() != before
    }

    /// Set default persona
    pub fn set_default_persona(&mut self, name: String) {
        self.default_persona = Some(name);
    }

    /// Library directories from config followed by extra ones from flags
    pub fn library_dirs_with(&self, extra: &[PathBuf]) -> Vec<PathBuf> {
        let mut dirs = self.library_dirs.clone();
        for dir in extra {
            if !dirs.contains(dir) {
                dirs.push(dir.clone());
            }
        }
        dirs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.assembly.max_examples, 5);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        assert!(config.add_library_dir(PathBuf::from("/srv/personas")));
        assert!(!config.add_library_dir(PathBuf::from("/srv/personas")));
        config.set_default_persona("UBI.eth".to_string());
        config.assembly.max_examples = 2;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_assembly_table() {
        let config: Config = toml::from_str("[assembly]\nmax_style_directives = 4\n").unwrap();
        assert_eq!(config.assembly.max_style_directives, 4);
        assert_eq!(config.assembly.max_bio, AssemblyDefaults::default().max_bio);

        let options = config.assembly.options(Channel::Post);
        assert_eq!(options.channel, Channel::Post);
        assert_eq!(options.max_style_directives, 4);
    }

    #[test]
    fn test_library_dirs() {
        let mut config = Config::default();
        config.add_library_dir(PathBuf::from("a"));
        let dirs = config.library_dirs_with(&[PathBuf::from("a"), PathBuf::from("b")]);
        assert_eq!(dirs, [PathBuf::from("a"), PathBuf::from("b")]);

        assert!(config.remove_library_dir(Path::new("a")));
        assert!(!config.remove_library_dir(Path::new("a")));
    }
}
