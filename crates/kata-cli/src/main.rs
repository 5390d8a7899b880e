//! Kata CLI - Persona validation, resolution and assembly
//!
//! Loads persona files from disk, checks them, resolves `extends` against a
//! local persona library and prints the fragments a runtime would prompt with.

mod config;
mod loader;
mod render;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use kata::{
    presets, resolve, select_fragments_with, validate_report, Channel, Persona, ResolutionError,
    ValidationWarning,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use loader::{Library, Origin};
use render::OutputFormat;

#[derive(Parser)]
#[command(name = "kata")]
#[command(about = "Kata CLI - Validate, resolve and assemble persona descriptors", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a persona and list every problem found
    Validate {
        /// Persona file (.json/.toml), library name, or preset (defaults to configured persona)
        target: Option<String>,
        /// Extra persona library directory
        #[arg(short = 'L', long = "library")]
        library: Vec<PathBuf>,
    },

    /// Resolve `extends` and print the resulting persona as JSON
    ///
    /// A library file that reuses a preset's name or username replaces the
    /// preset, so it cannot also extend it.
    Resolve {
        /// Persona file (.json/.toml), library name, or preset
        target: Option<String>,
        /// Extra persona library directory
        #[arg(short = 'L', long = "library")]
        library: Vec<PathBuf>,
    },

    /// Assemble the context bundle for a channel
    Assemble {
        /// Persona file (.json/.toml), library name, or preset
        target: Option<String>,
        /// Channel: chat, post
        #[arg(short, long, default_value = "chat")]
        channel: String,
        /// Maximum number of examples
        #[arg(short = 'e', long)]
        max_examples: Option<usize>,
        /// Maximum number of style directives
        #[arg(short = 's', long)]
        max_style: Option<usize>,
        /// Recent message, used to pick relevant topics (repeatable)
        #[arg(long)]
        history: Vec<String>,
        /// Output format: raw, json
        #[arg(short, long, default_value = "raw")]
        format: String,
        /// Extra persona library directory
        #[arg(short = 'L', long = "library")]
        library: Vec<PathBuf>,
    },

    /// Built-in personas
    Preset {
        #[command(subcommand)]
        action: PresetAction,
    },

    /// Manage persona library directories
    Library {
        #[command(subcommand)]
        action: LibraryAction,
    },

    /// Set the default persona
    Use {
        /// Persona file, library name, or preset
        name: String,
    },

    /// Show current configuration
    Config,
}

#[derive(Subcommand)]
enum PresetAction {
    /// List built-in personas
    List,
    /// Print a preset's source
    Show {
        /// Preset name (e.g., "ubidoteth")
        name: String,
    },
}

#[derive(Subcommand)]
enum LibraryAction {
    /// List personas found in the library
    List,
    /// Add a library directory
    Add {
        /// Directory containing persona files
        dir: PathBuf,
    },
    /// Remove a library directory
    Remove {
        /// Directory to remove
        dir: PathBuf,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { target, library } => cmd_validate(target, library),
        Commands::Resolve { target, library } => cmd_resolve(target, library),
        Commands::Assemble {
            target,
            channel,
            max_examples,
            max_style,
            history,
            format,
            library,
        } => cmd_assemble(target, channel, max_examples, max_style, history, format, library),
        Commands::Preset { action } => cmd_preset(action),
        Commands::Library { action } => cmd_library(action),
        Commands::Use { name } => cmd_use(name),
        Commands::Config => cmd_config(),
    }
}

/// Logs go to stderr so stdout stays clean for piping
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

// ============================================
// Command Implementations
// ============================================

fn cmd_validate(target: Option<String>, extra_dirs: Vec<PathBuf>) -> Result<()> {
    let config = Config::load()?;
    let target = target_or_default(target, &config);
    let path = Path::new(&target);

    if !path.is_file() {
        // Library entries and presets were validated when loaded
        let library = loader::load_library(&config.library_dirs_with(&extra_dirs))?;
        let (persona, origin) = find_persona(&target, &library)?;
        println!("{} {} ({}) is valid", "✓".green(), persona.name().cyan(), origin);
        return Ok(());
    }

    let candidate = loader::read_candidate(path)?;
    match validate_report(&candidate) {
        Ok(report) => {
            println!(
                "{} {} ({}) is valid",
                "✓".green(),
                report.persona.name().cyan(),
                path.display()
            );
            print_warnings(&report.warnings);
            if !report.persona.is_resolved() {
                println!(
                    "  {} {}",
                    "extends:".dimmed(),
                    report.persona.extends().join(", ")
                );
            }
            Ok(())
        }
        Err(errors) => {
            println!("{} {}", "✗".red(), path.display());
            for error in &errors {
                println!("  {} {}", error.path.yellow(), error.violation);
            }
            bail!("{} validation error(s)", errors.len());
        }
    }
}

fn cmd_resolve(target: Option<String>, extra_dirs: Vec<PathBuf>) -> Result<()> {
    let config = Config::load()?;
    let library = loader::load_library(&config.library_dirs_with(&extra_dirs))?;
    let persona = load_resolved(target_or_default(target, &config), &library)?;

    let mut value = serde_json::to_value(&persona).context("Failed to serialize persona")?;
    redact_secrets(&mut value);
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn cmd_assemble(
    target: Option<String>,
    channel: String,
    max_examples: Option<usize>,
    max_style: Option<usize>,
    history: Vec<String>,
    format: String,
    extra_dirs: Vec<PathBuf>,
) -> Result<()> {
    let channel: Channel = channel.parse().map_err(anyhow::Error::msg)?;
    let format: OutputFormat = format.parse().map_err(anyhow::Error::msg)?;

    let config = Config::load()?;
    let library = loader::load_library(&config.library_dirs_with(&extra_dirs))?;
    let persona = load_resolved(target_or_default(target, &config), &library)?;

    let mut options = config.assembly.options(channel);
    if let Some(max) = max_examples {
        options.max_examples = max;
    }
    if let Some(max) = max_style {
        options.max_style_directives = max;
    }

    let bundle = select_fragments_with(&persona, &options, history.as_slice());
    println!("{}", render::render_bundle(&bundle, format)?);
    Ok(())
}

fn cmd_preset(action: PresetAction) -> Result<()> {
    match action {
        PresetAction::List => {
            println!("{}", "Presets:".bold());
            for name in presets::names() {
                let persona = presets::get(name)?;
                println!(
                    "  {} {} ({})",
                    name.cyan(),
                    persona.name(),
                    persona.model_provider_hint().to_string().dimmed()
                );
            }
        }

        PresetAction::Show { name } => {
            let source = presets::source(&name)
                .with_context(|| format!("Preset '{}' not found", name))?;
            print!("{}", source);
        }
    }

    Ok(())
}

fn cmd_library(action: LibraryAction) -> Result<()> {
    let mut config = Config::load()?;

    match action {
        LibraryAction::List => {
            let library = loader::load_library(&config.library_dirs)?;

            println!("{}", "Personas:".bold());
            for name in library.registry.names() {
                let is_default = config.default_persona.as_deref() == Some(name);
                let default_marker = if is_default {
                    " (default)".green().to_string()
                } else {
                    String::new()
                };
                let origin = library
                    .origin(name)
                    .map(ToString::to_string)
                    .unwrap_or_default();

                println!("  {} {}{}", name.cyan(), origin.dimmed(), default_marker);
            }

            if config.library_dirs.is_empty() {
                println!("\n{}", "Add a library directory with:".dimmed());
                println!("  kata library add <DIR>");
            }
        }

        LibraryAction::Add { dir } => {
            let dir = dir
                .canonicalize()
                .with_context(|| format!("Directory {:?} not found", dir))?;
            if !dir.is_dir() {
                bail!("{:?} is not a directory", dir);
            }
            if config.add_library_dir(dir.clone()) {
                config.save()?;
                println!("{} Library directory {:?} added", "✓".green(), dir);
            } else {
                println!("Library directory {:?} already configured", dir);
            }
        }

        LibraryAction::Remove { dir } => {
            let canonical = dir.canonicalize().unwrap_or_else(|_| dir.clone());
            if config.remove_library_dir(&dir) || config.remove_library_dir(&canonical) {
                config.save()?;
                println!("{} Library directory {:?} removed", "✓".green(), dir);
            } else {
                bail!("Library directory {:?} not configured", dir);
            }
        }
    }

    Ok(())
}

fn cmd_use(name: String) -> Result<()> {
    let mut config = Config::load()?;

    let path = Path::new(&name);
    let stored = if path.is_file() {
        loader::load_file(path)?;
        path.canonicalize()
            .with_context(|| format!("Failed to resolve path {:?}", path))?
            .to_string_lossy()
            .into_owned()
    } else {
        let library = loader::load_library(&config.library_dirs)?;
        find_persona(&name, &library)?;
        name
    };

    config.set_default_persona(stored.clone());
    config.save()?;
    println!("{} Default persona set to '{}'", "✓".green(), stored);
    Ok(())
}

fn cmd_config() -> Result<()> {
    let config = Config::load()?;

    println!("{}", "Configuration:".bold());
    println!("  Path: {:?}", Config::config_path()?);
    println!(
        "  Default Persona: {}",
        config
            .default_persona
            .as_deref()
            .unwrap_or(presets::DEFAULT_PRESET)
            .cyan()
    );
    println!("  Library Directories: {}", config.library_dirs.len());
    for dir in &config.library_dirs {
        println!("    {}", dir.display());
    }
    let a = &config.assembly;
    println!(
        "  Assembly: examples={} style={} bio={} lore={} topics={} adjectives={}",
        a.max_examples, a.max_style_directives, a.max_bio, a.max_lore, a.max_topics, a.max_adjectives
    );

    Ok(())
}

// ============================================
// Helpers
// ============================================

fn target_or_default(target: Option<String>, config: &Config) -> String {
    target
        .or_else(|| config.default_persona.clone())
        .unwrap_or_else(|| presets::DEFAULT_PRESET.to_string())
}

/// Find a persona by library name/username or preset name
fn find_persona(name: &str, library: &Library) -> Result<(Persona, Origin)> {
    if let Some(persona) = library.registry.get(name) {
        let origin = library
            .origin(persona.name())
            .cloned()
            .unwrap_or_else(|| Origin::Preset(name.to_string()));
        return Ok((persona.clone(), origin));
    }
    if presets::source(name).is_some() {
        return Ok((presets::get(name)?, Origin::Preset(name.to_string())));
    }
    bail!(
        "Persona '{}' not found (not a file, library entry or preset)",
        name
    )
}

/// Load a persona from a file or the library and resolve its `extends`
fn load_resolved(target: String, library: &Library) -> Result<Persona> {
    let path = Path::new(&target);
    let persona = if path.is_file() {
        let report = loader::load_file(path)?;
        print_warnings(&report.warnings);
        report.persona
    } else {
        find_persona(&target, library)?.0
    };

    match resolve(&persona, &library.registry) {
        Ok(resolved) => Ok(resolved),
        Err(ResolutionError::CyclicExtends(path)) if path.len() == 2 => bail!(
            "Persona '{}' extends itself. A file reusing a preset's name or username \
             replaces that preset; give it its own name and username to extend the preset",
            path[0]
        ),
        Err(err) => {
            Err(err).with_context(|| format!("Failed to resolve persona '{}'", persona.name()))
        }
    }
}

/// Secret values never reach stdout; names are kept
fn redact_secrets(persona: &mut serde_json::Value) {
    if let Some(secrets) = persona
        .pointer_mut("/settings/secrets")
        .and_then(|secrets| secrets.as_object_mut())
    {
        for value in secrets.values_mut() {
            *value = serde_json::Value::from("<redacted>");
        }
    }
}

/// Warnings go to stderr
fn print_warnings(warnings: &[ValidationWarning]) {
    for warning in warnings {
        eprintln!(
            "  {} {} {}",
            "warning:".yellow(),
            warning.path.dimmed(),
            warning.message
        );
    }
}
