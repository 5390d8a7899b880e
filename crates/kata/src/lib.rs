//! Kata Domain Library
//!
//! Persona descriptors (型, "form") for conversational agents: the schema,
//! its validation, `extends` inheritance, and the selection of persona
//! fragments an external runtime turns into prompts.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core domain models (Persona, ExampleDialogue, StyleGuide, ContextBundle)
//!   - `value_objects/`: Immutable value types (Channel, ModelProviderHint)
//!   - `services/`: Validator, resolver and assembler
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `PersonaLookup`: how the resolver finds parents
//!
//! - **Presets** (`presets/`): Personas embedded in the crate
//!
//! # Usage
//!
//! ```rust,ignore
//! use kata::{resolve, select_fragments, validate, Channel, PersonaRegistry};
//!
//! let persona = validate(&candidate)?;
//! let persona = resolve(&persona, &registry)?;
//! let bundle = select_fragments(&persona, Channel::Chat, 3, 10);
//! ```

pub mod domain;
pub mod ports;
pub mod presets;

// Re-export commonly used types
pub use domain::{
    resolve, select_fragments, select_fragments_with, validate, validate_report,
    AssemblyOptions, Channel, ContextBundle, DomainError, ExampleDialogue, Examples,
    ModelProviderHint, Persona, ResolutionError, Settings, StyleGuide, Turn, TurnContent,
    ValidationError, ValidationReport, ValidationWarning, Violation,
};
pub use ports::{PersonaLookup, PersonaRegistry};
