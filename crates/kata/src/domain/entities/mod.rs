//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - Persona: Validated agent descriptor
//! - ExampleDialogue / Turn: Example conversations
//! - StyleGuide: Per-channel style directives
//! - Settings: Opaque runtime settings
//! - ContextBundle: Fragments assembled for one channel

mod context_bundle;
mod dialogue;
mod persona;
mod settings;
mod style;

pub use context_bundle::*;
pub use dialogue::*;
pub use persona::*;
pub use settings::*;
pub use style::*;
