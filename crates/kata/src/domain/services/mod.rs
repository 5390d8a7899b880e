//! Domain Services
//!
//! Pure functions over persona values. None of them perform I/O or keep
//! state, so they can be called concurrently on the same persona.
//! - validator: candidate -> `Persona`
//! - resolver: `extends` inheritance
//! - assembler: `Persona` -> `ContextBundle`

pub mod assembler;
pub mod resolver;
pub mod validator;

pub use assembler::{select_fragments, select_fragments_with, AssemblyOptions};
pub use resolver::resolve;
pub use validator::{validate, validate_report, ValidationReport, OPTIONAL_FIELDS, REQUIRED_FIELDS};
