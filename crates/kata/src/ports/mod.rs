//! Ports (Interfaces)
//!
//! Abstract interfaces that define how the domain layer
//! reaches personas it does not own (e.g. `extends` parents).
//!
//! Loading from files or remote configuration lives outside this crate;
//! an in-memory registry is provided for callers that already hold values.

mod lookup;

// Re-exports
pub use lookup::*;
