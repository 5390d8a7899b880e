//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod channel;
mod provider;

pub use channel::*;
pub use provider::*;
