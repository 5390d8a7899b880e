//! Extends Resolver
//!
//! Produces a new persona with every unset field filled from the personas it
//! `extends`. Parents are resolved first, so inheritance is transitive.
//!
//! Precedence: the child's own values, then the last entry of `extends`,
//! then the one before it, and so on.

use std::collections::HashMap;

use crate::domain::entities::Persona;
use crate::domain::errors::ResolutionError;
use crate::ports::PersonaLookup;

/// Resolve `persona.extends` through `lookup`.
///
/// A persona with empty `extends` comes back unchanged.
pub fn resolve<L>(persona: &Persona, lookup: &L) -> Result<Persona, ResolutionError>
where
    L: PersonaLookup + ?Sized,
{
    if persona.is_resolved() {
        return Ok(persona.clone());
    }

    let mut walk = Walk {
        path: vec![persona.name().to_string()],
        resolved: HashMap::new(),
    };
    let resolved = walk.resolve(persona, lookup)?;

    if resolved.system().trim().is_empty() {
        return Err(ResolutionError::Unresolved {
            persona: resolved.name().to_string(),
            field: "system",
        });
    }

    tracing::debug!(
        persona = %resolved.name(),
        parents = persona.extends().len(),
        "Resolved persona extends"
    );
    Ok(resolved)
}

/// State of one `resolve` call
struct Walk {
    /// Names from the root down to the persona being resolved, inclusive
    path: Vec<String>,
    /// Parents already resolved in this call, by reference
    resolved: HashMap<String, Persona>,
}

impl Walk {
    fn resolve<L>(&mut self, persona: &Persona, lookup: &L) -> Result<Persona, ResolutionError>
    where
        L: PersonaLookup + ?Sized,
    {
        let mut parents = Vec::with_capacity(persona.extends().len());

        for reference in persona.extends() {
            if persona.answers_to(reference) {
                let name = persona.name().to_string();
                return Err(ResolutionError::CyclicExtends(vec![name.clone(), name]));
            }
            // A finished parent cannot be on the current path.
            if let Some(parent) = self.resolved.get(reference) {
                parents.push(parent.clone());
                continue;
            }

            let parent = lookup
                .lookup(reference)
                .ok_or_else(|| ResolutionError::UnknownParent(reference.clone()))?;

            if let Some(start) = self.path.iter().position(|name| name == parent.name()) {
                let mut cycle = self.path[start..].to_vec();
                cycle.push(parent.name().to_string());
                return Err(ResolutionError::CyclicExtends(cycle));
            }

            self.path.push(parent.name().to_string());
            let parent = if parent.is_resolved() {
                parent
            } else {
                self.resolve(&parent, lookup)?
            };
            self.path.pop();

            tracing::trace!(child = %persona.name(), parent = %parent.name(), "Loaded parent");
            self.resolved.insert(reference.clone(), parent.clone());
            parents.push(parent);
        }

        let mut merged = persona.clone();
        for parent in parents.iter().rev() {
            merged.inherit_unset_from(parent);
        }
        Ok(merged.into_resolved())
    }
}
