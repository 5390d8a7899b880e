//! Persona Lookup Port
//!
//! Abstract interface the resolver uses to find `extends` parents.

use std::collections::HashMap;

use crate::domain::Persona;

/// Finds a persona by reference (name or username)
///
/// Consistency of the answers (staleness, read-your-writes) is up to the
/// implementor.
pub trait PersonaLookup {
    fn lookup(&self, reference: &str) -> Option<Persona>;
}

impl<F> PersonaLookup for F
where
    F: Fn(&str) -> Option<Persona>,
{
    fn lookup(&self, reference: &str) -> Option<Persona> {
        self(reference)
    }
}

/// In-memory persona registry keyed by name, also reachable by username
#[derive(Debug, Clone, Default)]
pub struct PersonaRegistry {
    by_name: HashMap<String, Persona>,
    name_by_username: HashMap<String, String>,
}

impl PersonaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a persona, returning the one it replaced (same name)
    pub fn insert(&mut self, persona: Persona) -> Option<Persona> {
        let previous = self.by_name.remove(persona.name());
        if let Some(previous) = &previous {
            // The username may have been taken over by another persona since.
            let owned = self
                .name_by_username
                .get(previous.username())
                .is_some_and(|name| name == previous.name());
            if owned {
                self.name_by_username.remove(previous.username());
            }
        }
        self.name_by_username
            .insert(persona.username().to_string(), persona.name().to_string());
        self.by_name.insert(persona.name().to_string(), persona);
        previous
    }

    /// Find by name first, then by username
    pub fn get(&self, reference: &str) -> Option<&Persona> {
        let reference = reference.trim();
        self.by_name.get(reference).or_else(|| {
            self.name_by_username
                .get(reference)
                .and_then(|name| self.by_name.get(name))
        })
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.get(reference).is_some()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl PersonaLookup for PersonaRegistry {
    fn lookup(&self, reference: &str) -> Option<Persona> {
        self.get(reference).cloned()
    }
}

impl FromIterator<Persona> for PersonaRegistry {
    fn from_iter<I: IntoIterator<Item = Persona>>(iter: I) -> Self {
        let mut registry = Self::new();
        for persona in iter {
            registry.insert(persona);
        }
        registry
    }
}

impl Extend<Persona> for PersonaRegistry {
    fn extend<I: IntoIterator<Item = Persona>>(&mut self, iter: I) {
        for persona in iter {
            self.insert(persona);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::validator::tests::candidate;
    use crate::domain::validate;

    fn persona(name: &str, username: &str) -> Persona {
        let mut value = candidate();
        value["name"] = name.into();
        value["username"] = username.into();
        validate(&value).unwrap()
    }

    #[test]
    fn test_get_by_name_or_username() {
        let registry: PersonaRegistry =
            [persona("Base", "base"), persona("Child", "child")].into_iter().collect();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("Base").unwrap().username(), "base");
        assert_eq!(registry.get("child").unwrap().name(), "Child");
        assert!(registry.get("nobody").is_none());
        assert_eq!(registry.names(), ["Base", "Child"]);
    }

    #[test]
    fn test_insert_replaces_same_name() {
        let mut registry = PersonaRegistry::new();
        assert!(registry.insert(persona("Base", "base")).is_none());
        let previous = registry.insert(persona("Base", "base2")).unwrap();

        assert_eq!(previous.username(), "base");
        assert_eq!(registry.len(), 1);
        assert!(!registry.contains("base"));
        assert!(registry.contains("base2"));
    }

    #[test]
    fn test_replacing_keeps_username_taken_by_another() {
        let mut registry = PersonaRegistry::new();
        registry.insert(persona("A", "shared"));
        registry.insert(persona("B", "shared"));
        registry.insert(persona("A", "a2"));

        assert_eq!(registry.get("shared").unwrap().name(), "B");
        assert_eq!(registry.get("a2").unwrap().name(), "A");
        assert_eq!(registry.len(), 2);

        let child = {
            let mut value = candidate();
            value["name"] = "Child".into();
            value["username"] = "child".into();
            value["extends"] = serde_json::json!(["shared"]);
            validate(&value).unwrap()
        };
        let resolved = crate::domain::resolve(&child, &registry).unwrap();
        assert_eq!(resolved.name(), "Child");
    }

    #[test]
    fn test_closure_lookup() {
        let base = persona("Base", "base");
        let lookup = |reference: &str| (reference == "Base").then(|| base.clone());
        assert!(lookup.lookup("Base").is_some());
        assert!(lookup.lookup("Other").is_none());
    }
}
