//! Name → factory registries.
//!
//! A registry is assembled once through [`RegistryBuilder`] and frozen by
//! [`RegistryBuilder::build`]. The frozen [`NamedRegistry`] has no mutating
//! methods, so it can be wrapped in an `Arc` and read from any number of
//! threads at once.

use std::fmt;

use ahash::AHashMap;

use crate::error::{RankEvalError, Result};

/// An immutable mapping from a type name to a factory.
pub struct NamedRegistry<F> {
    /// What kind of thing this registry resolves, e.g. "query".
    kind: &'static str,
    entries: AHashMap<String, F>,
}

impl<F> NamedRegistry<F> {
    /// Start building a registry for the given kind.
    pub fn builder(kind: &'static str) -> RegistryBuilder<F> {
        RegistryBuilder {
            kind,
            entries: AHashMap::new(),
        }
    }

    /// Start a builder already holding `entries`.
    ///
    /// The names are fixed at compile time by the caller and must be distinct
    /// and non-empty.
    pub(crate) fn builder_with<I>(kind: &'static str, entries: I) -> RegistryBuilder<F>
    where
        I: IntoIterator<Item = (&'static str, F)>,
    {
        let entries: Vec<(&'static str, F)> = entries.into_iter().collect();
        let count = entries.len();
        let entries: AHashMap<String, F> = entries
            .into_iter()
            .map(|(name, factory)| (name.to_string(), factory))
            .collect();
        debug_assert_eq!(entries.len(), count, "[{kind}] preloaded names collide");
        debug_assert!(!entries.contains_key(""), "[{kind}] preloaded name is empty");
        RegistryBuilder { kind, entries }
    }

    /// Look up the factory registered under `name`.
    pub fn resolve(&self, name: &str) -> Result<&F> {
        self.entries
            .get(name)
            .ok_or_else(|| RankEvalError::unknown_type(self.kind, name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<F> fmt::Debug for NamedRegistry<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedRegistry")
            .field("kind", &self.kind)
            .field("names", &self.names())
            .finish()
    }
}

/// Mutable stage of a [`NamedRegistry`].
pub struct RegistryBuilder<F> {
    kind: &'static str,
    entries: AHashMap<String, F>,
}

impl<F> RegistryBuilder<F> {
    /// Register `factory` under `name`. Names may only be registered once.
    pub fn register<S: Into<String>>(&mut self, name: S, factory: F) -> Result<&mut Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(RankEvalError::invalid_argument(format!(
                "[{}] registry names must not be empty",
                self.kind
            )));
        }
        if self.entries.contains_key(&name) {
            return Err(RankEvalError::invalid_argument(format!(
                "[{}] type [{name}] is already registered",
                self.kind
            )));
        }
        self.entries.insert(name, factory);
        Ok(self)
    }

    /// Freeze the registry.
    pub fn build(self) -> NamedRegistry<F> {
        tracing::debug!(kind = self.kind, entries = self.entries.len(), "registry built");
        NamedRegistry {
            kind: self.kind,
            entries: self.entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn numbers() -> NamedRegistry<fn() -> u32> {
        let mut builder = NamedRegistry::builder("number");
        builder.register("one", (|| 1) as fn() -> u32).unwrap();
        builder.register("two", (|| 2) as fn() -> u32).unwrap();
        builder.build()
    }

    #[test]
    fn test_resolve() {
        let registry = numbers();
        assert_eq!((registry.resolve("two").unwrap())(), 2);
        assert_eq!(registry.names(), vec!["one", "two"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_unknown_type() {
        let registry = numbers();
        match registry.resolve("three") {
            Err(RankEvalError::UnknownType { registry, name }) => {
                assert_eq!(registry, "number");
                assert_eq!(name, "three");
            }
            other => panic!("expected UnknownType, got {other:?}"),
        }
    }

    #[test]
    fn test_preloaded_builder() {
        let preloaded: [(&'static str, fn() -> u32); 2] = [("one", || 1), ("two", || 2)];
        let mut builder = NamedRegistry::builder_with("number", preloaded);
        assert!(builder.register("one", || 3).is_err());
        builder.register("three", || 3).unwrap();

        let registry = builder.build();
        assert_eq!(registry.names(), vec!["one", "three", "two"]);
        assert_eq!((registry.resolve("three").unwrap())(), 3);
    }

    #[test]
    fn test_duplicate_registration() {
        let mut builder = NamedRegistry::builder("number");
        builder.register("one", 1u32).unwrap();
        assert!(builder.register("one", 2u32).is_err());
        assert!(builder.register("", 3u32).is_err());
    }

    #[test]
    fn test_concurrent_lookups() {
        let registry = Arc::new(numbers());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    let name = if i % 2 == 0 { "one" } else { "two" };
                    (registry.resolve(name).unwrap())()
                })
            })
            .collect();

        let total: u32 = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(total, 4 + 8);
    }
}
