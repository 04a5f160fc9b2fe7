// redact-core/src/methods/mod.rs
//! The method registry: named factories that build transformers.
//!
//! A method is registered under a lowercase name. When an instruction such as
//! `admin=star(-4)` is compiled, the factory registered as `star` is called
//! once with the static arguments and returns a [`Transformer`] bound to them.
//! The transformer is what runs for every redacted value.
//!
//! License: MIT OR APACHE 2.0

pub mod builtin;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::errors::TransformError;
use crate::field::Scalar;
use crate::rules::args::Arg;

/// A transformation bound to its static arguments.
pub type Transformer = Arc<dyn Fn(&mut dyn Scalar) -> Result<(), TransformError> + Send + Sync>;

/// Builds a [`Transformer`] from the arguments of one compiled rule.
pub type MethodFactory = Arc<dyn Fn(&[Arg]) -> Result<Transformer, TransformError> + Send + Sync>;

/// Wraps a closure as a [`Transformer`].
pub fn transformer<F>(f: F) -> Transformer
where
    F: Fn(&mut dyn Scalar) -> Result<(), TransformError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Maps method names to factories.
#[derive(Clone, Default)]
pub struct MethodRegistry {
    methods: HashMap<String, MethodFactory>,
}

impl MethodRegistry {
    /// A registry with no methods.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry holding `zero`, `star`, `remove` and `redact`.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry
            .register("zero", builtin::zero)
            .register("star", builtin::star)
            .register("remove", builtin::remove)
            .register("redact", builtin::redact);
        registry
    }

    /// Registers `factory` under `name`, replacing any previous method of
    /// that name. Names are case-insensitive.
    pub fn register<F>(&mut self, name: &str, factory: F) -> &mut Self
    where
        F: Fn(&[Arg]) -> Result<Transformer, TransformError> + Send + Sync + 'static,
    {
        let name = name.to_lowercase();
        if self.methods.insert(name.clone(), Arc::new(factory)).is_some() {
            debug!("Replaced redaction method '{}'.", name);
        }
        self
    }

    /// Removes a method. Returns `false` if it was not registered.
    pub fn disable(&mut self, name: &str) -> bool {
        self.methods.remove(&name.to_lowercase()).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&MethodFactory> {
        self.methods.get(&name.to_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl fmt::Debug for MethodRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodRegistry")
            .field("methods", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names() {
        let registry = MethodRegistry::builtin();
        assert_eq!(registry.names(), vec!["redact", "remove", "star", "zero"]);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = MethodRegistry::builtin();
        assert!(registry.contains("STAR"));
        assert!(!registry.contains("hash"));
    }

    #[test]
    fn test_register_and_disable() {
        let mut registry = MethodRegistry::empty();
        registry.register("Upper", |_args: &[Arg]| {
            Ok(transformer(|value| {
                if let Some(text) = value.text_mut() {
                    *text = text.to_uppercase();
                }
                Ok(())
            }))
        });
        assert!(registry.contains("upper"));
        assert!(registry.disable("UPPER"));
        assert!(!registry.disable("upper"));
        assert!(registry.is_empty());
    }
}
