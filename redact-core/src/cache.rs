// redact-core/src/cache.rs
//! cache.rs - Per-type field metadata, compiled once and shared.
//!
//! A record type describes its redactable fields with a list of
//! [`FieldSpec`]s (generated by `#[derive(Redact)]`). The first time a type is
//! walked, every instruction in that list is compiled into an [`Evaluator`]
//! and the result is stored in a [`MetadataCache`] keyed by the type's
//! [`TypeId`]. Later walks of the same type reuse the stored `Arc`.
//!
//! The cache starts empty. Lookups take the read lock; on a miss the metadata
//! is compiled outside any lock and then inserted under the write lock. Two
//! threads racing on the same unseen type may both compile, but only the first
//! insert is kept and both receive the stored entry. Compilation has no side
//! effects, so the duplicate work is harmless.
//!
//! License: MIT OR APACHE 2.0

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use log::debug;

use crate::errors::RedactError;
use crate::methods::MethodRegistry;
use crate::rules::compiler::compile_instruction;
use crate::rules::Evaluator;

/// The static description of one redactable field, as written on the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub instruction: Option<&'static str>,
    pub nested: bool,
}

impl FieldSpec {
    /// A field carrying a `#[redact("...")]` instruction.
    pub const fn instruction(name: &'static str, instruction: &'static str) -> Self {
        Self {
            name,
            instruction: Some(instruction),
            nested: false,
        }
    }

    /// A composite field marked `#[redact(nested)]`.
    pub const fn nested(name: &'static str) -> Self {
        Self {
            name,
            instruction: None,
            nested: true,
        }
    }
}

/// Compiled metadata of one field.
#[derive(Debug, Clone)]
pub struct FieldMetadata {
    name: &'static str,
    nested: bool,
    evaluator: Option<Evaluator>,
}

impl FieldMetadata {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_nested(&self) -> bool {
        self.nested
    }

    pub fn evaluator(&self) -> Option<&Evaluator> {
        self.evaluator.as_ref()
    }

    pub fn instruction(&self) -> Option<&str> {
        self.evaluator.as_ref().map(Evaluator::instruction)
    }
}

/// Compiled metadata of one record type, in field declaration order.
#[derive(Debug, Clone)]
pub struct TypeMetadata {
    type_name: &'static str,
    fields: Vec<FieldMetadata>,
}

impl TypeMetadata {
    /// Compiles every instruction in `specs`. The first failure aborts.
    pub fn compile(type_name: &'static str, specs: &[FieldSpec], registry: &MethodRegistry) -> Result<Self, RedactError> {
        let fields = specs
            .iter()
            .map(|spec| {
                let evaluator = spec
                    .instruction
                    .map(|instruction| compile_instruction(instruction, registry))
                    .transpose()
                    .map_err(|source| RedactError::Compile {
                        type_name,
                        field: spec.name.to_string(),
                        source,
                    })?;
                Ok(FieldMetadata {
                    name: spec.name,
                    nested: spec.nested,
                    evaluator,
                })
            })
            .collect::<Result<Vec<_>, RedactError>>()?;
        Ok(Self { type_name, fields })
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn fields(&self) -> &[FieldMetadata] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&FieldMetadata> {
        self.fields.get(index)
    }

    pub fn field_named(&self, name: &str) -> Option<&FieldMetadata> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Thread-safe, read-mostly store of [`TypeMetadata`] keyed by type.
#[derive(Debug, Default)]
pub struct MetadataCache {
    entries: RwLock<HashMap<TypeId, Arc<TypeMetadata>>>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the metadata of `T`, compiling it from `specs` on first use.
    ///
    /// Failed compilations are returned to the caller and nothing is stored,
    /// so every later call reports the same error.
    pub fn get_or_compile<T: 'static>(
        &self,
        type_name: &'static str,
        specs: impl FnOnce() -> Vec<FieldSpec>,
        registry: &MethodRegistry,
    ) -> Result<Arc<TypeMetadata>, RedactError> {
        let key = TypeId::of::<T>();

        {
            // The map is only ever inserted into, so a poisoned lock still holds
            // consistent data.
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(metadata) = entries.get(&key) {
                debug!("Serving cached metadata for {}.", type_name);
                return Ok(Arc::clone(metadata));
            }
        }

        debug!("No cached metadata for {}. Compiling now.", type_name);
        let compiled = Arc::new(TypeMetadata::compile(type_name, &specs(), registry)?);

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let stored = entries.entry(key).or_insert(compiled);
        debug!("Cached metadata for {} ({} field(s)).", type_name, stored.fields.len());
        Ok(Arc::clone(stored))
    }

    /// Returns the metadata of `T` if it was compiled before.
    pub fn get<T: 'static>(&self) -> Option<Arc<TypeMetadata>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(&TypeId::of::<T>()).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}
