// redact-core/src/redactor.rs
//! redactor.rs - The entry points for redacting values.
//!
//! A [`Redactor`] ties together a [`MethodRegistry`], the per-type
//! [`MetadataCache`] and a [`RedactorConfig`]. Most callers use the free
//! functions [`redact`] and [`redact_record`], which share a process-wide
//! redactor holding the built-in methods.
//!
//! License: MIT OR APACHE 2.0

use std::any::type_name;
use std::sync::Arc;

use lazy_static::lazy_static;
use log::{debug, warn};

use crate::cache::{MetadataCache, TypeMetadata};
use crate::config::RedactorConfig;
use crate::errors::{CompileError, RedactError};
use crate::methods::MethodRegistry;
use crate::rules::compiler::compile_instruction;
use crate::rules::Evaluator;
use crate::walker::{Redact, RedactRecord, Walker};

#[derive(Debug)]
pub struct Redactor {
    registry: MethodRegistry,
    cache: MetadataCache,
    config: RedactorConfig,
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new()
    }
}

impl Redactor {
    /// A redactor with the built-in methods and the default configuration.
    pub fn new() -> Self {
        Self::with_registry(MethodRegistry::builtin())
    }

    pub fn with_registry(registry: MethodRegistry) -> Self {
        Self {
            registry,
            cache: MetadataCache::new(),
            config: RedactorConfig::default(),
        }
    }

    /// Builds a redactor from `registry`, minus the methods the configuration
    /// disables.
    pub fn with_config(mut registry: MethodRegistry, config: RedactorConfig) -> Self {
        for name in &config.disabled_methods {
            if registry.disable(name) {
                debug!("Disabled redaction method '{}'.", name);
            } else {
                warn!("Method '{}' in `disabled_methods` is not registered.", name);
            }
        }
        Self {
            registry,
            cache: MetadataCache::new(),
            config,
        }
    }

    /// Returns a redacted copy of `value` for the given caller groups.
    ///
    /// `value` may be a record, any container of records, or an
    /// [`AnyRecord`](crate::AnyRecord). A bare leaf at the root fails with
    /// [`RedactError::NotStruct`].
    pub fn redact<T: Redact, S: AsRef<str>>(&self, value: &T, groups: &[S]) -> Result<T, RedactError> {
        let groups: Vec<String> = if groups.is_empty() {
            self.config.default_groups.clone()
        } else {
            groups.iter().map(|g| g.as_ref().to_string()).collect()
        };
        debug!("Redacting {} for groups {:?}.", type_name::<T>(), groups);
        value.walk(&Walker::new(self, &groups))
    }

    /// Compiles an instruction against this redactor's registry, bypassing
    /// the cache.
    pub fn compile(&self, instruction: &str) -> Result<Evaluator, CompileError> {
        compile_instruction(instruction, &self.registry)
    }

    /// Compiled metadata of `T`, from the cache when available.
    pub fn metadata<T: RedactRecord>(&self) -> Result<Arc<TypeMetadata>, RedactError> {
        self.cache
            .get_or_compile::<T>(type_name::<T>(), T::field_specs, &self.registry)
    }

    pub fn registry(&self) -> &MethodRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &MetadataCache {
        &self.cache
    }

    pub fn config(&self) -> &RedactorConfig {
        &self.config
    }
}

lazy_static! {
    /// The redactor behind [`redact`] and [`redact_record`].
    static ref DEFAULT_REDACTOR: Redactor = Redactor::new();
}

/// The process-wide redactor holding the built-in methods.
pub fn default_redactor() -> &'static Redactor {
    &DEFAULT_REDACTOR
}

/// Redacts `value` with the process-wide redactor.
pub fn redact<T: Redact, S: AsRef<str>>(value: &T, groups: &[S]) -> Result<T, RedactError> {
    DEFAULT_REDACTOR.redact(value, groups)
}

/// Like [`redact`], restricted to a single record, which can never fail with
/// [`RedactError::NotStruct`].
pub fn redact_record<T: RedactRecord, S: AsRef<str>>(record: &T, groups: &[S]) -> Result<T, RedactError> {
    DEFAULT_REDACTOR.redact(record, groups)
}
