//! Configuration management for `redact-core`.
//!
//! A [`RedactorConfig`] controls the process-level knobs of a
//! [`Redactor`](crate::Redactor): which groups apply when a caller passes
//! none, and which registered methods are switched off. It is usually loaded
//! from YAML:
//!
//! ```yaml
//! default_groups: [guest]
//! disabled_methods: [remove]
//! ```
//!
//! License: MIT OR Apache-2.0

use std::collections::HashSet;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::rules::NO_GROUP;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RedactorConfig {
    /// Groups used when a redaction call supplies none.
    pub default_groups: Vec<String>,
    /// Method names removed from the registry the redactor is built with.
    pub disabled_methods: Vec<String>,
}

impl Default for RedactorConfig {
    fn default() -> Self {
        Self {
            default_groups: vec![NO_GROUP.to_string()],
            disabled_methods: Vec::new(),
        }
    }
}

impl RedactorConfig {
    /// Loads and validates a configuration from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading redactor configuration from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: RedactorConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a configuration from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: RedactorConfig = serde_yml::from_str(yaml).context("Failed to parse redactor configuration")?;
        config.validate()?;
        debug!(
            "Parsed redactor configuration with {} default group(s).",
            config.default_groups.len()
        );
        Ok(config)
    }

    /// Checks that no name is empty or listed twice.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        check_names("default_groups", &self.default_groups, &mut errors);
        check_names("disabled_methods", &self.disabled_methods, &mut errors);

        if !errors.is_empty() {
            let full_error_message = format!("Configuration validation failed:\n{}", errors.join("\n"));
            Err(anyhow!(full_error_message))
        } else {
            Ok(())
        }
    }
}

fn check_names(list: &str, names: &[String], errors: &mut Vec<String>) {
    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            errors.push(format!("`{}` contains an empty name.", list));
        } else if !seen.insert(name.to_lowercase()) {
            errors.push(format!("Duplicate name in `{}`: '{}'.", list, name));
        }
    }
}
