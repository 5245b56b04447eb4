//! Alias registry: the static, ordered map of short names to instances.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::types::InstanceId;

/// One `[[aliases]]` entry in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasEntry {
    /// Short name users type (usually their chat user name)
    pub name: String,
    /// Instance the alias controls
    pub instance: InstanceId,
}

impl AliasEntry {
    pub fn new(name: impl Into<String>, instance: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instance: InstanceId::new(instance),
        }
    }
}

/// Immutable alias registry.
///
/// Iteration follows configuration order so listings and sweep summaries
/// are stable between runs.
#[derive(Debug, Clone, Default)]
pub struct AliasRegistry {
    entries: Vec<AliasEntry>,
}

impl AliasRegistry {
    /// Build a registry, rejecting empty and duplicate names.
    pub fn new(mut entries: Vec<AliasEntry>) -> Result<Self> {
        let mut seen = HashSet::new();
        for entry in &mut entries {
            entry.name = entry.name.trim().to_string();
            let name = entry.name.as_str();
            if name.is_empty() || name.split_whitespace().count() != 1 {
                return Err(Error::Config(format!(
                    "Alias name must be a single word, got {:?}",
                    entry.name
                )));
            }
            if entry.instance.as_str().trim().is_empty() {
                return Err(Error::Config(format!(
                    "Alias '{}' has an empty instance id",
                    entry.name
                )));
            }
            if !seen.insert(name.to_string()) {
                return Err(Error::Config(format!("Duplicate alias '{}'", name)));
            }
        }

        Ok(Self { entries })
    }

    /// Look up the instance bound to an alias
    pub fn get(&self, alias: &str) -> Option<&InstanceId> {
        self.entries
            .iter()
            .find(|e| e.name == alias)
            .map(|e| &e.instance)
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.get(alias).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &InstanceId)> {
        self.entries.iter().map(|e| (e.name.as_str(), &e.instance))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
