//! The catalog of callable functions used by completion and hover.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, BridgeResult};

const BUILTIN_FUNCTIONS: &str = include_str!("builtin_functions.toml");

const LOG_TARGET: &str = "exprbridge::completion";

/// How a completion entry is presented and applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionCategory {
    #[default]
    Function,
    Constant,
    Keyword,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDescription {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub syntax: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
    #[serde(default, rename = "type")]
    pub category: CompletionCategory,
    /// Short signature shown beside the label; defaults to `syntax`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Long documentation; defaults to `description`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
}

impl FunctionDescription {
    pub fn detail_text(&self) -> &str {
        self.detail.as_deref().unwrap_or(&self.syntax)
    }

    pub fn info_text(&self) -> &str {
        self.info.as_deref().unwrap_or(&self.description)
    }
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    functions: Vec<FunctionDescription>,
}

/// Ordered catalog keyed by uppercase name. Built once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionRegistry {
    entries: Vec<FunctionDescription>,
    by_name: HashMap<String, usize>,
}

impl FunctionRegistry {
    pub fn new(entries: impl IntoIterator<Item = FunctionDescription>) -> Self {
        let mut registry = Self::default();
        for entry in entries {
            registry.insert(entry);
        }
        registry
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> Self {
        match Self::from_toml_str(BUILTIN_FUNCTIONS) {
            Ok(registry) => registry,
            Err(err) => {
                log::error!(target: LOG_TARGET, "Builtin function catalog is invalid: {}", err);
                Self::default()
            }
        }
    }

    /// Parse a `[[functions]]` TOML document.
    pub fn from_toml_str(source: &str) -> BridgeResult<Self> {
        let file: RegistryFile = toml::from_str(source)
            .map_err(|err| BridgeError::config(format!("function catalog: {}", err)))?;
        Ok(Self::new(file.functions))
    }

    pub fn load(path: &Path) -> BridgeResult<Self> {
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Entries of `other` replace same-named entries in place; new names are
    /// appended in `other`'s order.
    pub fn merge(mut self, other: FunctionRegistry) -> Self {
        for entry in other.entries {
            self.insert(entry);
        }
        self
    }

    fn insert(&mut self, entry: FunctionDescription) {
        let key = entry.name.to_uppercase();
        match self.by_name.get(&key) {
            Some(&index) => self.entries[index] = entry,
            None => {
                self.by_name.insert(key, self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&FunctionDescription> {
        self.by_name
            .get(&name.to_uppercase())
            .and_then(|&index| self.entries.get(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &FunctionDescription> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
