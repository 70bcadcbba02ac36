use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::completion::FunctionDescription;
use crate::gateway::FormatOptions;

pub const DEFAULT_DELAY_MS: u64 = 500;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct EngineSettings {
    /// Path to the analyzer shared library.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DiagnosticsSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CompletionSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_keywords: Option<bool>,
}

/// One configuration layer. Unset keys fall through to lower layers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(default)]
    pub diagnostics: DiagnosticsSettings,
    #[serde(default)]
    pub format: FormatOptions,
    #[serde(default)]
    pub completion: CompletionSettings,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub functions: Vec<FunctionDescription>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub functions_file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Settings {
    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.diagnostics.delay_ms.unwrap_or(DEFAULT_DELAY_MS))
    }

    pub fn include_keywords(&self) -> bool {
        self.completion.include_keywords.unwrap_or(true)
    }
}
