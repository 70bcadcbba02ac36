//! Layered configuration: programmed defaults < user config < explicit file.

pub mod defaults;
pub mod settings;
pub mod user;

pub use settings::{
    CompletionSettings, DEFAULT_DELAY_MS, DiagnosticsSettings, EngineSettings, Settings,
};
pub use user::user_config_path;

use std::fs;
use std::path::Path;

use crate::completion::FunctionRegistry;
use crate::gateway::FormatOptions;
use defaults::default_settings;

const LOG_TARGET: &str = "exprbridge::config";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsEventKind {
    Info,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettingsEvent {
    pub kind: SettingsEventKind,
    pub message: String,
}

impl SettingsEvent {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: SettingsEventKind::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: SettingsEventKind::Warning,
            message: message.into(),
        }
    }

    /// Forward the event to the log.
    pub fn log(&self) {
        match self.kind {
            SettingsEventKind::Info => log::info!(target: LOG_TARGET, "{}", self.message),
            SettingsEventKind::Warning => log::warn!(target: LOG_TARGET, "{}", self.message),
        }
    }
}

#[derive(Debug, Default)]
pub struct SettingsLoadOutcome {
    pub settings: Settings,
    pub events: Vec<SettingsEvent>,
}

/// Merge two layers, preferring values from `primary` over `fallback`.
pub fn merge_settings(fallback: Settings, primary: Settings) -> Settings {
    let mut functions = fallback.functions;
    functions.extend(primary.functions);

    Settings {
        engine: EngineSettings {
            library: primary.engine.library.or(fallback.engine.library),
        },
        diagnostics: DiagnosticsSettings {
            delay_ms: primary.diagnostics.delay_ms.or(fallback.diagnostics.delay_ms),
        },
        format: merge_format_options(fallback.format, primary.format),
        completion: CompletionSettings {
            include_keywords: primary
                .completion
                .include_keywords
                .or(fallback.completion.include_keywords),
        },
        functions,
        functions_file: primary.functions_file.or(fallback.functions_file),
        log_level: primary.log_level.or(fallback.log_level),
    }
}

fn merge_format_options(fallback: FormatOptions, primary: FormatOptions) -> FormatOptions {
    FormatOptions {
        indent_size: primary.indent_size.or(fallback.indent_size),
        max_line_length: primary.max_line_length.or(fallback.max_line_length),
        space_around_ops: primary.space_around_ops.or(fallback.space_around_ops),
        break_long_expressions: primary
            .break_long_expressions
            .or(fallback.break_long_expressions),
    }
}

/// Merge layers in order; later layers have higher precedence.
pub fn merge_all(layers: impl IntoIterator<Item = Settings>) -> Settings {
    layers
        .into_iter()
        .reduce(merge_settings)
        .unwrap_or_default()
}

/// Load every layer: defaults < user config < `explicit`.
pub fn load_settings(explicit: Option<&Path>) -> SettingsLoadOutcome {
    load_settings_from(user_config_path().as_deref(), explicit)
}

fn load_settings_from(user: Option<&Path>, explicit: Option<&Path>) -> SettingsLoadOutcome {
    let mut events = Vec::new();

    let mut layers = vec![default_settings()];
    if let Some(path) = user
        && path.exists()
        && let Some(settings) = load_toml_settings(path, "user config", &mut events)
    {
        layers.push(settings);
    }
    if let Some(path) = explicit {
        if path.exists() {
            layers.extend(load_toml_settings(path, "config file", &mut events));
        } else {
            events.push(SettingsEvent::warning(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
    }

    SettingsLoadOutcome {
        settings: merge_all(layers),
        events,
    }
}

fn load_toml_settings(
    path: &Path,
    label: &str,
    events: &mut Vec<SettingsEvent>,
) -> Option<Settings> {
    match fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<Settings>(&contents) {
            Ok(settings) => {
                events.push(SettingsEvent::info(format!(
                    "Loaded {} from {}",
                    label,
                    path.display()
                )));
                Some(settings)
            }
            Err(err) => {
                events.push(SettingsEvent::warning(format!(
                    "Failed to parse {} {}: {}",
                    label,
                    path.display(),
                    err
                )));
                None
            }
        },
        Err(err) => {
            events.push(SettingsEvent::warning(format!(
                "Failed to read {} {}: {}",
                label,
                path.display(),
                err
            )));
            None
        }
    }
}

/// The builtin catalog extended by `functions_file`, then by inline
/// `functions` entries.
pub fn function_registry(settings: &Settings, events: &mut Vec<SettingsEvent>) -> FunctionRegistry {
    let mut registry = FunctionRegistry::builtin();
    if let Some(path) = &settings.functions_file {
        match FunctionRegistry::load(path) {
            Ok(extra) => {
                events.push(SettingsEvent::info(format!(
                    "Loaded {} functions from {}",
                    extra.len(),
                    path.display()
                )));
                registry = registry.merge(extra);
            }
            Err(err) => events.push(SettingsEvent::warning(format!(
                "Failed to load functions file {}: {}",
                path.display(),
                err
            ))),
        }
    }
    registry.merge(FunctionRegistry::new(settings.functions.iter().cloned()))
}
