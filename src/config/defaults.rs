//! Programmed defaults, the lowest configuration layer.

use super::settings::{CompletionSettings, DEFAULT_DELAY_MS, DiagnosticsSettings, Settings};

pub fn default_settings() -> Settings {
    Settings {
        diagnostics: DiagnosticsSettings {
            delay_ms: Some(DEFAULT_DELAY_MS),
        },
        completion: CompletionSettings {
            include_keywords: Some(true),
        },
        log_level: Some("warn".to_string()),
        ..Settings::default()
    }
}
