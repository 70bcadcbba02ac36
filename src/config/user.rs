//! User configuration location.
//!
//! User config location: $XDG_CONFIG_HOME/exprbridge/exprbridge.toml
//! Fallback: the platform config directory (via `dirs`).

use std::ffi::OsString;
use std::path::PathBuf;

const APP_DIR: &str = "exprbridge";
const FILE_NAME: &str = "exprbridge.toml";

/// Returns the path to the user configuration file.
///
/// The path is determined by:
/// 1. If $XDG_CONFIG_HOME is set: $XDG_CONFIG_HOME/exprbridge/exprbridge.toml
/// 2. Otherwise: `dirs::config_dir()`/exprbridge/exprbridge.toml
///
/// Returns None if neither location can be determined.
pub fn user_config_path() -> Option<PathBuf> {
    resolve_user_config_path(std::env::var_os("XDG_CONFIG_HOME"), dirs::config_dir())
}

fn resolve_user_config_path(xdg: Option<OsString>, config_dir: Option<PathBuf>) -> Option<PathBuf> {
    xdg.filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or(config_dir)
        .map(|base| base.join(APP_DIR).join(FILE_NAME))
}
