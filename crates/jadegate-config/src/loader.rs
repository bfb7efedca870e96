//! Layered config loading: embedded defaults → user file → environment.
//! An explicit CLI flag, the fourth tier the spec names, is applied by
//! the caller (the `jadegate` binary) on top of what [`load`] returns —
//! this crate has no notion of a binary's argument parser.

use std::path::{Path, PathBuf};

use crate::env::apply_env;
use crate::error::ConfigResult;
use crate::types::{default_config_path, Config, ConfigFile};

/// Load configuration: start from [`Config::default`], merge a user
/// config file if one is found, then apply any set `JADEGATE_*`
/// environment variables.
///
/// `explicit_path` overrides the default search location
/// (`${HOME}/.jadegate/config.toml`). If neither an explicit path nor
/// the default location has a file, the embedded defaults (as
/// overridden by the environment) are returned unchanged — a missing
/// config file is not an error.
///
/// # Errors
///
/// Returns a [`crate::ConfigError`] if a config file that *does* exist
/// is not valid TOML, or if a set environment variable can't be parsed.
pub fn load(explicit_path: Option<&Path>) -> ConfigResult<Config> {
    let path = explicit_path
        .map(Path::to_path_buf)
        .or_else(default_config_path);

    let config = Config::default();
    let config = match path.as_deref().and_then(try_load_file).transpose()? {
        Some(file) => {
            tracing::debug!(path = %path.unwrap().display(), "loaded user config file");
            config.merge_file(file)
        }
        None => config,
    };

    apply_env(config)
}

/// Read and parse a config file at `path`, returning `None` if it
/// doesn't exist.
fn try_load_file(path: &Path) -> Option<ConfigResult<ConfigFile>> {
    if !path.exists() {
        return None;
    }
    Some(read_file(path))
}

fn read_file(path: &Path) -> ConfigResult<ConfigFile> {
    let text = std::fs::read_to_string(path).map_err(|source| crate::ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| crate::ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
