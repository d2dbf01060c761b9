//! Resolve the configuration directory for `qfind`.
//!
//! Respects an environment override while falling back to the
//! platform-appropriate location provided by the `directories` crate.

use std::env;
use std::path::PathBuf;

use anyhow::{Result, anyhow};
use directories::ProjectDirs;

const QUALIFIER: &str = "io";
const ORGANIZATION: &str = "qfind";
const APPLICATION: &str = "qfind";

const CONFIG_DIR_ENV: &str = "QFIND_CONFIG_DIR";

/// Return the configuration directory used to persist user preferences.
///
/// # Errors
///
/// Fails when the platform provides no home directory to derive a location
/// from and no override is set.
pub fn get_config_dir() -> Result<PathBuf> {
    if let Some(dir) = dir_from_env(CONFIG_DIR_ENV) {
        return Ok(dir);
    }

    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .map(|dirs| dirs.config_local_dir().to_path_buf())
        .ok_or_else(|| anyhow!("unable to determine project directories for qfind"))
}

/// Resolve an override directory from an environment variable.
///
/// An empty value is treated the same as an unset one.
fn dir_from_env(name: &str) -> Option<PathBuf> {
    let value = env::var_os(name)?;
    if value.is_empty() {
        None
    } else {
        Some(PathBuf::from(value))
    }
}
