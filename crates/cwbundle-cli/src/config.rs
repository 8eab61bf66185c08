//! Locating and parsing the `config.toml` file.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use cwbundle::{BundleError, config::AppConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),
}

impl From<ConfigError> for BundleError {
    fn from(err: ConfigError) -> Self {
        BundleError::Io(io::Error::other(err.to_string()))
    }
}

/// Loads the application configuration.
///
/// An explicit path must exist. Without one, `cwbundle/config.toml` in the
/// working directory is tried, then the platform config directory, and
/// finally the built-in defaults are used.
///
/// # Errors
///
/// Returns `BundleError::Io` when the explicit file is missing or any chosen
/// file cannot be read or parsed.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, BundleError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::MissingFile(path.to_path_buf()).into());
        }
        info!(path:?; "Loading configuration from explicit path");
        return parse_file(path);
    }

    let found = search_paths().into_iter().find(|path| path.exists());
    match found {
        Some(path) => {
            info!(path:?; "Loading configuration");
            parse_file(&path)
        }
        None => {
            debug!("No configuration file found, using default configuration");
            Ok(AppConfig::default())
        }
    }
}

/// Implicit configuration locations, highest priority first.
fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("cwbundle/config.toml")];
    match ProjectDirs::from("com", "cwbundle", "cwbundle") {
        Some(dirs) => paths.push(dirs.config_dir().join("config.toml")),
        None => debug!("Could not determine platform-specific config directory"),
    }
    paths
}

fn parse_file(path: &Path) -> Result<AppConfig, BundleError> {
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|err| ConfigError::Parse(err.to_string()).into())
}
