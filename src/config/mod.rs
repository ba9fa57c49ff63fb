//! Configuration management for `bundlebox.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [paths] [serve] [fetch] [build] [[bundle]]
//! ├── error          # ConfigError
//! ├── util           # config file lookup
//! └── mod.rs         # BoxConfig (this file)
//! ```
//!
//! A missing config file is not an error: every section has defaults.

mod error;
pub mod section;
mod util;

pub use error::ConfigError;
pub use section::{BuildConfig, BundleConfig, FetchConfig, PathsConfig, ServeConfig};

use std::{
    fs,
    net::IpAddr,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::debug;
use util::find_config_file;

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing bundlebox.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoxConfig {
    /// Absolute path to the config file, empty when none was found
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Directory relative paths are resolved against
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub serve: ServeConfig,

    #[serde(default)]
    pub fetch: FetchConfig,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default, rename = "bundle")]
    pub bundles: Vec<BundleConfig>,
}

/// Values given on the command line, applied over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub src: Option<PathBuf>,
    pub dst: Option<PathBuf>,
    pub interface: Option<IpAddr>,
    pub port: Option<u16>,
}

impl BoxConfig {
    /// Load configuration, searching upward from cwd for `config_name`.
    ///
    /// The root is the config file's directory, or cwd without one.
    pub fn load(config_name: &Path, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir().map_err(|e| ConfigError::Io(PathBuf::from("."), e))?;

        let mut config = match find_config_file(config_name, &cwd) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| cwd.clone());
                config.config_path = path;
                config
            }
            None => {
                debug!("config"; "{} not found, using defaults", config_name.display());
                Self {
                    root: cwd,
                    ..Self::default()
                }
            }
        };

        config.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Apply command line values.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        Self::update_option(&mut self.paths.src, overrides.src.as_ref());
        Self::update_option(&mut self.paths.dst, overrides.dst.as_ref());
        Self::update_option(&mut self.serve.interface, overrides.interface.as_ref());
        Self::update_option(&mut self.serve.port, overrides.port.as_ref());
    }

    /// Check values serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.serve.prefix.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "serve.prefix must start with `/`, got `{}`",
                self.serve.prefix
            )));
        }
        if self.fetch.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "fetch.timeout_ms must be greater than 0".into(),
            ));
        }
        if let Some(bundle) = self.bundles.iter().find(|b| b.name.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "bundle of kind `{}` has no name",
                bundle.kind
            )));
        }
        Ok(())
    }

    /// Root of file fragments.
    pub fn src_dir(&self) -> PathBuf {
        self.root.join(&self.paths.src)
    }

    /// Artifact directory.
    pub fn dst_dir(&self) -> PathBuf {
        self.root.join(&self.paths.dst)
    }

    fn update_option<T: Clone>(target: &mut T, value: Option<&T>) {
        if let Some(v) = value {
            *target = v.clone();
        }
    }
}

/// Parse a config string, panicking on error.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> BoxConfig {
    BoxConfig::from_str(content).unwrap()
}
