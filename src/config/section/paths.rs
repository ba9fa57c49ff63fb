//! `[paths]` section configuration.
//!
//! ```toml
//! [paths]
//! src = "./src"        # root of file fragments
//! dst = "./combine"    # where combined artifacts are written
//! ```
//!
//! Relative paths are resolved against the directory of `bundlebox.toml`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Source and artifact directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub src: PathBuf,
    pub dst: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            src: PathBuf::from("."),
            dst: PathBuf::from("combine"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::config::test_parse_config;

    #[test]
    fn test_paths_config() {
        let config = test_parse_config("[paths]\nsrc = \"assets\"\ndst = \"public/min\"");
        assert_eq!(config.paths.src, PathBuf::from("assets"));
        assert_eq!(config.paths.dst, PathBuf::from("public/min"));
    }

    #[test]
    fn test_paths_config_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.paths.src, PathBuf::from("."));
        assert_eq!(config.paths.dst, PathBuf::from("combine"));
    }
}
