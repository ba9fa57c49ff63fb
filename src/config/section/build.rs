//! `[build]` section configuration.
//!
//! ```toml
//! [build]
//! version = "2024-06"    # path segment busting browser caches
//! ```
//!
//! Without `version`, the server start time (Unix seconds) is used, so
//! every restart invalidates client caches. An empty string drops the
//! segment from asset paths.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub version: Option<String>,
}
