//! `[fetch]` section configuration.
//!
//! ```toml
//! [fetch]
//! timeout_ms = 2000    # connect and read timeout of remote fragments
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Remote fragment download settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_ms: u64,
}

impl FetchConfig {
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout_ms: 2000 }
    }
}
