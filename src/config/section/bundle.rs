//! `[[bundle]]` tables: bundles registered when the server starts.
//!
//! ```toml
//! [[bundle]]
//! name = "site"
//! kind = "css"
//! files = ["reset.css", "theme.css"]
//! urls = ["https://cdn.example.com/grid.css"]
//! inline = [".blue{color:#4286f4}"]
//! ```
//!
//! Fragments are added in the order inline, files, urls.

use serde::{Deserialize, Serialize};

use crate::asset::MediaKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleConfig {
    /// Label used in logs and on the index page.
    pub name: String,

    pub kind: MediaKind,

    #[serde(default)]
    pub inline: Vec<String>,

    /// Paths relative to `paths.src`.
    #[serde(default)]
    pub files: Vec<String>,

    /// Absolute URLs.
    #[serde(default)]
    pub urls: Vec<String>,
}

impl BundleConfig {
    pub fn is_empty(&self) -> bool {
        self.inline.iter().all(|s| s.trim().is_empty())
            && self.files.is_empty()
            && self.urls.is_empty()
    }
}
