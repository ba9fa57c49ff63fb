//! Media kind of a bundle.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BundleError;

/// MIME type for CSS content.
pub const CSS: &str = "text/css";
/// MIME type for JavaScript content.
pub const JAVASCRIPT: &str = "text/javascript";

/// Kind of media a bundle combines.
///
/// Selects the minifier, the artifact extension and the HTML tag.
/// In config files it is spelled by extension (`"css"`, `"js"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    #[serde(rename = "css")]
    Stylesheet,
    #[serde(rename = "js")]
    Script,
}

impl MediaKind {
    /// File extension without the leading dot.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Stylesheet => "css",
            Self::Script => "js",
        }
    }

    /// Bare MIME type (no charset).
    pub const fn mime(self) -> &'static str {
        match self {
            Self::Stylesheet => CSS,
            Self::Script => JAVASCRIPT,
        }
    }

    /// Media kind for an extension, with or without the leading dot.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.') {
            "css" => Some(Self::Stylesheet),
            "js" => Some(Self::Script),
            _ => None,
        }
    }
}

impl FromStr for MediaKind {
    type Err = BundleError;

    /// Parse a MIME type (`text/css`, `text/javascript`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            CSS => Ok(Self::Stylesheet),
            JAVASCRIPT => Ok(Self::Script),
            other => Err(BundleError::UnsupportedMediaKind(other.to_string())),
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_round_trip() {
        for kind in [MediaKind::Stylesheet, MediaKind::Script] {
            assert_eq!(MediaKind::from_extension(kind.extension()), Some(kind));
        }
        assert_eq!(MediaKind::from_extension(".css"), Some(MediaKind::Stylesheet));
        assert_eq!(MediaKind::from_extension("html"), None);
    }

    #[test]
    fn test_parse_mime() {
        assert_eq!("text/css".parse::<MediaKind>().unwrap(), MediaKind::Stylesheet);
        assert_eq!(
            "text/javascript".parse::<MediaKind>().unwrap(),
            MediaKind::Script
        );
        assert!(matches!(
            "text/html".parse::<MediaKind>(),
            Err(BundleError::UnsupportedMediaKind(m)) if m == "text/html"
        ));
    }
}
