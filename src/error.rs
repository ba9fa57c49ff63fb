//! Error types shared by the bundler core.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::asset::minify::MinifyError;
use crate::source::ResolveError;

/// Result alias for bundler operations.
pub type Result<T, E = BundleError> = std::result::Result<T, E>;

/// Errors raised while assembling, identifying or building a bundle.
#[derive(Debug, Error)]
pub enum BundleError {
    /// Reserved for de-duplication on insert.
    #[error("asset already exists")]
    AlreadyExists,

    /// The bundle has no fragment, or the token has no delta component.
    #[error("unexpected EOF")]
    UnexpectedEmpty,

    #[error("unknown media kind `{0}`")]
    UnsupportedMediaKind(String),

    #[error("malformed token component `{component}`: {reason}")]
    MalformedToken { component: String, reason: String },

    #[error("invalid URL `{url}`")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The fingerprint is absent from the raw store at build time.
    #[error("not found: fragment {0}")]
    FragmentNotFound(u32),

    #[error("not found: fragment {fingerprint}: {source}")]
    ResolutionFailed {
        fingerprint: u32,
        #[source]
        source: ResolveError,
    },

    #[error("minification failed for fragment {fingerprint}: {source}")]
    MinificationFailed {
        fingerprint: u32,
        #[source]
        source: MinifyError,
    },

    #[error("IO error on `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BundleError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error means some content could not be found.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::FragmentNotFound(_) | Self::ResolutionFailed { .. }
        )
    }
}
