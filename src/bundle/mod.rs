//! Bundles: ordered fingerprint lists of one media kind.

pub mod identity;
pub mod tag;

pub use identity::{Identity, decode, encode};

use crate::asset::MediaKind;
use crate::error::{BundleError, Result};

/// An ordered sequence of fragment fingerprints plus a media kind.
///
/// Holds fingerprints only; payloads live in the raw store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    media: MediaKind,
    fingerprints: Vec<u32>,
}

impl Bundle {
    pub const fn new(media: MediaKind) -> Self {
        Self {
            media,
            fingerprints: Vec::new(),
        }
    }

    /// Rebuild a bundle from its identity token.
    pub fn from_token(media: MediaKind, token: &str) -> Result<Self> {
        Ok(Self {
            media,
            fingerprints: decode(token)?,
        })
    }

    /// Rebuild a bundle from an artifact file name such as `12.0.3.css`.
    pub fn from_file_name(name: &str) -> Result<Self> {
        let (token, ext) = name
            .rsplit_once('.')
            .ok_or_else(|| BundleError::UnsupportedMediaKind(String::new()))?;
        let media = MediaKind::from_extension(ext)
            .ok_or_else(|| BundleError::UnsupportedMediaKind(ext.to_string()))?;
        Self::from_token(media, token)
    }

    #[inline]
    pub const fn media(&self) -> MediaKind {
        self.media
    }

    #[inline]
    pub fn fingerprints(&self) -> &[u32] {
        &self.fingerprints
    }

    pub fn push(&mut self, fingerprint: u32) {
        self.fingerprints.push(fingerprint);
    }

    pub fn is_empty(&self) -> bool {
        self.fingerprints.is_empty()
    }

    /// Token of a bundle that has at least one fragment.
    pub fn identity(&self) -> Result<String> {
        if self.is_empty() {
            return Err(BundleError::UnexpectedEmpty);
        }
        Ok(self.token())
    }

    /// Artifact file name: `<token>.<ext>`, empty when there is no fragment.
    pub fn file_name(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        format!("{}.{}", self.token(), self.media.extension())
    }
}

impl Identity for Bundle {
    fn token(&self) -> String {
        encode(&self.fingerprints)
    }
}
