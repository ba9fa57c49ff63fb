//! Raw content fragments.

use std::borrow::Cow;

use crate::utils::hash;

/// Where the bytes of a fragment come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentKind {
    /// Literal bytes held in memory.
    Inline,
    /// Path of a local file, already joined with the source root.
    File,
    /// Absolute URL fetched over HTTP.
    Url,
}

/// One atomic piece of source content.
///
/// The payload is either the literal bytes or the reference string,
/// never both. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    kind: FragmentKind,
    payload: Vec<u8>,
}

impl Fragment {
    pub fn inline(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            kind: FragmentKind::Inline,
            payload: bytes.into(),
        }
    }

    pub fn file(path: impl Into<String>) -> Self {
        Self {
            kind: FragmentKind::File,
            payload: path.into().into_bytes(),
        }
    }

    pub fn url(url: impl Into<String>) -> Self {
        Self {
            kind: FragmentKind::Url,
            payload: url.into().into_bytes(),
        }
    }

    #[inline]
    pub const fn kind(&self) -> FragmentKind {
        self.kind
    }

    /// Canonical bytes: literal content or reference string.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Payload as text (lossy for non UTF-8 inline bytes).
    pub fn as_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.payload)
    }

    /// 32-bit fingerprint of the canonical bytes.
    ///
    /// Only the payload is hashed, never fetched content, so a file or URL
    /// keeps its fingerprint when the content behind it changes.
    #[inline]
    pub fn fingerprint(&self) -> u32 {
        hash::fingerprint(&self.payload)
    }
}
