//! Identity token codec.
//!
//! A token is the smallest fingerprint followed by the delta of every
//! fingerprint to it, in insertion order:
//!
//! ```text
//! [883963153, 2715583968, 883963153]  ->  "883963153.0.1831620815.0"
//! ```
//!
//! Duplicates and order survive the round trip. Artifacts are stored as
//! `<token>.<ext>`, so this grammar is a persisted format.

use crate::error::{BundleError, Result};

/// Something that can produce the canonical token of a bundle.
///
/// Cache keys and artifact names are always derived from this token.
pub trait Identity {
    /// Canonical token; empty when there is nothing to identify yet.
    fn token(&self) -> String;
}

/// Encode an ordered fingerprint list. Empty input yields `""`.
pub fn encode(fingerprints: &[u32]) -> String {
    let Some(&min) = fingerprints.iter().min() else {
        return String::new();
    };
    let mut token = min.to_string();
    for &fp in fingerprints {
        token.push('.');
        token.push_str(&fp.wrapping_sub(min).to_string());
    }
    token
}

/// Decode a token back into the ordered fingerprint list.
///
/// Fails with `UnexpectedEmpty` when no delta follows the minimum and with
/// `MalformedToken` when a component is not a `u32`.
pub fn decode(token: &str) -> Result<Vec<u32>> {
    if token.is_empty() {
        return Err(BundleError::UnexpectedEmpty);
    }
    let mut parts = token.split('.');
    let min = parse(parts.next().unwrap_or_default())?;
    let fingerprints = parts
        .map(|delta| parse(delta).map(|d| min.wrapping_add(d)))
        .collect::<Result<Vec<_>>>()?;
    if fingerprints.is_empty() {
        return Err(BundleError::UnexpectedEmpty);
    }
    Ok(fingerprints)
}

/// Parse one decimal component. Signs and empty components are rejected.
fn parse(component: &str) -> Result<u32> {
    let malformed = |reason: String| BundleError::MalformedToken {
        component: component.to_string(),
        reason,
    };
    if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed("expected decimal digits".to_string()));
    }
    component.parse::<u32>().map_err(|e| malformed(e.to_string()))
}
