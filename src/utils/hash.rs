//! 32-bit FNV-1 hashing for fragment fingerprints.
//!
//! Fingerprints end up inside artifact file names, so the algorithm is
//! fixed: FNV-1 (multiply, then xor) with the standard 32-bit offset basis
//! and prime. It is not collision resistant against adversarial input.
//!
//! # Usage
//!
//! ```ignore
//! use crate::utils::hash;
//!
//! let fp = hash::fingerprint("body{color:red}"); // -> u32
//! ```

use std::hash::Hasher;

const OFFSET_BASIS: u32 = 0x811c_9dc5;
const PRIME: u32 = 0x0100_0193;

/// FNV-1 hasher producing a 32-bit digest.
#[derive(Debug, Clone, Copy)]
pub struct Fnv32(u32);

impl Default for Fnv32 {
    fn default() -> Self {
        Self(OFFSET_BASIS)
    }
}

impl Fnv32 {
    /// The 32-bit digest of everything written so far.
    #[inline]
    pub const fn sum32(&self) -> u32 {
        self.0
    }
}

impl Hasher for Fnv32 {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 = self.0.wrapping_mul(PRIME) ^ u32::from(b);
        }
    }

    #[inline]
    fn finish(&self) -> u64 {
        u64::from(self.0)
    }
}

/// Compute the 32-bit fingerprint of byte data.
#[inline]
pub fn fingerprint<T: AsRef<[u8]> + ?Sized>(data: &T) -> u32 {
    let mut hasher = Fnv32::default();
    hasher.write(data.as_ref());
    hasher.sum32()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vectors() {
        assert_eq!(fingerprint(""), OFFSET_BASIS);
        assert_eq!(fingerprint("var a = 56;"), 2_925_958_264);
        assert_eq!(fingerprint(".black{color:#000;}"), 3_236_089_261);
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(fingerprint("alert('hi')"), fingerprint(b"alert('hi')"));
        assert_ne!(fingerprint("a.css"), fingerprint("b.css"));
    }
}
