//! Hashing support for identity derivation.

use sha2::{Digest, Sha256};

use crate::buf::Buf32;

/// Computes the SHA-256 of a raw byte buffer.
pub fn raw(buf: &[u8]) -> Buf32 {
    let mut hasher = Sha256::new();
    hasher.update(buf);
    let digest: [u8; 32] = hasher.finalize().into();
    Buf32::new(digest)
}
