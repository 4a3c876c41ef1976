//! Incremental SHA-1 accumulation and digest rendering.

use std::fmt;

use serde::{Serialize, Serializer};
use sha1::{Digest as _, Sha1};

/// Length of a digest in bytes.
pub const DIGEST_LEN: usize = 20;

/// A finalized 20-byte digest.
///
/// Displays as fixed-width uppercase hexadecimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    /// One-shot digest of a byte slice.
    pub fn of(bytes: &[u8]) -> Self {
        Self(Sha1::digest(bytes).into())
    }

    /// Uppercase hexadecimal rendering, two characters per byte.
    pub fn to_hex(&self) -> String {
        use fmt::Write;
        self.0
            .iter()
            .fold(String::with_capacity(DIGEST_LEN * 2), |mut acc, b| {
                let _ = write!(acc, "{b:02X}");
                acc
            })
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Digest state for one root traversal.
///
/// File contents are appended in traversal order; `finalize` consumes the
/// accumulator so it can only be finalized once.
#[derive(Debug, Clone, Default)]
pub struct HashAccumulator {
    hasher: Sha1,
}

impl HashAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw file content.
    pub fn append(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    pub fn finalize(self) -> Digest {
        Digest(self.hasher.finalize().into())
    }
}
