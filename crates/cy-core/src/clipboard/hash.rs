use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    Blake3V1,
}

/// Fingerprint of raw clipboard bytes.
///
/// Only used for change detection. Equal bytes always give an equal hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash {
    pub alg: HashAlgorithm,
    pub bytes: [u8; 32],
}

impl ContentHash {
    pub fn of(bytes: &[u8]) -> Self {
        Self {
            alg: HashAlgorithm::Blake3V1,
            bytes: blake3::hash(bytes).into(),
        }
    }

    pub fn streaming() -> ContentHasher {
        ContentHasher {
            inner: blake3::Hasher::new(),
        }
    }

    /// Short hex prefix for log lines.
    pub fn short(&self) -> String {
        hex::encode(&self.bytes[..6])
    }
}

/// Incremental form of [`ContentHash::of`] for files read in chunks.
pub struct ContentHasher {
    inner: blake3::Hasher,
}

impl ContentHasher {
    pub fn update(&mut self, chunk: &[u8]) -> &mut Self {
        self.inner.update(chunk);
        self
    }

    pub fn finish(&self) -> ContentHash {
        ContentHash {
            alg: HashAlgorithm::Blake3V1,
            bytes: self.inner.finalize().into(),
        }
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "blake3:{}", hex::encode(self.bytes))
    }
}
