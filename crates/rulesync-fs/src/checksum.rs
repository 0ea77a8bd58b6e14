//! SHA-256 checksum utilities
//!
//! A single canonical checksum format (`sha256:<hex>`) used to compare
//! rendered rule files against what is on disk.

use sha2::{Digest, Sha256};

use crate::{NormalizedPath, Result, io};

const PREFIX: &str = "sha256:";

/// Compute the SHA-256 checksum of raw bytes.
pub fn compute_bytes_checksum(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{}{:x}", PREFIX, hasher.finalize())
}

/// Compute the SHA-256 checksum of a file's contents.
pub fn compute_file_checksum(path: &NormalizedPath) -> Result<String> {
    let bytes = io::read_bytes(path)?;
    Ok(compute_bytes_checksum(&bytes))
}
