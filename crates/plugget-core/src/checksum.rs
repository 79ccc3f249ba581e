//! SHA-256 digest computation and best-effort archive verification.
//!
//! Verification compares the downloaded archive against the digest published
//! in the sibling `.sha256` file. A mismatch is reported to the caller, not
//! raised as an error: archive integrity is advisory in this pipeline.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

const BUF_SIZE: usize = 64 * 1024;

/// Outcome of comparing a file against a published digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChecksumOutcome {
    Match,
    Mismatch { expected: String, actual: String },
}

/// Compute SHA-256 of a file and return the digest as lowercase hex.
/// Reads in chunks to keep memory use bounded; suitable for large archives.
pub fn sha256_path(path: &Path) -> Result<String> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut reader = BufReader::with_capacity(BUF_SIZE, file);
    let mut hasher = Sha256::new();
    loop {
        let chunk = reader
            .fill_buf()
            .with_context(|| format!("read {}", path.display()))?;
        if chunk.is_empty() {
            break;
        }
        hasher.update(chunk);
        let consumed = chunk.len();
        reader.consume(consumed);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Extract the digest from a checksum file body.
///
/// Accepts the common `sha256sum` layout (`<hex>  <filename>`) as well as a
/// bare hex line; returns `None` when no 64-character hex token is present.
pub fn parse_digest(text: &str) -> Option<String> {
    text.split_whitespace()
        .find(|token| token.len() == 64 && token.bytes().all(|b| b.is_ascii_hexdigit()))
        .map(|token| token.to_ascii_lowercase())
}

/// Hash `path` and compare against `expected_hex` (case-insensitive).
pub fn verify_against(path: &Path, expected_hex: &str) -> Result<ChecksumOutcome> {
    let actual = sha256_path(path)?;
    if actual.eq_ignore_ascii_case(expected_hex) {
        Ok(ChecksumOutcome::Match)
    } else {
        Ok(ChecksumOutcome::Mismatch {
            expected: expected_hex.to_ascii_lowercase(),
            actual,
        })
    }
}
