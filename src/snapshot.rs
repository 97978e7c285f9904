//! Reader for the provider listing produced on a device.
//!
//! The listing is free-form text containing one block:
//!
//! ```text
//! BEGIN ALGORITHM LIST
//! Cipher AES/CBC/PKCS5Padding
//! MessageDigest SHA-256
//! END ALGORITHM LIST
//! ```
//!
//! Anything outside the block is ignored. Lines for categories that are not
//! tracked are dropped; every other line must be exactly two tokens.

use crate::categories;
use crate::error::SnapshotError;
use crate::names::normalize_name;
use std::collections::BTreeMap;
use std::io::BufRead;
use tracing::debug;

pub const BEGIN_SENTINEL: &str = "BEGIN ALGORITHM LIST";
pub const END_SENTINEL: &str = "END ALGORITHM LIST";

/// Category name to normalized algorithm names, in listing order. Duplicates
/// are kept.
pub type Observations = BTreeMap<String, Vec<String>>;

/// Normalized algorithm name to the last spelling seen in the listing.
pub type DisplayNames = BTreeMap<String, String>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub categories: Observations,
    pub display_names: DisplayNames,
}

pub fn parse_snapshot(text: &str) -> Result<Snapshot, SnapshotError> {
    read_snapshot(text.as_bytes())
}

pub fn read_snapshot<R: BufRead>(reader: R) -> Result<Snapshot, SnapshotError> {
    let mut snapshot = Snapshot::default();
    let mut saw_begin = false;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if !saw_begin {
            saw_begin = line == BEGIN_SENTINEL;
            continue;
        }
        if line == END_SENTINEL {
            return Ok(snapshot);
        }

        let mut tokens = line.split_whitespace();
        let (Some(category), Some(algorithm), None) = (tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(SnapshotError::MalformedLine {
                line_number: idx + 1,
                line: line.to_string(),
            });
        };
        if !categories::is_supported(category) {
            debug!(category, algorithm, "dropping untracked category");
            continue;
        }
        let normalized = normalize_name(algorithm);
        snapshot
            .categories
            .entry(category.to_string())
            .or_default()
            .push(normalized.clone());
        snapshot
            .display_names
            .insert(normalized, algorithm.to_string());
    }

    if saw_begin {
        Err(SnapshotError::MissingEnd)
    } else {
        Err(SnapshotError::MissingBegin)
    }
}
