//! Source revision capture
//!
//! Reads the short revision hash out of the source checkout using the
//! gix crate. The hash is captured from the exact working directory
//! handed to the build invocation, immediately before the build
//! launches, so the recorded provenance always describes the tree that
//! produced the artifact.

use std::path::Path;

use crate::error::RevisionError;

/// Length of the short revision hash embedded in the local version.
pub const SHORT_HASH_LEN: usize = 6;

/// Resolve HEAD of the source checkout to a 6-hex-char hash.
pub fn short_revision(source_dir: &Path) -> Result<String, RevisionError> {
    let repo = gix::open(source_dir).map_err(|e| RevisionError::NotARepository {
        path: source_dir.to_path_buf(),
        error: e.to_string(),
    })?;
    let head = repo.head_id().map_err(|e| RevisionError::HeadUnresolved {
        path: source_dir.to_path_buf(),
        error: e.to_string(),
    })?;
    Ok(head.to_hex_with_len(SHORT_HASH_LEN).to_string())
}

/// Validate a caller-supplied revision override.
///
/// Automation that pinned the checkout itself may pass the hash
/// instead of having it re-read; it still has to look like one.
pub fn validate_revision(revision: &str) -> Result<String, RevisionError> {
    let trimmed = revision.trim();
    if trimmed.len() >= SHORT_HASH_LEN && trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(trimmed[..SHORT_HASH_LEN].to_ascii_lowercase())
    } else {
        Err(RevisionError::InvalidRevision {
            revision: revision.to_string(),
        })
    }
}
