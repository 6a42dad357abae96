//! Wheel version rewriting
//!
//! Rewrites a built wheel so its embedded version metadata and filename
//! carry the synthesized local version identifier. The wheel is a zip
//! archive; the rewrite renames the `.dist-info` directory, patches the
//! `Version:` field in `METADATA`, fixes up `RECORD` (paths plus the
//! recomputed hash/size of the patched `METADATA`), and writes the
//! result under the retagged filename.
//!
//! The original wheel is deleted only after the rewritten one is
//! confirmed on disk, so at most one copy of the package survives the
//! operation. A failed rewrite is fatal to the pipeline; an artifact
//! without provenance in its version would be ambiguous to consumers.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use sha2::{Digest, Sha256};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::core::version::LocalVersion;
use crate::core::wheel::{BuildArtifact, RawArtifact, WheelName};
use crate::error::RewriteError;

/// Rewrite a raw wheel in place, consuming it.
///
/// On success the returned [`BuildArtifact`] points at the retagged
/// wheel next to where the raw one used to be; the raw file is gone.
pub fn rewrite_wheel(
    raw: &RawArtifact,
    local: &LocalVersion,
) -> Result<BuildArtifact, RewriteError> {
    let file_name = raw
        .path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| RewriteError::InvalidWheelName {
            name: raw.path.display().to_string(),
        })?;
    let name = WheelName::parse(file_name)?;
    let retagged = name.retag(local)?;

    let old_prefix = format!("{}/", name.dist_info_dir());
    let new_prefix = format!("{}/", retagged.dist_info_dir());
    let metadata_entry = format!("{old_prefix}METADATA");
    let record_entry = format!("{old_prefix}RECORD");

    let reader = File::open(&raw.path).map_err(|e| io_error(&raw.path, &e))?;
    let mut archive = ZipArchive::new(BufReader::new(reader))
        .map_err(|e| archive_error(&raw.path, &e))?;

    // METADATA is patched up front so RECORD can carry its new hash,
    // whatever order the entries appear in.
    let patched_metadata = patch_archive_metadata(
        &mut archive,
        &raw.path,
        &metadata_entry,
        &retagged.version,
    )?
    .ok_or_else(|| RewriteError::MetadataMissing {
        wheel: raw.path.clone(),
        dist_info: name.dist_info_dir(),
    })?;
    let metadata_hash = record_hash(&patched_metadata);

    let final_path = raw.path.with_file_name(retagged.file_name());
    let tmp_path = raw.path.with_file_name(format!("{}.tmp", retagged.file_name()));

    let rewrite = RecordContext {
        old_prefix: &old_prefix,
        new_prefix: &new_prefix,
        metadata_entry: &metadata_entry,
        record_entry: &record_entry,
        patched_metadata: &patched_metadata,
        metadata_hash: &metadata_hash,
    };

    if let Err(error) = write_rewritten(&mut archive, &tmp_path, &rewrite) {
        let _ = fs::remove_file(&tmp_path);
        return Err(error);
    }

    fs::rename(&tmp_path, &final_path).map_err(|e| io_error(&final_path, &e))?;

    let valid = fs::metadata(&final_path).map(|m| m.len() > 0).unwrap_or(false);
    if !valid {
        let _ = fs::remove_file(&final_path);
        return Err(RewriteError::OutputMissing { path: final_path });
    }

    if final_path != raw.path {
        fs::remove_file(&raw.path).map_err(|e| io_error(&raw.path, &e))?;
    }

    Ok(BuildArtifact {
        path: final_path,
        local_version: local.clone(),
        original_version: name.version,
    })
}

struct RecordContext<'a> {
    old_prefix: &'a str,
    new_prefix: &'a str,
    metadata_entry: &'a str,
    record_entry: &'a str,
    patched_metadata: &'a [u8],
    metadata_hash: &'a str,
}

/// First pass: locate METADATA and return its patched bytes.
fn patch_archive_metadata<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    wheel_path: &Path,
    metadata_entry: &str,
    new_version: &str,
) -> Result<Option<Vec<u8>>, RewriteError> {
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| archive_error(wheel_path, &e))?;
        if entry.name() == metadata_entry {
            let mut content = String::new();
            entry
                .read_to_string(&mut content)
                .map_err(|e| io_error(wheel_path, &e))?;
            return Ok(Some(patch_metadata(&content, new_version).into_bytes()));
        }
    }
    Ok(None)
}

/// Second pass: stream every entry into the new archive under its
/// mapped name.
fn write_rewritten<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    out_path: &Path,
    ctx: &RecordContext<'_>,
) -> Result<(), RewriteError> {
    let out = File::create(out_path).map_err(|e| io_error(out_path, &e))?;
    let mut writer = ZipWriter::new(BufWriter::new(out));

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| archive_error(out_path, &e))?;
        let entry_name = entry.name().to_string();
        let mapped_name = map_entry_name(&entry_name, ctx.old_prefix, ctx.new_prefix);

        let mut options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated);
        if let Some(mode) = entry.unix_mode() {
            options = options.unix_permissions(mode);
        }

        if entry.is_dir() {
            writer
                .add_directory(mapped_name, options)
                .map_err(|e| archive_error(out_path, &e))?;
            continue;
        }

        writer
            .start_file(mapped_name, options)
            .map_err(|e| archive_error(out_path, &e))?;

        if entry_name == ctx.metadata_entry {
            writer
                .write_all(ctx.patched_metadata)
                .map_err(|e| io_error(out_path, &e))?;
        } else if entry_name == ctx.record_entry {
            let mut content = String::new();
            entry
                .read_to_string(&mut content)
                .map_err(|e| io_error(out_path, &e))?;
            let rewritten = rewrite_record(
                &content,
                ctx.old_prefix,
                ctx.new_prefix,
                &format!("{}METADATA", ctx.new_prefix),
                ctx.metadata_hash,
                ctx.patched_metadata.len(),
            );
            writer
                .write_all(rewritten.as_bytes())
                .map_err(|e| io_error(out_path, &e))?;
        } else {
            io::copy(&mut entry, &mut writer).map_err(|e| io_error(out_path, &e))?;
        }
    }

    let mut inner = writer.finish().map_err(|e| archive_error(out_path, &e))?;
    inner.flush().map_err(|e| io_error(out_path, &e))?;
    Ok(())
}

/// Replace the dist-info prefix on archive entry names.
fn map_entry_name(name: &str, old_prefix: &str, new_prefix: &str) -> String {
    name.strip_prefix(old_prefix)
        .map(|rest| format!("{new_prefix}{rest}"))
        .unwrap_or_else(|| name.to_string())
}

/// Patch the `Version:` header in METADATA content.
///
/// Only the header block is touched; a `Version:` string in the
/// long description body stays as-is.
pub fn patch_metadata(content: &str, new_version: &str) -> String {
    let mut patched = Vec::new();
    let mut replaced = false;
    for line in content.lines() {
        if !replaced && line.starts_with("Version:") {
            patched.push(format!("Version: {new_version}"));
            replaced = true;
        } else {
            patched.push(line.to_string());
        }
    }
    let mut result = patched.join("\n");
    if content.ends_with('\n') {
        result.push('\n');
    }
    result
}

/// Rewrite RECORD: rename dist-info paths and refresh the patched
/// METADATA entry's hash and size.
///
/// RECORD lines are `path,hash,size`; the RECORD entry itself carries
/// empty hash and size fields.
pub fn rewrite_record(
    content: &str,
    old_prefix: &str,
    new_prefix: &str,
    metadata_path: &str,
    metadata_hash: &str,
    metadata_len: usize,
) -> String {
    let mut lines = Vec::new();
    for line in content.lines() {
        if line.is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut fields = line.rsplitn(3, ',');
        let size = fields.next();
        let hash = fields.next();
        let path = fields.next();
        let (Some(size), Some(hash), Some(path)) = (size, hash, path) else {
            lines.push(line.to_string());
            continue;
        };

        let mapped_path = map_entry_name(path, old_prefix, new_prefix);
        if mapped_path == metadata_path {
            lines.push(format!("{mapped_path},{metadata_hash},{metadata_len}"));
        } else {
            lines.push(format!("{mapped_path},{hash},{size}"));
        }
    }
    let mut result = lines.join("\n");
    if content.ends_with('\n') {
        result.push('\n');
    }
    result
}

/// Hash a file's bytes the way RECORD expects: sha256, urlsafe base64,
/// no padding.
pub fn record_hash(bytes: &[u8]) -> String {
    format!("sha256={}", URL_SAFE_NO_PAD.encode(Sha256::digest(bytes)))
}

fn io_error(path: &Path, error: &impl std::fmt::Display) -> RewriteError {
    RewriteError::Io {
        path: path.to_path_buf(),
        error: error.to_string(),
    }
}

fn archive_error(path: &Path, error: &impl std::fmt::Display) -> RewriteError {
    RewriteError::Archive {
        path: path.to_path_buf(),
        error: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_metadata_replaces_version_header() {
        let metadata = "Metadata-Version: 2.1\nName: flash-attn\nVersion: 2.8.0\nSummary: x\n";
        let patched = patch_metadata(metadata, "2.8.0+local.tag");
        assert!(patched.contains("Version: 2.8.0+local.tag\n"));
        assert!(!patched.contains("Version: 2.8.0\n"));
    }

    #[test]
    fn test_patch_metadata_only_touches_first_version_line() {
        let metadata = "Version: 1.0\nDescription: says Version: 1.0 here\n";
        let patched = patch_metadata(metadata, "1.0+tag");
        assert!(patched.contains("Version: 1.0+tag\n"));
        assert!(patched.contains("says Version: 1.0 here"));
    }

    #[test]
    fn test_rewrite_record_renames_and_rehashes() {
        let record = "pkg/__init__.py,sha256=abc,10\n\
                      pkg-1.0.dist-info/METADATA,sha256=old,50\n\
                      pkg-1.0.dist-info/RECORD,,\n";
        let rewritten = rewrite_record(
            record,
            "pkg-1.0.dist-info/",
            "pkg-1.0+tag.dist-info/",
            "pkg-1.0+tag.dist-info/METADATA",
            "sha256=new",
            64,
        );
        assert!(rewritten.contains("pkg/__init__.py,sha256=abc,10"));
        assert!(rewritten.contains("pkg-1.0+tag.dist-info/METADATA,sha256=new,64"));
        assert!(rewritten.contains("pkg-1.0+tag.dist-info/RECORD,,"));
        assert!(!rewritten.contains("pkg-1.0.dist-info"));
    }

    #[test]
    fn test_record_hash_shape() {
        let hash = record_hash(b"hello");
        let digest = hash.strip_prefix("sha256=").expect("sha256= prefix");
        // urlsafe alphabet, no padding
        assert!(!digest.contains('='));
        assert!(!digest.contains('+'));
        assert!(!digest.contains('/'));
        assert_eq!(digest.len(), 43);
    }

    #[test]
    fn test_map_entry_name() {
        assert_eq!(
            map_entry_name("pkg-1.0.dist-info/WHEEL", "pkg-1.0.dist-info/", "pkg-2.0.dist-info/"),
            "pkg-2.0.dist-info/WHEEL"
        );
        assert_eq!(
            map_entry_name("pkg/code.py", "pkg-1.0.dist-info/", "pkg-2.0.dist-info/"),
            "pkg/code.py"
        );
    }
}
