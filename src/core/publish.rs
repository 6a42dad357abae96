//! Artifact publication
//!
//! Copies the final wheel into the well-known output directory and
//! renders the run's structured facts for the invoking automation.
//!
//! Publication is idempotent: re-running with the same artifact
//! overwrites the same file in the same location.

use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::core::wheel::BuildArtifact;
use crate::error::PublishError;

/// Externally observable result of a pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct OutputManifest {
    /// Whether the pipeline reached publication
    pub success: bool,
    /// Final location of the published wheel
    pub artifact_path: PathBuf,
    /// Filename of the published wheel
    pub artifact_filename: String,
    /// Hex sha256 of the published wheel
    pub artifact_sha256: String,
}

impl OutputManifest {
    /// Render as `key=value` lines for an environment-style sink.
    pub fn render_env(&self) -> String {
        format!(
            "build_success={}\nartifact_path={}\nartifact_filename={}\nartifact_sha256={}\n",
            self.success,
            self.artifact_path.display(),
            self.artifact_filename,
            self.artifact_sha256,
        )
    }

    /// Append the facts to an outputs file (created if absent).
    ///
    /// Appending matches how CI output files accumulate across steps.
    pub fn append_to(&self, path: &Path) -> Result<(), PublishError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| PublishError::OutputsWrite {
                path: path.to_path_buf(),
                error: e.to_string(),
            })?;
        file.write_all(self.render_env().as_bytes())
            .map_err(|e| PublishError::OutputsWrite {
                path: path.to_path_buf(),
                error: e.to_string(),
            })
    }
}

/// Copy the final wheel into `output_dir`, overwriting any existing
/// file of the same name, and report the published facts.
pub fn publish(
    artifact: &BuildArtifact,
    output_dir: &Path,
) -> Result<OutputManifest, PublishError> {
    std::fs::create_dir_all(output_dir).map_err(|e| PublishError::CreateDir {
        path: output_dir.to_path_buf(),
        error: e.to_string(),
    })?;

    let artifact_filename = artifact.file_name();
    let dest = output_dir.join(&artifact_filename);

    std::fs::copy(&artifact.path, &dest).map_err(|e| PublishError::CopyFailed {
        from: artifact.path.clone(),
        to: dest.clone(),
        error: e.to_string(),
    })?;

    let artifact_sha256 = sha256_file(&dest)?;

    tracing::info!("Published {} to {}", artifact_filename, dest.display());

    Ok(OutputManifest {
        success: true,
        artifact_path: dest,
        artifact_filename,
        artifact_sha256,
    })
}

/// Hex sha256 of a file's contents.
fn sha256_file(path: &Path) -> Result<String, PublishError> {
    let mut file = File::open(path).map_err(|e| PublishError::ChecksumFailed {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let read = file
            .read(&mut buffer)
            .map_err(|e| PublishError::ChecksumFailed {
                path: path.to_path_buf(),
                error: e.to_string(),
            })?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(hex::encode(hasher.finalize()))
}
