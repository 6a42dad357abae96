//! Wheel naming grammar and artifact types
//!
//! Parses and re-renders the packaging ecosystem's wheel filename
//! grammar:
//!
//! ```text
//! {distribution}-{version}(-{build})?-{python}-{abi}-{platform}.whl
//! ```
//!
//! Distribution names are already filename-escaped (dashes replaced by
//! underscores), so every `-` in the name is a field separator.

use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;

use crate::core::version::{is_valid_local_segment, LocalVersion};
use crate::error::RewriteError;

fn wheel_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?P<dist>[A-Za-z0-9_.]+)-(?P<ver>[^-]+)(?:-(?P<build>\d[^-]*))?-(?P<py>[^-]+)-(?P<abi>[^-]+)-(?P<plat>[^-]+)\.whl$",
        )
        .expect("Invalid wheel name regex")
    })
}

/// Parsed wheel filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WheelName {
    /// Escaped distribution name (e.g. `flash_attn`)
    pub distribution: String,
    /// Package version, possibly with a local segment (`2.8.0+cu128...`)
    pub version: String,
    /// Optional build tag
    pub build_tag: Option<String>,
    /// Python tag (e.g. `cp312`)
    pub python_tag: String,
    /// ABI tag (e.g. `cp312`, `abi3`)
    pub abi_tag: String,
    /// Platform tag (e.g. `linux_x86_64`)
    pub platform_tag: String,
}

impl WheelName {
    /// Parse a wheel filename.
    pub fn parse(name: &str) -> Result<Self, RewriteError> {
        let captures =
            wheel_name_regex()
                .captures(name)
                .ok_or_else(|| RewriteError::InvalidWheelName {
                    name: name.to_string(),
                })?;

        Ok(Self {
            distribution: captures["dist"].to_string(),
            version: captures["ver"].to_string(),
            build_tag: captures.name("build").map(|m| m.as_str().to_string()),
            python_tag: captures["py"].to_string(),
            abi_tag: captures["abi"].to_string(),
            platform_tag: captures["plat"].to_string(),
        })
    }

    /// Render back to a filename.
    pub fn file_name(&self) -> String {
        let build = self
            .build_tag
            .as_ref()
            .map(|b| format!("-{b}"))
            .unwrap_or_default();
        format!(
            "{}-{}{build}-{}-{}-{}.whl",
            self.distribution, self.version, self.python_tag, self.abi_tag, self.platform_tag
        )
    }

    /// The `.dist-info` directory name this wheel carries.
    pub fn dist_info_dir(&self) -> String {
        format!("{}-{}.dist-info", self.distribution, self.version)
    }

    /// Base version without any local segment.
    pub fn base_version(&self) -> &str {
        self.version.split('+').next().unwrap_or(&self.version)
    }

    /// Return a copy retagged with a local version segment.
    ///
    /// An existing local segment is replaced, never stacked. The
    /// identifier must stay within `[A-Za-z0-9.]`.
    pub fn retag(&self, local: &LocalVersion) -> Result<Self, RewriteError> {
        let identifier = local.to_string();
        if !is_valid_local_segment(&identifier) {
            let offending = identifier
                .chars()
                .find(|c| !c.is_ascii_alphanumeric() && *c != '.')
                .unwrap_or('?');
            return Err(RewriteError::InvalidLocalVersion {
                identifier,
                offending,
            });
        }

        let mut retagged = self.clone();
        retagged.version = format!("{}+{identifier}", self.base_version());
        Ok(retagged)
    }
}

/// The wheel exactly as the external build tool produced it.
///
/// Lives from the moment the build succeeds until the rewriter
/// consumes (and deletes) it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawArtifact {
    /// Path of the wheel inside the build's dist directory
    pub path: PathBuf,
    /// Version parsed from the produced filename
    pub original_version: String,
}

/// The final, retagged wheel.
///
/// Once this exists, the raw artifact is gone; at most one copy of the
/// package remains on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildArtifact {
    /// Path of the rewritten wheel
    pub path: PathBuf,
    /// The provenance identifier embedded in its version
    pub local_version: LocalVersion,
    /// Version the build tool originally stamped
    pub original_version: String,
}

impl BuildArtifact {
    /// Final filename of the rewritten wheel.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
