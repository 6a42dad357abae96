//! Build parameter resolution
//!
//! Normalizes the caller-supplied toolkit version, framework version,
//! and parallelism into an immutable [`BuildRequest`]. Omitted inputs
//! fall back to fixed defaults; semantic validity (does this toolkit
//! release exist?) is not checked here and surfaces as a build failure
//! downstream.

use crate::config::defaults::{
    DEFAULT_BUILD_JOBS, DEFAULT_FRAMEWORK_VERSION, DEFAULT_TOOLKIT_VERSION,
};
use crate::error::RequestError;

/// Known-bad toolkit/framework pairs.
///
/// Keyed by framework `major.minor`; the value is the highest toolkit
/// version that framework builds against.
const COMPATIBILITY_CAPS: &[(&str, &str)] = &[("2.8", "12.9")];

/// Resolved, immutable build parameters.
///
/// Constant for the duration of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    /// CUDA toolkit version, dotted (e.g. "12.8")
    pub toolkit_version: String,
    /// torch framework version, dotted (e.g. "2.8.0")
    pub framework_version: String,
    /// Parallelism hint for the external build tool
    pub max_parallel_jobs: usize,
}

impl BuildRequest {
    /// Resolve a request from optional textual inputs.
    ///
    /// Any omitted input takes its documented default. The job count
    /// must parse as a positive integer; versions are passed through
    /// untouched.
    pub fn resolve(
        toolkit_version: Option<&str>,
        framework_version: Option<&str>,
        max_parallel_jobs: Option<&str>,
    ) -> Result<Self, RequestError> {
        let jobs = match max_parallel_jobs {
            None => DEFAULT_BUILD_JOBS,
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| RequestError::InvalidJobs {
                    value: raw.to_string(),
                })?,
        };

        Ok(Self {
            toolkit_version: toolkit_version.unwrap_or(DEFAULT_TOOLKIT_VERSION).to_string(),
            framework_version: framework_version
                .unwrap_or(DEFAULT_FRAMEWORK_VERSION)
                .to_string(),
            max_parallel_jobs: jobs,
        })
    }

    /// Reject toolkit/framework pairs that are known not to build.
    ///
    /// The cap table only names upper bounds; unknown framework lines
    /// pass unchecked and fail (or not) in the external build.
    pub fn check_supported(&self) -> Result<(), RequestError> {
        let framework_line = major_minor(&self.framework_version);
        for (line, max_toolkit) in COMPATIBILITY_CAPS {
            if framework_line == *line
                && version_tuple(&self.toolkit_version)? > version_tuple(max_toolkit)?
            {
                return Err(RequestError::UnsupportedCombination {
                    toolkit: self.toolkit_version.clone(),
                    framework: self.framework_version.clone(),
                    max_toolkit: (*max_toolkit).to_string(),
                });
            }
        }
        Ok(())
    }
}

/// First two components of a dotted version ("2.8.0" -> "2.8").
fn major_minor(version: &str) -> String {
    version.split('.').take(2).collect::<Vec<_>>().join(".")
}

/// Parse a dotted version into a comparable tuple of integers.
fn version_tuple(version: &str) -> Result<Vec<u32>, RequestError> {
    version
        .split('.')
        .map(|part| {
            part.parse::<u32>().map_err(|_| RequestError::InvalidVersion {
                version: version.to_string(),
            })
        })
        .collect()
}
