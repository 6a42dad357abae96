//! External build tool boundary
//!
//! Invokes the native build command inside the source checkout with
//! the bound toolchain environment, then requires exactly one wheel in
//! the conventional `dist/` output directory.
//!
//! There is no partial success: either a usable [`RawArtifact`] comes
//! back, or the pipeline halts. Failures are never retried; native
//! builds are not assumed safe to repeat blindly.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::defaults::DIST_SUBDIR;
use crate::core::wheel::{RawArtifact, WheelName};
use crate::error::BuildInvokeError;
use crate::infra::process;

/// A build command line split into program and arguments.
///
/// Splitting is on whitespace; the build command is configuration, not
/// a shell script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildCommand {
    /// Program to execute
    pub program: String,
    /// Arguments, in order
    pub args: Vec<String>,
}

impl BuildCommand {
    /// Parse a configured command line.
    pub fn parse(command_line: &str) -> Result<Self, BuildInvokeError> {
        let mut parts = command_line.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| BuildInvokeError::SpawnFailed {
                command: command_line.to_string(),
                error: "empty build command".to_string(),
            })?
            .to_string();
        Ok(Self {
            program,
            args: parts.map(String::from).collect(),
        })
    }
}

/// Run the external build and collect the produced wheel.
pub fn invoke_build(
    command_line: &str,
    source_dir: &Path,
    env: &HashMap<String, String>,
) -> Result<RawArtifact, BuildInvokeError> {
    let command = BuildCommand::parse(command_line)?;

    tracing::info!(
        "Running build command '{}' in {}",
        command_line,
        source_dir.display()
    );

    let output = process::run_command(&command.program, &command.args, Some(source_dir), env)
        .map_err(|e| BuildInvokeError::SpawnFailed {
            command: command_line.to_string(),
            error: e.to_string(),
        })?;

    if !output.success() {
        return Err(BuildInvokeError::ToolFailed {
            status: output.status_display(),
            stderr: output.stderr.trim_end().to_string(),
        });
    }

    let dist_dir = source_dir.join(DIST_SUBDIR);
    find_single_wheel(&dist_dir)
}

/// Require exactly one `*.whl` in the dist directory.
pub fn find_single_wheel(dist_dir: &Path) -> Result<RawArtifact, BuildInvokeError> {
    let entries = std::fs::read_dir(dist_dir).map_err(|_| BuildInvokeError::MissingArtifact {
        dir: dist_dir.to_path_buf(),
    })?;

    let mut wheels: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "whl"))
        .collect();

    match wheels.len() {
        0 => Err(BuildInvokeError::MissingArtifact {
            dir: dist_dir.to_path_buf(),
        }),
        1 => {
            let path = wheels.remove(0);
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default();
            let name = WheelName::parse(file_name).map_err(|_| {
                BuildInvokeError::UnrecognizedArtifact { path: path.clone() }
            })?;
            Ok(RawArtifact {
                original_version: name.version,
                path,
            })
        }
        count => Err(BuildInvokeError::AmbiguousArtifact {
            dir: dist_dir.to_path_buf(),
            count,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_build_command() {
        let command = BuildCommand::parse("python3 -m build --wheel").unwrap();
        assert_eq!(command.program, "python3");
        assert_eq!(command.args, vec!["-m", "build", "--wheel"]);
    }

    #[test]
    fn test_parse_rejects_empty_command() {
        assert!(BuildCommand::parse("   ").is_err());
    }

    #[test]
    fn test_find_single_wheel() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("demo-1.0-py3-none-any.whl"),
            b"wheel bytes",
        )
        .unwrap();

        let artifact = find_single_wheel(dir.path()).unwrap();
        assert_eq!(artifact.original_version, "1.0");
    }

    #[test]
    fn test_missing_dist_dir_is_missing_artifact() {
        let dir = TempDir::new().unwrap();
        let result = find_single_wheel(&dir.path().join("dist"));
        assert!(matches!(
            result,
            Err(BuildInvokeError::MissingArtifact { .. })
        ));
    }

    #[test]
    fn test_empty_dist_dir_is_missing_artifact() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("build.log"), "not a wheel").unwrap();
        let result = find_single_wheel(dir.path());
        assert!(matches!(
            result,
            Err(BuildInvokeError::MissingArtifact { .. })
        ));
    }

    #[test]
    fn test_two_wheels_are_ambiguous() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a-1.0-py3-none-any.whl"), b"a").unwrap();
        std::fs::write(dir.path().join("b-1.0-py3-none-any.whl"), b"b").unwrap();
        let result = find_single_wheel(dir.path());
        assert!(matches!(
            result,
            Err(BuildInvokeError::AmbiguousArtifact { count: 2, .. })
        ));
    }

    #[test]
    fn test_tool_failure_propagates_stderr() {
        let source = TempDir::new().unwrap();
        std::fs::write(source.path().join("fail.sh"), "echo boom >&2\nexit 2\n").unwrap();

        let result = invoke_build("sh fail.sh", source.path(), &HashMap::new());
        match result {
            Err(BuildInvokeError::ToolFailed { status, stderr }) => {
                assert_eq!(status, "exit code 2");
                assert!(stderr.contains("boom"));
            }
            other => panic!("expected ToolFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_successful_build_collects_wheel() {
        let source = TempDir::new().unwrap();
        std::fs::write(
            source.path().join("build.sh"),
            "mkdir -p dist\nprintf wheel > dist/demo-2.0-py3-none-any.whl\n",
        )
        .unwrap();

        let artifact = invoke_build("sh build.sh", source.path(), &HashMap::new()).unwrap();
        assert_eq!(artifact.original_version, "2.0");
        assert!(artifact.path.ends_with("dist/demo-2.0-py3-none-any.whl"));
    }
}
