//! Subprocess execution
//!
//! The single place where external processes are launched. Callers
//! hand in an explicit environment map; the parent process environment
//! is inherited underneath it but never mutated.

use std::collections::HashMap;
use std::io;
use std::path::Path;
use std::process::Command;

/// Captured result of a finished subprocess.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Exit code, if the process exited normally
    pub status_code: Option<i32>,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl ProcessOutput {
    /// Whether the process exited zero.
    pub fn success(&self) -> bool {
        self.status_code == Some(0)
    }

    /// Human-readable exit status for diagnostics.
    pub fn status_display(&self) -> String {
        match self.status_code {
            Some(code) => format!("exit code {code}"),
            None => "termination by signal".to_string(),
        }
    }
}

/// Run a command to completion, capturing its output.
///
/// `env` entries override inherited variables of the same name; all
/// other inherited variables pass through.
pub fn run_command(
    program: &str,
    args: &[String],
    cwd: Option<&Path>,
    env: &HashMap<String, String>,
) -> io::Result<ProcessOutput> {
    let mut command = Command::new(program);
    command.args(args).envs(env);
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    let output = command.output()?;
    Ok(ProcessOutput {
        status_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}
