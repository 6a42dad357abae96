//! Doctor command logic
//!
//! Preflight checks for the build pipeline: python toolchain, wheel
//! build backend, framework import, CUDA toolkit root. Reports issues
//! with suggestions instead of failing mid-build.

use std::path::{Path, PathBuf};

use crate::config::defaults::CUDA_ROOT_TEMPLATE;

/// Result of a single prerequisite check
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Name of the prerequisite being checked
    pub name: String,
    /// Whether the check passed
    pub passed: bool,
    /// Version if available
    pub version: Option<String>,
    /// Error message if check failed
    pub error: Option<String>,
    /// Suggestion for fixing the issue
    pub suggestion: Option<String>,
    /// Whether this prerequisite is required for a build to succeed
    pub required: bool,
}

impl CheckResult {
    /// Create a passing check result
    pub fn pass(name: &str, version: Option<String>, required: bool) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            version,
            error: None,
            suggestion: None,
            required,
        }
    }

    /// Create a failing check result
    pub fn fail(name: &str, error: &str, suggestion: Option<&str>, required: bool) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            version: None,
            error: Some(error.to_string()),
            suggestion: suggestion.map(String::from),
            required,
        }
    }
}

/// Overall doctor report
#[derive(Debug, Default)]
pub struct DoctorReport {
    /// Individual check results
    pub checks: Vec<CheckResult>,
    /// CPU count available for MAX_JOBS
    pub available_cpus: usize,
}

impl DoctorReport {
    /// Check if all required checks passed
    pub fn all_required_passed(&self) -> bool {
        self.checks.iter().filter(|c| c.required).all(|c| c.passed)
    }

    /// Check if every check passed
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    /// Count passed checks
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    /// Get all failed required checks
    pub fn failed_required(&self) -> Vec<&CheckResult> {
        self.checks
            .iter()
            .filter(|c| c.required && !c.passed)
            .collect()
    }
}

/// Run `<command> --version` and extract a dotted version from its output
fn command_version(command: &str, args: &[&str]) -> Option<String> {
    let output = std::process::Command::new(command)
        .args(args)
        .arg("--version")
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let combined = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    extract_version(&combined)
}

/// Extract a version string like "3.12.1" from command output
fn extract_version(output: &str) -> Option<String> {
    let version_regex = regex::Regex::new(r"v?(\d+\.\d+(?:\.\d+)?(?:-\w+)?)").ok()?;
    version_regex
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Check that the python executable exists and runs
pub fn check_python(python: &str) -> CheckResult {
    if which::which(python).is_err() {
        return CheckResult::fail(
            "Python interpreter",
            &format!("'{python}' not found in PATH"),
            Some("Install Python 3 or pass --python with the interpreter to use"),
            true,
        );
    }
    match command_version(python, &[]) {
        Some(version) => CheckResult::pass("Python interpreter", Some(version), true),
        None => CheckResult::fail(
            "Python interpreter",
            &format!("'{python}' did not report a version"),
            Some("Check that the interpreter is runnable"),
            true,
        ),
    }
}

/// Check that the wheel build backend is importable
pub fn check_build_backend(python: &str) -> CheckResult {
    match command_version(python, &["-m", "build"]) {
        Some(version) => CheckResult::pass("build backend (python -m build)", Some(version), true),
        None => CheckResult::fail(
            "build backend (python -m build)",
            "The 'build' module is not installed",
            Some("pip install build"),
            true,
        ),
    }
}

/// Check that the framework imports; the ABI flag degrades to FALSE
/// without it, so this is optional
pub fn check_framework(python: &str) -> CheckResult {
    let output = std::process::Command::new(python)
        .args(["-c", "import torch; print(torch.__version__)"])
        .output();
    match output {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
            CheckResult::pass(
                "torch framework",
                (!version.is_empty()).then_some(version),
                false,
            )
        }
        _ => CheckResult::fail(
            "torch framework",
            "torch is not importable; ABI flag will default to FALSE",
            Some("pip install torch matching your CUDA toolkit"),
            false,
        ),
    }
}

/// Check that the CUDA toolkit root for a toolkit version exists
pub fn check_toolkit_root(toolkit_version: &str) -> CheckResult {
    let root = PathBuf::from(CUDA_ROOT_TEMPLATE.replace("{version}", toolkit_version));
    if root.is_dir() {
        CheckResult::pass(
            &format!("CUDA toolkit {toolkit_version}"),
            Some(root.display().to_string()),
            false,
        )
    } else {
        CheckResult::fail(
            &format!("CUDA toolkit {toolkit_version}"),
            &format!("'{}' does not exist", root.display()),
            Some("Install the CUDA toolkit or pass --cuda with an installed version"),
            false,
        )
    }
}

/// Check that the source checkout looks like a git repository
pub fn check_source_checkout(source_dir: &Path) -> CheckResult {
    if source_dir.join(".git").exists() {
        CheckResult::pass("source checkout", Some(source_dir.display().to_string()), true)
    } else {
        CheckResult::fail(
            "source checkout",
            &format!("'{}' is not a git checkout", source_dir.display()),
            Some("Clone the extension sources first, or pass --revision explicitly"),
            true,
        )
    }
}

/// Run all doctor checks
pub fn run_doctor(python: &str, toolkit_version: &str, source_dir: Option<&Path>) -> DoctorReport {
    let mut report = DoctorReport {
        available_cpus: num_cpus::get(),
        ..DoctorReport::default()
    };

    report.checks.push(check_python(python));
    report.checks.push(check_build_backend(python));
    report.checks.push(check_framework(python));
    report.checks.push(check_toolkit_root(toolkit_version));
    if let Some(dir) = source_dir {
        report.checks.push(check_source_checkout(dir));
    }

    report
}
