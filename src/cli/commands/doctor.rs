//! CLI command for `wheelwright doctor`
//!
//! Runs the preflight checks and reports issues with suggestions.

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::cli::output::{is_json, is_quiet, print_detail, print_info, print_success, status};
use crate::config::defaults::{DEFAULT_PYTHON, DEFAULT_TOOLKIT_VERSION};
use crate::core::doctor::run_doctor;

/// Doctor options
pub struct DoctorOptions {
    /// Python executable to check
    pub python: Option<String>,
    /// CUDA toolkit version to look for
    pub cuda: Option<String>,
    /// Source checkout to inspect
    pub source_dir: Option<PathBuf>,
}

/// Execute the doctor command
pub async fn execute(_project_dir: &Path, options: DoctorOptions) -> Result<()> {
    let python = options.python.as_deref().unwrap_or(DEFAULT_PYTHON);
    let toolkit = options.cuda.as_deref().unwrap_or(DEFAULT_TOOLKIT_VERSION);

    let report = run_doctor(python, toolkit, options.source_dir.as_deref());

    if is_json() {
        let json_result = serde_json::json!({
            "status": if report.all_passed() {
                "success"
            } else if report.all_required_passed() {
                "warning"
            } else {
                "error"
            },
            "checks": report.checks.iter().map(|c| serde_json::json!({
                "name": c.name,
                "passed": c.passed,
                "required": c.required,
                "version": c.version,
                "error": c.error,
                "suggestion": c.suggestion
            })).collect::<Vec<_>>(),
            "available_cpus": report.available_cpus,
            "passed_count": report.passed_count(),
            "total_count": report.checks.len()
        });
        println!("{}", serde_json::to_string_pretty(&json_result)?);

        if !report.all_required_passed() {
            anyhow::bail!("Missing required build prerequisites");
        }
        return Ok(());
    }

    if is_quiet() {
        let failed_required = report.failed_required();
        if !failed_required.is_empty() {
            for check in failed_required {
                eprintln!("{} Missing required: {}", status::ERROR, check.name);
            }
            anyhow::bail!("Missing required build prerequisites");
        }
        return Ok(());
    }

    print_info("Checking build prerequisites...");
    println!();

    for check in &report.checks {
        let version_str = check
            .version
            .as_ref()
            .map(|v| format!(" ({v})"))
            .unwrap_or_default();
        let required_str = if check.required { "" } else { " [optional]" };

        if check.passed {
            println!(
                "  {} {}{version_str}{required_str}",
                status::SUCCESS,
                check.name
            );
        } else {
            println!("  {} {}{required_str}", status::ERROR, check.name);
            if let Some(error) = &check.error {
                print_detail(&format!("Error: {error}"));
            }
            if let Some(suggestion) = &check.suggestion {
                print_detail(&format!("Suggestion: {suggestion}"));
            }
        }
    }

    println!();
    print_detail(&format!(
        "{} CPUs available for MAX_JOBS",
        report.available_cpus
    ));

    let passed = report.passed_count();
    let total = report.checks.len();

    if report.all_passed() {
        print_success(&format!("All checks passed ({passed}/{total})"));
    } else if report.all_required_passed() {
        println!(
            "{} {passed}/{total} checks passed (optional prerequisites missing)",
            status::WARNING
        );
    } else {
        println!("{} {passed}/{total} checks passed", status::ERROR);
        print_detail("Install the missing required prerequisites:");
        for check in &report.failed_required() {
            if let Some(suggestion) = &check.suggestion {
                print_detail(&format!("• {}: {suggestion}", check.name));
            }
        }
        anyhow::bail!("Missing required build prerequisites. Run 'wheelwright doctor' for details.");
    }

    Ok(())
}
