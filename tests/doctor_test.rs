//! Integration tests for `wheelwright doctor`

mod common;

use common::TestProject;
use std::process::Command;

/// Helper to run wheelwright doctor
fn run_doctor(project: &TestProject, args: &[&str]) -> std::process::Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_wheelwright"));
    cmd.current_dir(project.path());
    cmd.arg("doctor");
    for arg in args {
        cmd.arg(arg);
    }
    cmd.output().expect("Failed to execute wheelwright doctor")
}

#[test]
fn test_doctor_fails_without_python() {
    let project = TestProject::new();
    let output = run_doctor(&project, &["--python", "definitely-not-a-real-python"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        !output.status.success(),
        "doctor must fail when the interpreter is missing"
    );
    assert!(
        stdout.contains("Python interpreter") || stderr.contains("prerequisites"),
        "stdout={stdout}, stderr={stderr}"
    );
}

#[test]
fn test_doctor_json_reports_status() {
    let project = TestProject::new();
    let output = run_doctor(
        &project,
        &["--json", "--python", "definitely-not-a-real-python"],
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    let report: serde_json::Value =
        serde_json::from_str(&stdout).expect("doctor --json should emit JSON");
    assert_eq!(report["status"], "error");
    assert!(report["checks"].as_array().unwrap().len() >= 3);
    assert!(report["available_cpus"].as_u64().unwrap() >= 1);
}

#[test]
fn test_doctor_checks_source_checkout() {
    let project = TestProject::new();
    let output = run_doctor(
        &project,
        &[
            "--json",
            "--python",
            "definitely-not-a-real-python",
            "--source-dir",
            project.path().to_str().unwrap(),
        ],
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let checks = report["checks"].as_array().unwrap();
    let checkout = checks
        .iter()
        .find(|c| c["name"] == "source checkout")
        .expect("source checkout check should run when --source-dir is given");
    assert_eq!(checkout["passed"], false);
}

#[test]
fn test_doctor_quiet_mode_only_reports_failures() {
    let project = TestProject::new();
    let output = run_doctor(
        &project,
        &["--quiet", "--python", "definitely-not-a-real-python"],
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(
        stdout.is_empty(),
        "quiet mode must not chat on stdout: {stdout}"
    );
    assert!(stderr.contains("Missing required"), "{stderr}");
}
