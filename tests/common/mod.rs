//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests:
//! temp project directories, wheel fixtures, and fake build tools.

use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Test project context
///
/// Creates a temporary directory for test projects and provides
/// utilities for setting up build scenarios.
pub struct TestProject {
    /// Temporary directory for the test project
    pub dir: TempDir,
}

impl TestProject {
    /// Create a new test project in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the test project directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Create a file in the test project
    #[allow(dead_code)]
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Create an executable script in the test project
    #[allow(dead_code)]
    pub fn create_script(&self, name: &str, body: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("Failed to write script");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to set script permissions");
        path
    }

    /// Check if a file exists in the test project
    #[allow(dead_code)]
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Read a file from the test project
    #[allow(dead_code)]
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(name)).expect("Failed to read file")
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// METADATA content used in wheel fixtures
#[allow(dead_code)]
pub fn sample_metadata(distribution: &str, version: &str) -> String {
    format!(
        "Metadata-Version: 2.1\nName: {}\nVersion: {version}\nSummary: A test extension\n",
        distribution.replace('_', "-")
    )
}

/// Write a minimal but structurally valid wheel archive.
///
/// Contains a payload module, METADATA, WHEEL, and RECORD under the
/// conventional dist-info layout.
#[allow(dead_code)]
pub fn write_test_wheel(path: &Path, distribution: &str, version: &str) {
    let dist_info = format!("{distribution}-{version}.dist-info");
    let file = std::fs::File::create(path).expect("Failed to create wheel file");
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    writer
        .start_file(format!("{distribution}/__init__.py"), options)
        .unwrap();
    writer.write_all(b"__all__ = []\n").unwrap();

    writer
        .start_file(format!("{dist_info}/METADATA"), options)
        .unwrap();
    writer
        .write_all(sample_metadata(distribution, version).as_bytes())
        .unwrap();

    writer
        .start_file(format!("{dist_info}/WHEEL"), options)
        .unwrap();
    writer
        .write_all(b"Wheel-Version: 1.0\nGenerator: test\nRoot-Is-Purelib: false\nTag: py3-none-any\n")
        .unwrap();

    writer
        .start_file(format!("{dist_info}/RECORD"), options)
        .unwrap();
    let record = format!(
        "{distribution}/__init__.py,sha256=stub,14\n\
         {dist_info}/METADATA,sha256=stub,0\n\
         {dist_info}/WHEEL,sha256=stub,0\n\
         {dist_info}/RECORD,,\n"
    );
    writer.write_all(record.as_bytes()).unwrap();

    writer.finish().unwrap();
}

/// Create a fixture wheel plus a build script that "produces" it.
///
/// Returns the build command to pass via `--build-command`.
#[allow(dead_code)]
pub fn fake_builder(project: &TestProject, distribution: &str, version: &str) -> String {
    let fixture = project.path().join("fixture.whl");
    write_test_wheel(&fixture, distribution, version);

    let wheel_name = format!("{distribution}-{version}-py3-none-any.whl");
    project.create_script(
        "fake-build.sh",
        &format!(
            "mkdir -p dist\ncp {} dist/{wheel_name}",
            fixture.display()
        ),
    );
    "sh fake-build.sh".to_string()
}

/// Create a fake python interpreter that reports the given ABI token.
#[allow(dead_code)]
pub fn fake_python(project: &TestProject, token: &str) -> String {
    project
        .create_script("fake-python.sh", &format!("echo {token}"))
        .display()
        .to_string()
}
