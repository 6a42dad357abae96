//! Toolchain environment binding
//!
//! Maps a resolved [`BuildRequest`] onto the environment the external
//! build tool expects: CUDA install root, augmented search paths,
//! parallelism, and the force-rebuild flag.
//!
//! The environment is a plain value object. It is rendered into a map
//! and handed to the subprocess boundary; the parent process
//! environment is never mutated, so the pipeline stays re-entrant and
//! testable.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::config::defaults::{CUDA_ROOT_TEMPLATE, DEFAULT_ARCH_LIST};
use crate::core::request::BuildRequest;
use crate::error::EnvError;

/// Environment for one invocation of the external build tool.
///
/// `force_build` is always set: cached or incremental builds are never
/// trusted for a version-stamped release artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolchainEnvironment {
    /// CUDA toolkit install root (e.g. `/usr/local/cuda-12.8`)
    pub cuda_home: PathBuf,
    /// Executable search path with `<cuda_home>/bin` prepended
    pub path: String,
    /// Library search path with `<cuda_home>/lib64` prepended
    pub ld_library_path: String,
    /// Parallelism hint for the build tool
    pub max_jobs: usize,
    /// Force a full rebuild, never reuse cached objects
    pub force_build: bool,
    /// GPU architectures handed to the device compiler
    pub arch_list: String,
    /// Additional environment variables
    pub extra_env: HashMap<String, String>,
}

impl ToolchainEnvironment {
    /// Bind a request onto the toolchain layout, augmenting the
    /// inherited search paths.
    ///
    /// `inherited_path` and `inherited_ld_path` are the values the
    /// current process sees; passing them explicitly keeps this
    /// function pure.
    pub fn bind(
        request: &BuildRequest,
        inherited_path: &str,
        inherited_ld_path: &str,
    ) -> Self {
        let cuda_home = PathBuf::from(
            CUDA_ROOT_TEMPLATE.replace("{version}", &request.toolkit_version),
        );
        let bin_dir = cuda_home.join("bin");
        let lib_dir = cuda_home.join("lib64");

        Self {
            path: prepend_path(&bin_dir.display().to_string(), inherited_path),
            ld_library_path: prepend_path(&lib_dir.display().to_string(), inherited_ld_path),
            cuda_home,
            max_jobs: request.max_parallel_jobs,
            force_build: true,
            arch_list: DEFAULT_ARCH_LIST.to_string(),
            extra_env: HashMap::new(),
        }
    }

    /// Override the GPU architecture list
    #[must_use]
    pub fn with_arch_list(mut self, arch_list: &str) -> Self {
        self.arch_list = arch_list.to_string();
        self
    }

    /// Add an extra environment variable
    #[must_use]
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.extra_env.insert(key.to_string(), value.to_string());
        self
    }

    /// Render to the variable map consumed by the subprocess boundary.
    pub fn to_env_map(&self) -> HashMap<String, String> {
        let mut env = HashMap::new();

        env.insert("CUDA_HOME".to_string(), self.cuda_home.display().to_string());
        env.insert("PATH".to_string(), self.path.clone());
        env.insert("LD_LIBRARY_PATH".to_string(), self.ld_library_path.clone());
        env.insert("MAX_JOBS".to_string(), self.max_jobs.to_string());
        env.insert(
            "FORCE_BUILD".to_string(),
            if self.force_build { "TRUE" } else { "FALSE" }.to_string(),
        );
        env.insert("TORCH_CUDA_ARCH_LIST".to_string(), self.arch_list.clone());

        for (key, value) in &self.extra_env {
            env.insert(key.clone(), value.clone());
        }

        env
    }

    /// Check internal consistency.
    ///
    /// A wrong toolkit root is not detectable here and only fails in
    /// the external build.
    pub fn validate(&self) -> Result<(), EnvError> {
        if self.cuda_home.as_os_str().is_empty() {
            return Err(EnvError::MissingVariable {
                variable: "CUDA_HOME".to_string(),
            });
        }
        if self.max_jobs == 0 {
            return Err(EnvError::InvalidValue {
                variable: "MAX_JOBS".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

/// Prepend `entry` to a `:`-separated search path, skipping the
/// separator when the inherited path is empty.
fn prepend_path(entry: &str, inherited: &str) -> String {
    if inherited.is_empty() {
        entry.to_string()
    } else {
        format!("{entry}:{inherited}")
    }
}
