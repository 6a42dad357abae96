//! Project configuration (wheelwright.toml) parsing
//!
//! An optional per-project file overriding the built-in defaults.
//! Precedence, lowest to highest: compile-time defaults, config file,
//! CLI flags.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::defaults::{
    DEFAULT_BUILD_COMMAND, DEFAULT_OUTPUT_DIR, DEFAULT_PYTHON, PROJECT_CONFIG_FILE,
};
use crate::error::ConfigError;

/// The project configuration file (wheelwright.toml).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectConfig {
    /// Source checkout to build in; defaults to the current directory
    #[serde(default)]
    pub source_dir: Option<PathBuf>,

    /// Where published wheels land
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Command that produces the wheel
    #[serde(default = "default_build_command")]
    pub build_command: String,

    /// Python executable used for framework introspection
    #[serde(default = "default_python")]
    pub python: String,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_build_command() -> String {
    DEFAULT_BUILD_COMMAND.to_string()
}

fn default_python() -> String {
    DEFAULT_PYTHON.to_string()
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            source_dir: None,
            output_dir: default_output_dir(),
            build_command: default_build_command(),
            python: default_python(),
        }
    }
}

impl ProjectConfig {
    /// Parse from TOML content.
    pub fn from_toml(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseFailed {
            path: origin.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Load `wheelwright.toml` from a project directory.
    ///
    /// A missing file is not an error; it means all defaults.
    pub fn load(project_dir: &Path) -> Result<Self, ConfigError> {
        let path = project_dir.join(PROJECT_CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadFailed {
            path: path.clone(),
            error: e.to_string(),
        })?;
        Self::from_toml(&content, &path)
    }
}
