//! Default configuration values

/// Default CUDA toolkit version to build against
pub const DEFAULT_TOOLKIT_VERSION: &str = "12.8";

/// Default torch framework version to build against
pub const DEFAULT_FRAMEWORK_VERSION: &str = "2.8.0";

/// Default number of parallel build jobs
pub const DEFAULT_BUILD_JOBS: usize = 4;

/// Default output directory for published wheels
pub const DEFAULT_OUTPUT_DIR: &str = "/tmp/wheels";

/// Template for the CUDA toolkit install root; `{version}` is interpolated
pub const CUDA_ROOT_TEMPLATE: &str = "/usr/local/cuda-{version}";

/// Subdirectory of the source checkout where the build tool leaves wheels
pub const DIST_SUBDIR: &str = "dist";

/// Default command used to produce the wheel
pub const DEFAULT_BUILD_COMMAND: &str = "python3 -m build --wheel --no-isolation";

/// Default python executable for framework introspection
pub const DEFAULT_PYTHON: &str = "python3";

/// GPU architectures handed to the external compiler
pub const DEFAULT_ARCH_LIST: &str = "8.0;9.0;12.0";

/// Project configuration file name
pub const PROJECT_CONFIG_FILE: &str = "wheelwright.toml";

/// Minimum proptest iterations
pub const MIN_PROPTEST_ITERATIONS: u32 = 100;
