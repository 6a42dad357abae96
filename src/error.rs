//! Error types for wheelwright
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Build-parameter resolution errors
#[derive(Error, Debug, PartialEq)]
pub enum RequestError {
    /// Parallelism value could not be parsed
    #[error("Invalid job count '{value}': must be a positive integer")]
    InvalidJobs { value: String },

    /// Toolkit/framework pair is known not to build
    #[error("torch {framework} does not support CUDA {toolkit} (maximum supported: {max_toolkit}). Pass --allow-unsupported to try anyway.")]
    UnsupportedCombination {
        toolkit: String,
        framework: String,
        max_toolkit: String,
    },

    /// Version string is not dotted digits
    #[error("Invalid version '{version}': expected dotted digits like \"12.8\"")]
    InvalidVersion { version: String },
}

/// Toolchain environment errors
#[derive(Error, Debug, PartialEq)]
pub enum EnvError {
    /// Required variable would be empty
    #[error("Missing required build variable: {variable}")]
    MissingVariable { variable: String },

    /// Variable has an unusable value
    #[error("Invalid value for {variable}: {reason}")]
    InvalidValue { variable: String, reason: String },
}

/// External build invocation errors
#[derive(Error, Debug)]
pub enum BuildInvokeError {
    /// Build command could not be started
    #[error("Failed to launch build command '{command}': {error}")]
    SpawnFailed { command: String, error: String },

    /// Build tool exited non-zero
    #[error("Build tool failed with {status}: {stderr}")]
    ToolFailed { status: String, stderr: String },

    /// No wheel was produced
    #[error("Build produced no wheel in '{dir}'")]
    MissingArtifact { dir: PathBuf },

    /// More than one wheel was produced
    #[error("Build produced {count} wheels in '{dir}', expected exactly one")]
    AmbiguousArtifact { dir: PathBuf, count: usize },

    /// Produced file does not follow the wheel naming grammar
    #[error("Build produced '{path}', which is not a recognizable wheel filename")]
    UnrecognizedArtifact { path: PathBuf },

    /// IO error while scanning build output
    #[error("IO error for '{path}': {error}")]
    Io { path: PathBuf, error: String },
}

/// Source revision capture errors
#[derive(Error, Debug)]
pub enum RevisionError {
    /// Source checkout is not a git repository
    #[error("'{path}' is not a git repository: {error}")]
    NotARepository { path: PathBuf, error: String },

    /// HEAD could not be resolved to a commit
    #[error("Failed to resolve HEAD in '{path}': {error}")]
    HeadUnresolved { path: PathBuf, error: String },

    /// Supplied override is not a usable hash
    #[error("Invalid revision '{revision}': expected at least 6 hex characters")]
    InvalidRevision { revision: String },
}

/// Wheel rewrite errors
#[derive(Error, Debug)]
pub enum RewriteError {
    /// Filename does not follow the wheel naming grammar
    #[error("'{name}' is not a valid wheel filename")]
    InvalidWheelName { name: String },

    /// Local version segment contains forbidden characters
    #[error("Local version '{identifier}' contains character '{offending}' outside [A-Za-z0-9.]")]
    InvalidLocalVersion { identifier: String, offending: char },

    /// Wheel has no parseable METADATA
    #[error("No METADATA found in '{wheel}' under '{dist_info}'")]
    MetadataMissing { wheel: PathBuf, dist_info: String },

    /// Archive could not be read or written
    #[error("Wheel archive error for '{path}': {error}")]
    Archive { path: PathBuf, error: String },

    /// Rewritten wheel is absent or empty on disk
    #[error("Version rewrite failed: '{path}' missing or empty after rewrite")]
    OutputMissing { path: PathBuf },

    /// IO error
    #[error("IO error for '{path}': {error}")]
    Io { path: PathBuf, error: String },
}

/// Publication errors
#[derive(Error, Debug)]
pub enum PublishError {
    /// Output directory could not be created
    #[error("Failed to create output directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },

    /// Artifact could not be copied
    #[error("Failed to copy '{from}' to '{to}': {error}")]
    CopyFailed {
        from: PathBuf,
        to: PathBuf,
        error: String,
    },

    /// Published artifact could not be hashed
    #[error("Failed to checksum '{path}': {error}")]
    ChecksumFailed { path: PathBuf, error: String },

    /// Outputs sink could not be written
    #[error("Failed to write run outputs to '{path}': {error}")]
    OutputsWrite { path: PathBuf, error: String },
}

/// Project configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file exists but cannot be read
    #[error("Cannot read '{path}': {error}")]
    ReadFailed { path: PathBuf, error: String },

    /// Config file is not valid TOML
    #[error("Failed to parse '{path}': {error}")]
    ParseFailed { path: PathBuf, error: String },
}

/// Top-level wheelwright error type
#[derive(Error, Debug)]
pub enum WheelwrightError {
    /// Parameter resolution error
    #[error("Parameter error: {0}")]
    Request(#[from] RequestError),

    /// Environment binding error
    #[error("Environment error: {0}")]
    Env(#[from] EnvError),

    /// External build error
    #[error("Build error: {0}")]
    Build(#[from] BuildInvokeError),

    /// Revision capture error
    #[error("Revision error: {0}")]
    Revision(#[from] RevisionError),

    /// Wheel rewrite error
    #[error("Rewrite error: {0}")]
    Rewrite(#[from] RewriteError),

    /// Publication error
    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// IO error
    #[error("IO error: {source}")]
    Io { source: std::io::Error },

    /// Generic error
    #[error("{0}")]
    Generic(String),
}
