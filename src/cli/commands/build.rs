//! Build command implementation
//!
//! Implements `wheelwright build`: the full pipeline from parameter
//! resolution through publication. Strictly sequential; every stage's
//! output is a precondition for the next, and the first fatal error
//! halts the run.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::cli::output::{create_spinner, is_json, is_quiet, print_detail, print_success};
use crate::core::build_env::ToolchainEnvironment;
use crate::core::config::ProjectConfig;
use crate::core::publish::publish;
use crate::core::request::BuildRequest;
use crate::core::rewrite::rewrite_wheel;
use crate::core::version::LocalVersion;
use crate::error::WheelwrightError;
use crate::infra::abi::introspect_abi;
use crate::infra::builder::invoke_build;
use crate::infra::git;

/// Build options
pub struct BuildOptions {
    /// CUDA toolkit version (defaults to "12.8")
    pub cuda: Option<String>,
    /// torch framework version (defaults to "2.8.0")
    pub torch: Option<String>,
    /// Maximum parallel build jobs (defaults to "4")
    pub jobs: Option<String>,
    /// Source checkout to build in
    pub source_dir: Option<PathBuf>,
    /// Directory published wheels land in
    pub output_dir: Option<PathBuf>,
    /// Command that produces the wheel
    pub build_command: Option<String>,
    /// Python executable for framework introspection
    pub python: Option<String>,
    /// Pre-pinned source revision, skips reading the checkout
    pub revision: Option<String>,
    /// Environment-style file to append run outputs to
    pub outputs_file: Option<PathBuf>,
    /// Skip the toolkit/framework compatibility check
    pub allow_unsupported: bool,
}

/// Execute the build command
pub async fn execute(project_dir: &Path, options: BuildOptions) -> Result<()> {
    let config =
        ProjectConfig::load(project_dir).context("Failed to load project configuration")?;

    // Stage 1: parameter resolution.
    let request = BuildRequest::resolve(
        options.cuda.as_deref(),
        options.torch.as_deref(),
        options.jobs.as_deref(),
    )
    .map_err(WheelwrightError::Request)?;

    if options.allow_unsupported {
        tracing::warn!("Skipping toolkit/framework compatibility check");
    } else {
        request.check_supported().map_err(WheelwrightError::Request)?;
    }

    let source_dir = options
        .source_dir
        .or_else(|| config.source_dir.clone())
        .unwrap_or_else(|| project_dir.to_path_buf());

    // Stage 2: bind the toolchain environment. The inherited search
    // paths are read here once; the process environment is never
    // mutated.
    let env = ToolchainEnvironment::bind(
        &request,
        &std::env::var("PATH").unwrap_or_default(),
        &std::env::var("LD_LIBRARY_PATH").unwrap_or_default(),
    );
    env.validate().map_err(WheelwrightError::Env)?;

    // Provenance is captured from the same checkout the build runs in,
    // immediately before it launches.
    let revision = match &options.revision {
        Some(rev) => git::validate_revision(rev),
        None => git::short_revision(&source_dir),
    }
    .map_err(WheelwrightError::Revision)?;

    tracing::info!(
        "Building CUDA {} / torch {} at revision {revision} in {}",
        request.toolkit_version,
        request.framework_version,
        source_dir.display()
    );

    // Stage 3: external build.
    let build_command = options
        .build_command
        .unwrap_or_else(|| config.build_command.clone());
    let spinner = (!is_quiet() && !is_json()).then(|| {
        create_spinner(&format!(
            "Building wheel (CUDA {}, torch {})",
            request.toolkit_version, request.framework_version
        ))
    });
    let build_result = invoke_build(&build_command, &source_dir, &env.to_env_map());
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let raw = build_result.map_err(WheelwrightError::Build)?;
    tracing::info!("Build produced {}", raw.path.display());

    // Stage 4: ABI introspection, never fatal.
    let python = options.python.unwrap_or_else(|| config.python.clone());
    let abi = introspect_abi(&python);

    // Stage 5: synthesize the identifier and rewrite the wheel.
    let local = LocalVersion::for_today(
        &request.toolkit_version,
        &request.framework_version,
        abi,
        revision,
    );
    tracing::info!("Synthesized local version {local}");

    let artifact = rewrite_wheel(&raw, &local).map_err(WheelwrightError::Rewrite)?;

    // Stage 6: publication.
    let output_dir = options
        .output_dir
        .unwrap_or_else(|| config.output_dir.clone());
    let manifest = publish(&artifact, &output_dir).map_err(WheelwrightError::Publish)?;

    // The CLI layer already falls back to GITHUB_OUTPUT for this flag.
    let outputs_file = options.outputs_file;
    if let Some(path) = &outputs_file {
        manifest
            .append_to(path)
            .map_err(WheelwrightError::Publish)?;
    }

    if is_json() {
        println!("{}", serde_json::to_string_pretty(&manifest)?);
    } else {
        print_success(&format!("Built {}", manifest.artifact_filename));
        print_detail(&format!("Local version: {local}"));
        print_detail(&format!("Published to: {}", manifest.artifact_path.display()));
        if outputs_file.is_none() {
            // No sink configured; the facts go to stdout for the
            // calling automation.
            print!("{}", manifest.render_env());
        }
    }

    Ok(())
}
