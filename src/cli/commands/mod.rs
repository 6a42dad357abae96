//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod build;
pub mod doctor;

use anyhow::Result;
use clap::Subcommand;
use std::path::PathBuf;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a wheel and stamp its version with build provenance
    Build {
        /// CUDA toolkit version to build against
        #[arg(long, value_name = "VERSION")]
        cuda: Option<String>,

        /// torch framework version to build against
        #[arg(long, value_name = "VERSION")]
        torch: Option<String>,

        /// Maximum parallel build jobs
        #[arg(short, long, value_name = "N")]
        jobs: Option<String>,

        /// Source checkout to build in (defaults to the current directory)
        #[arg(long, value_name = "DIR")]
        source_dir: Option<PathBuf>,

        /// Directory published wheels land in
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Command that produces the wheel
        #[arg(long, value_name = "CMD")]
        build_command: Option<String>,

        /// Python executable for framework introspection
        #[arg(long, value_name = "EXE")]
        python: Option<String>,

        /// Pre-pinned source revision (skips reading the checkout)
        #[arg(long, value_name = "HASH")]
        revision: Option<String>,

        /// Environment-style file to append run outputs to
        #[arg(long, value_name = "FILE", env = "GITHUB_OUTPUT")]
        outputs_file: Option<PathBuf>,

        /// Skip the toolkit/framework compatibility check
        #[arg(long)]
        allow_unsupported: bool,
    },

    /// Check build prerequisites
    Doctor {
        /// Python executable to check
        #[arg(long, value_name = "EXE")]
        python: Option<String>,

        /// CUDA toolkit version to look for
        #[arg(long, value_name = "VERSION")]
        cuda: Option<String>,

        /// Source checkout to inspect
        #[arg(long, value_name = "DIR")]
        source_dir: Option<PathBuf>,
    },
}

impl Commands {
    /// Execute the command
    pub async fn run(self) -> Result<()> {
        let project_dir = std::env::current_dir()?;

        match self {
            Commands::Build {
                cuda,
                torch,
                jobs,
                source_dir,
                output_dir,
                build_command,
                python,
                revision,
                outputs_file,
                allow_unsupported,
            } => {
                build::execute(
                    &project_dir,
                    build::BuildOptions {
                        cuda,
                        torch,
                        jobs,
                        source_dir,
                        output_dir,
                        build_command,
                        python,
                        revision,
                        outputs_file,
                        allow_unsupported,
                    },
                )
                .await
            }
            Commands::Doctor {
                python,
                cuda,
                source_dir,
            } => {
                doctor::execute(
                    &project_dir,
                    doctor::DoctorOptions {
                        python,
                        cuda,
                        source_dir,
                    },
                )
                .await
            }
        }
    }
}
