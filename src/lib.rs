//! Wheelwright - provenance-stamped wheel builder
//!
//! This library builds a redistributable wheel for a GPU compute
//! extension by invoking an external native build, then rewrites the
//! wheel's version metadata to encode the exact build provenance
//! (CUDA toolkit version, torch version, C++11 ABI flag, source
//! revision) so consumers can pick a compatible artifact by version
//! string alone.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Pipeline logic (version synthesis, wheel rewriting)
//! - [`infra`] - Infrastructure layer (subprocesses, git)
//! - [`config`] - Configuration and constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;

#[cfg(test)]
pub mod test_utils;
