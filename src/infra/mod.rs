//! Infrastructure layer
//!
//! Handles all I/O boundaries: subprocess execution, the external
//! build tool, framework introspection, and repository access.
//! This module is the only place where side effects occur.

pub mod abi;
pub mod builder;
pub mod git;
pub mod process;
