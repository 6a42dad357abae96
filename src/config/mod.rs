//! Configuration constants
//!
//! Compile-time defaults for the build pipeline. Runtime overrides come
//! from CLI flags and the optional project config file.

pub mod defaults;
