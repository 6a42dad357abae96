//! Framework ABI introspection
//!
//! Asks the installed framework which C++ ABI it was compiled with.
//! The flag is advisory metadata, not a correctness gate: any failure
//! here degrades to [`AbiFlag::False`] and the pipeline continues.

use std::collections::HashMap;

use crate::core::version::AbiFlag;
use crate::infra::process;

/// One-liner the framework answers with `True` or `False`.
const INTROSPECT_SNIPPET: &str = "import torch; print(torch.compiled_with_cxx11_abi())";

/// Determine the framework's C++11 ABI flag, degrading to FALSE.
pub fn introspect_abi(python: &str) -> AbiFlag {
    let args = vec!["-c".to_string(), INTROSPECT_SNIPPET.to_string()];
    match process::run_command(python, &args, None, &HashMap::new()) {
        Ok(output) if output.success() => match AbiFlag::from_token(&output.stdout) {
            Some(flag) => flag,
            None => {
                tracing::warn!(
                    "ABI introspection printed unrecognized token '{}'; assuming FALSE",
                    output.stdout.trim()
                );
                AbiFlag::False
            }
        },
        Ok(output) => {
            tracing::warn!(
                "ABI introspection failed ({}); assuming FALSE",
                output.status_display()
            );
            AbiFlag::False
        }
        Err(error) => {
            tracing::warn!("ABI introspection could not run ({error}); assuming FALSE");
            AbiFlag::False
        }
    }
}
