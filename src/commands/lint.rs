//! Lint command: every validator in one pipeline

use super::run::{RunOptions, run_functions};
use crate::config::Settings;
use crate::functions::FunctionKind;
use anyhow::Result;

/// Run ban-kinds, validate-metadata-name and validate-namespace-name.
/// Returns true when error results remain.
pub fn lint(options: &RunOptions, settings: &Settings) -> Result<bool> {
    crate::log_info!("Linting resources...");

    let failed = run_functions(&FunctionKind::validators(), options, settings)?;

    if failed {
        crate::log_warn!("Lint found errors");
    } else {
        crate::log_info!("✓ No lint errors found");
    }
    Ok(failed)
}
