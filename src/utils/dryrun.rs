//! Dry-run mode utilities
//!
//! The dry-run flag travels with the sink options instead of living in the
//! process environment.

use colored::Colorize;

/// Log a dry-run action
pub fn log_action(action: &str) {
    eprintln!("  {} {}", "[DRY RUN]".cyan().bold(), action);
}

/// Closing line after a dry run
pub fn log_no_changes() {
    eprintln!("{}", "No changes were made (--dry-run mode)".yellow());
}

/// Execute function only if not in dry-run mode
/// Returns Ok(()) in dry-run mode without executing
pub fn exec_unless_dry_run<F, E>(dry_run: bool, action_desc: &str, f: F) -> Result<(), E>
where
    F: FnOnce() -> Result<(), E>,
{
    if dry_run {
        log_action(action_desc);
        Ok(())
    } else {
        f()
    }
}
