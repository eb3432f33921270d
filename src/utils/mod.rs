//! Utility modules for krm-lint

pub mod dryrun;
pub mod errors;
pub mod logger;

// Re-export commonly used items
pub use errors::{KrmError, KrmResult, display_error_and_exit};
pub use logger::{log_error, log_info, log_warn};
