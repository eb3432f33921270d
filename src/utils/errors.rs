//! Error types with actionable suggestions

use colored::Colorize;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while deriving keys, loading configuration or moving
/// resources in and out of the process.
///
/// Validation failures are not errors: they are reported as results on the
/// resource list so the pipeline can decide whether to halt.
#[derive(Error, Debug)]
pub enum KrmError {
    /// A grouping key could not be computed for a record
    #[error("cannot derive key for {record}: {reason}")]
    KeyDerivation { record: String, reason: String },

    /// Malformed or missing configuration
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// YAML or JSON could not be (de)serialized
    #[error("failed to parse {context}: {source}")]
    Parse {
        context: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// Filesystem failure in a source or sink
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type KrmResult<T> = std::result::Result<T, KrmError>;

impl KrmError {
    pub fn key_derivation(record: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::KeyDerivation {
            record: record.into(),
            reason: reason.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn parse(context: impl Into<String>, source: serde_yaml::Error) -> Self {
        Self::Parse {
            context: context.into(),
            source,
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Suggestions for fixing the error
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            KrmError::KeyDerivation { .. } => vec![
                "Every item needs apiVersion, kind and metadata.name".to_string(),
                "Path annotations must be relative and stay inside the output directory"
                    .to_string(),
            ],
            KrmError::Configuration(_) => vec![
                "Check the functionConfig data keys".to_string(),
                "Print a sample settings file with: krm-lint config example".to_string(),
            ],
            KrmError::Parse { .. } => vec![
                "Verify the input is a ResourceList (kind: ResourceList)".to_string(),
                "Run with -vv to see which document failed".to_string(),
            ],
            KrmError::Io { path, .. } => vec![
                format!("Verify that {} exists and is accessible", path.display()),
            ],
        }
    }

    /// Display the error with suggestions on stderr
    pub fn display(&self) {
        crate::log_error!("{}", self);

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            eprintln!();
            eprintln!("{}", "Suggestions:".yellow().bold());
            for suggestion in &suggestions {
                eprintln!("  {} {}", "→".blue(), suggestion);
            }
        }
    }
}

/// Helper to display error and exit
pub fn display_error_and_exit(error: KrmError) -> ! {
    error.display();
    std::process::exit(1);
}
