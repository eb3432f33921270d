//! Pipeline-wide error policy

use crate::resource::{ResultItem, Severity};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a pipeline reacts to error results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorPolicy {
    /// Stop at the first function reporting an error and keep only that error
    FailFast,
    /// Run every function and keep every result
    #[default]
    AggregateAll,
}

impl FromStr for ErrorPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "fail-fast" | "failfast" => Ok(ErrorPolicy::FailFast),
            "aggregate-all" | "aggregate" => Ok(ErrorPolicy::AggregateAll),
            _ => Err(anyhow::anyhow!(
                "Invalid error policy: {}. Must be 'fail-fast' or 'aggregate-all'",
                s
            )),
        }
    }
}

impl std::fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorPolicy::FailFast => write!(f, "fail-fast"),
            ErrorPolicy::AggregateAll => write!(f, "aggregate-all"),
        }
    }
}

/// What the pipeline should do after one function's results were admitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Halt,
}

impl ErrorPolicy {
    /// Append `incoming` to `results` under this policy.
    ///
    /// Under fail-fast, a batch containing an error keeps its non-error
    /// results and only its first error, and the pipeline halts.
    pub fn admit(self, results: &mut Vec<ResultItem>, incoming: Vec<ResultItem>) -> Flow {
        let has_error = incoming.iter().any(|r| r.severity == Severity::Error);

        match self {
            ErrorPolicy::AggregateAll => {
                results.extend(incoming);
                Flow::Continue
            }
            ErrorPolicy::FailFast if !has_error => {
                results.extend(incoming);
                Flow::Continue
            }
            ErrorPolicy::FailFast => {
                let mut seen_error = false;
                for item in incoming {
                    if item.severity == Severity::Error {
                        if seen_error {
                            continue;
                        }
                        seen_error = true;
                    }
                    results.push(item);
                }
                Flow::Halt
            }
        }
    }
}
