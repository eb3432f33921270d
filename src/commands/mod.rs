//! Command implementations for the krm-lint CLI

pub mod lint;
pub mod read_yaml;
pub mod run;
pub mod write_yaml;
