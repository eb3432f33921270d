//! Settings file and function configuration

pub mod function_config;
pub mod settings;

pub use function_config::FunctionConfig;
pub use settings::{OutputFormat, Settings};
