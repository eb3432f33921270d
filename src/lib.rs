//! krm-lint - KRM functions built on a stable grouping and classification engine

pub mod commands;
pub mod config;
pub mod engine;
pub mod functions;
pub mod io;
pub mod pipeline;
pub mod resource;
pub mod utils;
