//! Directory source and sink

pub mod sink;
pub mod source;

pub use sink::{SinkOptions, write_dir};
pub use source::read_dir;
