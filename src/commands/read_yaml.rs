//! read-yaml command: directory to ResourceList

use super::run::emit;
use crate::config::OutputFormat;
use crate::io;
use anyhow::{Context, Result};
use std::path::Path;

pub fn read_yaml(dir: &Path, format: OutputFormat) -> Result<()> {
    if !dir.is_dir() {
        anyhow::bail!("Source path is not a directory: {}", dir.display());
    }

    let list = io::read_dir(dir)
        .with_context(|| format!("Failed to read resources from {}", dir.display()))?;
    emit(&list, format)
}
