//! write-yaml command: ResourceList to directory

use super::run::load_input;
use crate::io::{self, SinkOptions};
use anyhow::Result;
use std::path::Path;

pub fn write_yaml(dir: &Path, input: Option<&Path>, options: SinkOptions) -> Result<()> {
    let list = load_input(input)?;
    let files = io::write_dir(&list, dir, options)?;

    if !options.dry_run {
        for file in &files {
            crate::log_info!("  {}", file.display());
        }
    }
    Ok(())
}
