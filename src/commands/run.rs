//! Run one or more functions over a ResourceList read from stdin or a file

use crate::config::{FunctionConfig, OutputFormat, Settings};
use crate::engine::ErrorPolicy;
use crate::functions::FunctionKind;
use crate::pipeline::Pipeline;
use crate::resource::{KubeObject, ResourceList, Severity};
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Options shared by every function command
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// ResourceList file; stdin when unset
    pub input: Option<PathBuf>,
    /// functionConfig file replacing the one embedded in the input
    pub fn_config: Option<PathBuf>,
    pub policy: ErrorPolicy,
    pub format: OutputFormat,
}

/// Read a ResourceList from `input`, or stdin when `None`
pub fn load_input(input: Option<&Path>) -> Result<ResourceList> {
    let content = match input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read ResourceList from stdin")?;
            buf
        }
    };

    Ok(ResourceList::from_yaml(&content)?)
}

/// Write the ResourceList to stdout
pub fn emit(list: &ResourceList, format: OutputFormat) -> Result<()> {
    let rendered = match format {
        OutputFormat::Yaml => list.to_yaml()?,
        OutputFormat::Json => list.to_json()?,
    };

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(rendered.as_bytes())
        .context("Failed to write ResourceList to stdout")?;
    if !rendered.ends_with('\n') {
        writeln!(stdout)?;
    }
    Ok(())
}

/// Print results to stderr, one line each
pub fn report(list: &ResourceList) {
    for result in &list.results {
        let line = result.to_string();
        let line = match result.severity {
            Severity::Error => line.red(),
            Severity::Warning => line.yellow(),
            Severity::Info => line.normal(),
        };
        eprintln!("{}", line);
    }
}

/// Run `kinds` as one pipeline. Returns true when error results remain.
pub fn run_functions(
    kinds: &[FunctionKind],
    options: &RunOptions,
    settings: &Settings,
) -> Result<bool> {
    let mut list = load_input(options.input.as_deref())?;

    if let Some(path) = &options.fn_config {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read function config: {}", path.display()))?;
        list.function_config = Some(KubeObject::from_yaml(&content)?);
    }

    let config = FunctionConfig::from_object(list.function_config.as_ref())?;

    let mut pipeline = Pipeline::new(options.policy);
    for kind in kinds {
        pipeline.push(kind.build(&config, settings)?);
    }

    crate::log_info!(
        "Running {} function(s) over {} resource(s) ({})",
        pipeline.len(),
        list.items.len(),
        pipeline.policy()
    );
    pipeline.run(&mut list)?;

    report(&list);
    emit(&list, options.format)?;

    Ok(list.has_errors())
}
