//! krm-lint CLI - KRM functions for Kubernetes resource lists

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use krm_lint::commands::run::RunOptions;
use krm_lint::config::{OutputFormat, Settings};
use krm_lint::engine::ErrorPolicy;
use krm_lint::functions::FunctionKind;
use krm_lint::io::SinkOptions;
use krm_lint::utils::{KrmError, display_error_and_exit, logger};
use krm_lint::{log_error, log_info};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "krm-lint")]
#[command(author, version, about = "KRM functions for Kubernetes resource lists", long_about = None)]
struct Cli {
    /// Verbose output (can be used multiple times: -v, -vv, -vvv)
    /// -v: INFO, -vv: DEBUG, -vvv: TRACE
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Error policy: fail-fast or aggregate-all
    #[arg(long, global = true, env = "KRM_LINT_POLICY")]
    policy: Option<ErrorPolicy>,

    /// Output format for the resulting ResourceList
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Path to settings file (defaults to .krm-lint.toml or ~/.config/krm-lint/config.toml)
    #[arg(long, global = true, env = "KRM_LINT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Clone)]
struct InputArgs {
    /// ResourceList file (reads stdin when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// functionConfig file overriding the one embedded in the input
    #[arg(long)]
    fn_config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Reject resource types that should not be declared (Secrets, Jobs, ...)
    BanKinds {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Validate metadata.name of every resource
    ValidateName {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Validate Namespace names and metadata.namespace values
    ValidateNamespace {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Add the functionConfig data entries as labels on every resource
    SetLabels {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Remove the annotations listed in functionConfig data.annotationKeys
    DeleteAnnotations {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Run every validator as one pipeline
    Lint {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Read a directory of YAML files into a ResourceList
    ReadYaml {
        /// Source directory
        dir: PathBuf,
    },

    /// Write a ResourceList to a directory of YAML files
    WriteYaml {
        /// Output directory
        dir: PathBuf,

        /// ResourceList file (reads stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Replace existing YAML files in the output directory
        #[arg(long)]
        overwrite: bool,

        /// Show what would be written without making changes
        #[arg(long)]
        dry_run: bool,
    },

    /// Settings file helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print an example settings file
    Example,
}

fn main() {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    match run(cli) {
        Ok(true) => std::process::exit(1),
        Ok(false) => {}
        Err(err) => match err.downcast::<KrmError>() {
            Ok(krm_err) => display_error_and_exit(krm_err),
            Err(other) => {
                log_error!("{:#}", other);
                std::process::exit(1);
            }
        },
    }
}

/// Returns true when the run produced error results
fn run(cli: Cli) -> Result<bool> {
    let settings = Settings::load(cli.config.as_deref())?;

    if !settings.colors.enabled {
        colored::control::set_override(false);
    }

    let policy = cli.policy.unwrap_or(settings.defaults.policy);
    let format = cli.format.unwrap_or(settings.defaults.format);

    let options = |input: InputArgs| RunOptions {
        input: input.input,
        fn_config: input.fn_config,
        policy,
        format,
    };

    match cli.command {
        Commands::BanKinds { input } => run_single(FunctionKind::BanKinds, options(input), &settings),
        Commands::ValidateName { input } => {
            run_single(FunctionKind::ValidateMetadataName, options(input), &settings)
        }
        Commands::ValidateNamespace { input } => {
            run_single(FunctionKind::ValidateNamespaceName, options(input), &settings)
        }
        Commands::SetLabels { input } => run_single(FunctionKind::SetLabels, options(input), &settings),
        Commands::DeleteAnnotations { input } => {
            run_single(FunctionKind::DeleteAnnotations, options(input), &settings)
        }
        Commands::Lint { input } => krm_lint::commands::lint::lint(&options(input), &settings),
        Commands::ReadYaml { dir } => {
            krm_lint::commands::read_yaml::read_yaml(&dir, format)?;
            Ok(false)
        }
        Commands::WriteYaml {
            dir,
            input,
            overwrite,
            dry_run,
        } => {
            let sink = SinkOptions {
                overwrite: overwrite || settings.sink.overwrite,
                dry_run,
            };
            krm_lint::commands::write_yaml::write_yaml(&dir, input.as_deref(), sink)?;
            Ok(false)
        }
        Commands::Config { command } => handle_config_command(command),
        Commands::Completion { shell } => handle_completion_command(shell),
        Commands::Version => handle_version_command(),
    }
}

fn run_single(kind: FunctionKind, options: RunOptions, settings: &Settings) -> Result<bool> {
    krm_lint::commands::run::run_functions(&[kind], &options, settings)
}

fn handle_config_command(command: ConfigCommands) -> Result<bool> {
    match command {
        ConfigCommands::Example => {
            print!("{}", Settings::example_config());
            Ok(false)
        }
    }
}

fn handle_completion_command(shell: Shell) -> Result<bool> {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "krm-lint", &mut io::stdout());
    Ok(false)
}

fn handle_version_command() -> Result<bool> {
    println!("krm-lint {}", env!("CARGO_PKG_VERSION"));
    log_info!("KRM functions for Kubernetes resource lists");
    Ok(false)
}
