pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod resolve;
pub mod site;
pub mod target;
pub mod toggle;

use tracing_subscriber::EnvFilter;

use cli::output::print_error;
use config::{OutputMode, RuntimeConfig};
use error::AppError;
use target::TargetStore;

pub async fn run(cli_args: cli::Cli) -> i32 {
    init_tracing(cli_args.verbose);

    let result = match build_config(&cli_args) {
        Ok(config) => dispatch(cli_args.command, &config).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(()) => 0,
        Err(err) => {
            print_error(&err);
            err.exit_code()
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "omada_cli=debug" } else { "warn" };

    // A second init (e.g. from tests) is not an error worth reporting.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn build_config(cli_args: &cli::Cli) -> Result<RuntimeConfig, AppError> {
    let targets_path = match &cli_args.config {
        Some(path) => path.clone(),
        None => TargetStore::default_path()?,
    };

    Ok(RuntimeConfig {
        output_mode: if cli_args.table {
            OutputMode::Table
        } else {
            OutputMode::Json
        },
        target: cli_args.target.clone(),
        targets_path,
    })
}

async fn dispatch(command: cli::Commands, config: &RuntimeConfig) -> Result<(), AppError> {
    match command {
        cli::Commands::SwitchPort(args) => cli::switch_port::handle(&args, config).await,
        cli::Commands::Target(cmd) => cli::target::handle(&cmd, config).await,
    }
}
