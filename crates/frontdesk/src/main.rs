mod commands;
mod error;
mod logging;
mod settings;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use crate::commands::Commands;
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "frontdesk")]
#[command(version = env!("FRONTDESK_VERSION"))]
#[command(about = "Hospital front desk: onboard doctors, manage beds and admissions", long_about = None)]
struct Cli {
    /// Configuration file (default: ./frontdesk.toml when present)
    #[arg(long, env = "FRONTDESK_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Directory holding the data file (overrides `storage.data-dir`)
    #[arg(long = "data-dir", global = true)]
    data_dir: Option<PathBuf>,

    /// Raise log verbosity; repeat for more detail
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        print_error(&e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run(cli: Cli) -> Result<(), CliError> {
    let cwd = std::env::current_dir().map_err(CliError::CurrentDir)?;
    let config = settings::resolve_config(cli.config.as_deref(), &cwd)?;
    let data_dir = settings::resolve_data_dir(cli.data_dir, &config, &cwd);
    let context = commands::Context::open(config, &data_dir)?;

    cli.command.execute(&context)
}

fn print_error(error: &CliError) {
    eprintln!("error: {error}");

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        eprintln!("caused by: {cause}");
        source = std::error::Error::source(cause);
    }
}
