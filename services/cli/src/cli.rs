use crate::commands::{run_allocate, run_check, run_shortlist, AllocateArgs, CheckArgs, ShortlistArgs};
use clap::{Parser, Subcommand};
use matched::config::AppConfig;
use matched::error::AppError;
use matched::telemetry;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "matched",
    about = "Allocate students to capacity-limited projects by ranked preference",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full allocation and print the result
    Allocate(AllocateArgs),
    /// List the candidates for one project by descending score
    Shortlist(ShortlistArgs),
    /// Load the inputs and validate them without allocating
    Check(CheckArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    debug!(environment = ?config.environment, "configuration loaded");

    match cli.command {
        Command::Allocate(args) => run_allocate(args, &config),
        Command::Shortlist(args) => run_shortlist(args, &config),
        Command::Check(args) => run_check(args),
    }
}
