use clap::Parser;
use fec_tally::args::{Args, Command};
use fec_tally::{commands, ReportMode, Result, TallyConfig};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Count(tally_args) => {
            let config = TallyConfig::from_args(ReportMode::Count, tally_args);
            commands::tally(config, &mut std::io::stdout().lock())?.print()
        }

        Command::Days(tally_args) => {
            let config = TallyConfig::from_args(ReportMode::Days, tally_args);
            commands::tally(config, &mut std::io::stdout().lock())?.print()
        }

        Command::Filter(filter_args) => commands::filter(filter_args)?.print(),

        Command::Merge(merge_args) => commands::merge(merge_args)?.print(),
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for the library and binary only.
            EnvFilter::new(format!(
                "fec_tally={level},{}={level}",
                env!("CARGO_BIN_NAME")
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
