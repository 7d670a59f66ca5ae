//! Command line entry point: parse arguments, set up logging, run the
//! selected subcommand.

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

use scaphra::cli::{ScaphraArgs, execute_command};

/// `-q` leaves only errors, every `-v` opens one more level.
fn log_level(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Error,
        1 => LevelFilter::Warn,
        2 => LevelFilter::Info,
        3 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn main() -> ExitCode {
    let args = ScaphraArgs::parse();

    // SCAPHRA_LOG (env_logger filter syntax) refines the level from the flags
    Builder::new()
        .filter_level(log_level(args.verbosity()))
        .parse_env("SCAPHRA_LOG")
        .format(|buf, record| {
            writeln!(buf, "[{} {}] {}", record.level(), record.target(), record.args())
        })
        .init();

    match execute_command(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("{e:?}");
            eprintln!("scaphra: {e}");
            ExitCode::FAILURE
        }
    }
}
