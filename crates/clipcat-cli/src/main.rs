use clipcat_core::logging::LogContext;

mod cli;

use crate::cli::CliCommand;

fn main() {
    // Log to the state-dir file when possible so the CLI never fails on logging alone.
    let log = LogContext::open_default().unwrap_or_else(|e| {
        eprintln!("clipcat: file logging unavailable ({:#}), using stderr", e);
        LogContext::stderr()
    });

    if let Err(err) = log.scope(|| CliCommand::run_from_args(&log)) {
        eprintln!("clipcat error: {:#}", err);
        std::process::exit(1);
    }
}
