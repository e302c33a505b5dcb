//! CLI for clipcat.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clipcat_core::config;
use clipcat_core::logging::LogContext;
use clipcat_core::time::TimeRange;
use std::path::PathBuf;

use commands::{run_concat, run_config_path, run_pipeline, run_title, RunOverrides};

/// Top-level CLI for clipcat.
#[derive(Debug, Parser)]
#[command(name = "clipcat")]
#[command(about = "clipcat: download time ranges of a video and join them into one file", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download each range and concatenate the results. Without arguments, uses `[job]` from the config.
    Run {
        /// Video page URL (anything yt-dlp accepts).
        url: Option<String>,
        /// Segment to download as START-END, e.g. 00:01:30-00:02:21. Repeatable; order is kept.
        #[arg(long = "range", value_name = "START-END")]
        ranges: Vec<TimeRange>,
        /// Concatenate once at the end instead of after every segment.
        #[arg(long)]
        once: bool,
        /// Treat malformed times as errors instead of 00:00:00.
        #[arg(long)]
        strict_times: bool,
        /// Base directory for the dated save folders (overrides config).
        #[arg(long, value_name = "DIR")]
        base_dir: Option<PathBuf>,
    },

    /// Print the video's title, raw and as used for file names.
    Title {
        /// Video page URL.
        url: String,
    },

    /// Stream-copy existing files into OUTPUT, in the order given.
    Concat {
        /// Merged output file.
        output: PathBuf,
        /// Input files.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Print the location of the config file.
    ConfigPath,
}

impl CliCommand {
    pub fn run_from_args(log: &LogContext) -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Run {
                url,
                ranges,
                once,
                strict_times,
                base_dir,
            } => {
                let overrides = RunOverrides {
                    url,
                    ranges,
                    once,
                    strict_times,
                    base_dir,
                };
                run_pipeline(&cfg, overrides, log)?;
            }
            CliCommand::Title { url } => run_title(&cfg, &url)?,
            CliCommand::Concat { output, inputs } => run_concat(&cfg, &inputs, &output)?,
            CliCommand::ConfigPath => run_config_path()?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
