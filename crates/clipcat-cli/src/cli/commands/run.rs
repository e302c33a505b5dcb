//! `clipcat run` – download the ranges and build the merged file.
//!
//! Failures inside the pipeline are reported through the log and the summary
//! line; they do not make the process exit non-zero.

use anyhow::{anyhow, bail, Context, Result};
use clipcat_core::config::{ClipcatConfig, ConcatMode};
use clipcat_core::logging::LogContext;
use clipcat_core::pipeline::{Pipeline, PipelineState};
use clipcat_core::time::{TimePolicy, TimeRange};
use std::path::PathBuf;

/// Command-line values that take precedence over the config.
#[derive(Debug, Default)]
pub struct RunOverrides {
    pub url: Option<String>,
    pub ranges: Vec<TimeRange>,
    pub once: bool,
    pub strict_times: bool,
    pub base_dir: Option<PathBuf>,
}

/// Picks the source and ranges: command line first, then the config's `[job]`.
pub fn resolve_job(
    cfg: &ClipcatConfig,
    url: Option<String>,
    ranges: Vec<TimeRange>,
) -> Result<(String, Vec<TimeRange>)> {
    let job = cfg.job.as_ref();
    let url = url
        .or_else(|| job.map(|j| j.url.clone()))
        .ok_or_else(|| anyhow!("no URL given and no [job] in config"))?;
    let ranges = if ranges.is_empty() {
        job.map(|j| j.ranges.clone()).unwrap_or_default()
    } else {
        ranges
    };
    if ranges.is_empty() {
        bail!("no time ranges given (use --range START-END or [job].ranges)");
    }
    url::Url::parse(&url).with_context(|| format!("invalid URL {:?}", url))?;
    Ok((url, ranges))
}

/// Config with the command-line switches applied.
pub fn apply_overrides(cfg: &ClipcatConfig, o: &RunOverrides) -> ClipcatConfig {
    let mut cfg = cfg.clone();
    if o.once {
        cfg.concat_mode = ConcatMode::Once;
    }
    if o.strict_times {
        cfg.time_policy = TimePolicy::Strict;
    }
    if let Some(dir) = &o.base_dir {
        cfg.base_dir = dir.clone();
    }
    cfg
}

pub fn run_pipeline(cfg: &ClipcatConfig, overrides: RunOverrides, log: &LogContext) -> Result<()> {
    let cfg = apply_overrides(cfg, &overrides);
    let (url, ranges) = resolve_job(&cfg, overrides.url, overrides.ranges)?;

    let report = Pipeline::from_config(&cfg, log.clone()).run(&url, &ranges);

    let merged = report
        .merged
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "none".to_string());
    match report.state {
        PipelineState::Done => println!(
            "Done: {}/{} segment(s), merged file: {}",
            report.segments.len(),
            ranges.len(),
            merged
        ),
        _ => println!(
            "Aborted after {}/{} segment(s), merged file: {}",
            report.segments.len(),
            ranges.len(),
            merged
        ),
    }
    if report.concat_failures > 0 || !report.is_done() {
        if let Some(path) = log.path() {
            println!("See {} for details.", path.display());
        }
    }
    Ok(())
}
