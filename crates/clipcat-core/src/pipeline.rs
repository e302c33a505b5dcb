//! Run orchestration: title, save directory, segments, merged output.
//!
//! Everything runs sequentially on the calling thread. The first failed
//! segment aborts the run. Title lookup and malformed time strings (under
//! [`TimePolicy::Lenient`](crate::time::TimePolicy)) degrade to fallbacks.
//! A failed concatenation is logged and does not change the outcome.

use crate::concat::Concatenator;
use crate::config::{ClipcatConfig, ConcatMode};
use crate::logging::LogContext;
use crate::sanitize::sanitize_title;
use crate::segment::{DownloadJob, SegmentDownloader};
use crate::time::TimeRange;
use crate::tools::{Container, Ffmpeg, MediaSource, Remuxer, YtDlp};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Prefix of the merged file when it is not named after the title.
const MERGED_PREFIX: &str = "concat";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Init,
    TitleResolved,
    DirectoryReady,
    Downloading(usize),
    Downloaded(usize),
    Failed(usize),
    Concatenating,
    Done,
    Aborted,
}

/// What a run produced. All failures are also in the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub state: PipelineState,
    /// Sanitized title (or placeholder).
    pub title: String,
    pub save_dir: Option<PathBuf>,
    /// Segment files in range order.
    pub segments: Vec<PathBuf>,
    /// Set once a concatenation has succeeded.
    pub merged: Option<PathBuf>,
    pub concat_runs: usize,
    pub concat_failures: usize,
}

impl RunReport {
    fn new() -> Self {
        Self {
            state: PipelineState::Init,
            title: String::new(),
            save_dir: None,
            segments: Vec::new(),
            merged: None,
            concat_runs: 0,
            concat_failures: 0,
        }
    }

    pub fn is_done(&self) -> bool {
        self.state == PipelineState::Done
    }
}

/// `<base>/<YYYYMMDD>`.
pub fn save_dir_for(base: &Path, date: NaiveDate) -> PathBuf {
    base.join(date.format("%Y%m%d").to_string())
}

/// `<prefix>_concat.<ext>`; prefix is `concat` or the sanitized title.
pub fn merged_file_name(title: Option<&str>, container: Container) -> String {
    format!(
        "{}_concat.{}",
        title.unwrap_or(MERGED_PREFIX),
        container.extension()
    )
}

pub struct Pipeline<S, R> {
    downloader: SegmentDownloader<S>,
    concatenator: Concatenator<R>,
    base_dir: PathBuf,
    container: Container,
    concat_mode: ConcatMode,
    placeholder_title: String,
    name_merged_by_title: bool,
    date: Option<NaiveDate>,
    log: LogContext,
}

impl Pipeline<YtDlp, Ffmpeg> {
    /// Pipeline backed by the `yt-dlp` and `ffmpeg` binaries named in `cfg`.
    pub fn from_config(cfg: &ClipcatConfig, log: LogContext) -> Self {
        Self::new(
            cfg,
            YtDlp::new(cfg.ytdlp_bin.clone()),
            Ffmpeg::new(cfg.ffmpeg_bin.clone()),
            log,
        )
    }
}

impl<S: MediaSource, R: Remuxer> Pipeline<S, R> {
    pub fn new(cfg: &ClipcatConfig, source: S, remuxer: R, log: LogContext) -> Self {
        Self {
            downloader: SegmentDownloader::new(
                source,
                cfg.container,
                cfg.time_policy,
                cfg.overwrite,
            ),
            concatenator: Concatenator::new(remuxer),
            base_dir: cfg.base_dir.clone(),
            container: cfg.container,
            concat_mode: cfg.concat_mode,
            placeholder_title: cfg.placeholder_title.clone(),
            name_merged_by_title: cfg.name_merged_by_title,
            date: None,
            log,
        }
    }

    /// Fixes the date used for the save directory (defaults to today, local time).
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Runs the whole pipeline inside this pipeline's log context.
    pub fn run(&self, url: &str, ranges: &[TimeRange]) -> RunReport {
        self.log.scope(|| self.run_inner(url, ranges))
    }

    fn run_inner(&self, url: &str, ranges: &[TimeRange]) -> RunReport {
        let mut report = RunReport::new();
        tracing::info!(url, ranges = ranges.len(), "run started");

        let raw_title = match self.downloader.source().fetch_title(url) {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!("{}; using placeholder {:?}", e, self.placeholder_title);
                self.placeholder_title.clone()
            }
        };
        report.title = sanitize_title(&raw_title);
        tracing::info!("title: {}", report.title);
        transition(&mut report, PipelineState::TitleResolved);

        let date = self
            .date
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        let dir = save_dir_for(&self.base_dir, date);
        if let Err(e) = std::fs::create_dir_all(&dir) {
            tracing::error!("cannot create save directory {}: {}", dir.display(), e);
            transition(&mut report, PipelineState::Aborted);
            return report;
        }
        report.save_dir = Some(dir.clone());
        transition(&mut report, PipelineState::DirectoryReady);

        let merged_name = merged_file_name(
            self.name_merged_by_title.then_some(report.title.as_str()),
            self.container,
        );
        let merged = dir.join(merged_name);

        if ranges.is_empty() {
            tracing::warn!("no time ranges given; nothing to download");
        }

        for (i, range) in ranges.iter().enumerate() {
            let index = i + 1;
            transition(&mut report, PipelineState::Downloading(index));
            let job = DownloadJob::in_dir(&dir, index, url, range.clone());
            match self.downloader.download(&job) {
                Ok(path) => {
                    report.segments.push(path);
                    transition(&mut report, PipelineState::Downloaded(index));
                    if self.concat_mode == ConcatMode::Incremental {
                        self.concat_into(&mut report, &merged);
                    }
                }
                Err(e) => {
                    tracing::error!("segment {} ({}) failed: {}; aborting run", index, range, e);
                    transition(&mut report, PipelineState::Failed(index));
                    transition(&mut report, PipelineState::Aborted);
                    return report;
                }
            }
        }

        if self.concat_mode == ConcatMode::Once && !report.segments.is_empty() {
            self.concat_into(&mut report, &merged);
        }

        transition(&mut report, PipelineState::Done);
        tracing::info!(
            segments = report.segments.len(),
            concat_failures = report.concat_failures,
            "run finished"
        );
        report
    }

    fn concat_into(&self, report: &mut RunReport, merged: &Path) {
        transition(report, PipelineState::Concatenating);
        report.concat_runs += 1;
        // Failures are logged by `Concatenator::concat`.
        match self.concatenator.concat(&report.segments, merged) {
            Ok(()) => report.merged = Some(merged.to_path_buf()),
            Err(_) => report.concat_failures += 1,
        }
    }
}

fn transition(report: &mut RunReport, next: PipelineState) {
    tracing::debug!("state {:?} -> {:?}", report.state, next);
    report.state = next;
}
