//! Integration test: full pipeline runs against in-process fakes.
//!
//! Each test gets its own base directory and log file, runs the pipeline with a
//! fixed date, and checks the files on disk plus what was logged.

mod common;

use chrono::NaiveDate;
use clipcat_core::config::{ClipcatConfig, ConcatMode};
use clipcat_core::logging::LogContext;
use clipcat_core::pipeline::{Pipeline, PipelineState};
use clipcat_core::time::{TimePolicy, TimeRange};
use common::fakes::{segment_body, ByteConcat, FakeSource};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};
use tracing_subscriber::EnvFilter;

const URL: &str = "https://youtu.be/6olH7m-OJXM";

struct Env {
    root: TempDir,
    cfg: ClipcatConfig,
    log: LogContext,
}

impl Env {
    fn new() -> Self {
        let root = tempdir().unwrap();
        let cfg = ClipcatConfig {
            base_dir: root.path().join("base_videos"),
            ..ClipcatConfig::default()
        };
        let log =
            LogContext::open_with_filter(&root.path().join("clipcat.log"), EnvFilter::new("debug"))
                .unwrap();
        Self { root, cfg, log }
    }

    fn day_dir(&self) -> PathBuf {
        self.cfg.base_dir.join("20240307")
    }

    fn log_lines(&self) -> Vec<String> {
        fs::read_to_string(self.root.path().join("clipcat.log"))
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn count_log(&self, needle: &str) -> usize {
        self.log_lines().iter().filter(|l| l.contains(needle)).count()
    }
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
}

fn ranges(pairs: &[(&str, &str)]) -> Vec<TimeRange> {
    pairs.iter().map(|(s, e)| TimeRange::new(*s, *e)).collect()
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn two_segments_downloaded_and_merged_in_order() {
    let env = Env::new();
    let source = FakeSource::titled("Live: part 1/2");
    let remux = ByteConcat::new();
    let pipeline = Pipeline::new(&env.cfg, &source, &remux, env.log.clone()).with_date(date());

    let report = pipeline.run(
        URL,
        &ranges(&[("00:01:30", "00:02:21"), ("00:10:00", "00:10:05")]),
    );

    assert_eq!(report.state, PipelineState::Done);
    assert_eq!(report.title, "Live_ part 1_2");
    assert_eq!(report.save_dir.as_deref(), Some(env.day_dir().as_path()));
    assert_eq!(
        report.segments,
        vec![
            env.day_dir().join("download_1.mp4"),
            env.day_dir().join("download_2.mp4")
        ]
    );

    // Rewritten after each segment.
    assert_eq!(report.concat_runs, 2);
    assert_eq!(remux.runs.get(), 2);
    let merged = env.day_dir().join("concat_concat.mp4");
    assert_eq!(report.merged.as_deref(), Some(merged.as_path()));
    assert_eq!(
        read(&merged),
        format!("{}{}", segment_body(90, 141), segment_body(600, 605))
    );

    for manifest in remux.manifests.borrow().iter() {
        assert!(!manifest.exists(), "manifest should be removed");
    }

    assert_eq!(env.count_log("saved "), 2);
    assert_eq!(env.count_log(" ERROR "), 0);
}

#[test]
fn second_segment_failure_aborts_run() {
    let env = Env::new();
    let source = FakeSource::titled("clip").dropping_file_on_call(2);
    let remux = ByteConcat::new();
    let pipeline = Pipeline::new(&env.cfg, &source, &remux, env.log.clone()).with_date(date());

    let report = pipeline.run(
        URL,
        &ranges(&[
            ("00:00:01", "00:00:02"),
            ("00:00:03", "00:00:04"),
            ("00:00:05", "00:00:06"),
        ]),
    );

    assert_eq!(report.state, PipelineState::Aborted);
    assert_eq!(source.calls(), 2, "third segment must not be attempted");
    assert_eq!(report.segments, vec![env.day_dir().join("download_1.mp4")]);
    assert!(env.day_dir().join("download_1.mp4").exists());
    assert!(!env.day_dir().join("download_2.mp4").exists());

    let merged = env.day_dir().join("concat_concat.mp4");
    assert_eq!(read(&merged), segment_body(1, 2));
    assert_eq!(remux.runs.get(), 1);

    assert_eq!(env.count_log("saved "), 1);
    let errors: Vec<String> = env
        .log_lines()
        .into_iter()
        .filter(|l| l.contains(" ERROR "))
        .collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("segment 2"));
    assert!(errors[0].contains("download_2.mp4"));
}

#[test]
fn title_lookup_failure_uses_placeholder() {
    let mut env = Env::new();
    env.cfg.name_merged_by_title = true;
    let source = FakeSource::untitled();
    let remux = ByteConcat::new();
    let pipeline = Pipeline::new(&env.cfg, &source, &remux, env.log.clone()).with_date(date());

    let report = pipeline.run(URL, &ranges(&[("00:00:01", "00:00:02")]));

    assert_eq!(report.state, PipelineState::Done);
    assert_eq!(report.title, "untitled");
    assert!(env.day_dir().join("untitled_concat.mp4").exists());
    assert_eq!(env.count_log(" WARN "), 1);
    assert_eq!(env.count_log(" ERROR "), 0);
}

#[test]
fn title_names_merged_file_when_enabled() {
    let mut env = Env::new();
    env.cfg.name_merged_by_title = true;
    let source = FakeSource::titled("a:b/c");
    let remux = ByteConcat::new();
    let pipeline = Pipeline::new(&env.cfg, &source, &remux, env.log.clone()).with_date(date());

    let report = pipeline.run(URL, &ranges(&[("00:00:01", "00:00:02")]));
    assert_eq!(
        report.merged,
        Some(env.day_dir().join("a_b_c_concat.mp4"))
    );
}

#[test]
fn once_mode_concatenates_at_end_only() {
    let mut env = Env::new();
    env.cfg.concat_mode = ConcatMode::Once;
    let source = FakeSource::titled("clip");
    let remux = ByteConcat::new();
    let pipeline = Pipeline::new(&env.cfg, &source, &remux, env.log.clone()).with_date(date());

    let report = pipeline.run(
        URL,
        &ranges(&[
            ("00:00:01", "00:00:02"),
            ("00:00:03", "00:00:04"),
            ("00:00:05", "00:00:06"),
        ]),
    );

    assert_eq!(report.state, PipelineState::Done);
    assert_eq!(report.concat_runs, 1);
    assert_eq!(
        read(&env.day_dir().join("concat_concat.mp4")),
        format!(
            "{}{}{}",
            segment_body(1, 2),
            segment_body(3, 4),
            segment_body(5, 6)
        )
    );
}

#[test]
fn once_mode_skips_concat_after_abort() {
    let mut env = Env::new();
    env.cfg.concat_mode = ConcatMode::Once;
    let source = FakeSource::titled("clip").dropping_file_on_call(2);
    let remux = ByteConcat::new();
    let pipeline = Pipeline::new(&env.cfg, &source, &remux, env.log.clone()).with_date(date());

    let report = pipeline.run(
        URL,
        &ranges(&[("00:00:01", "00:00:02"), ("00:00:03", "00:00:04")]),
    );
    assert_eq!(report.state, PipelineState::Aborted);
    assert_eq!(remux.runs.get(), 0);
    assert!(report.merged.is_none());
}

#[test]
fn malformed_time_falls_back_to_zero_when_lenient() {
    let env = Env::new();
    let source = FakeSource::titled("clip");
    let remux = ByteConcat::new();
    let pipeline = Pipeline::new(&env.cfg, &source, &remux, env.log.clone()).with_date(date());

    let report = pipeline.run(URL, &ranges(&[("1:30", "00:00:05")]));

    assert_eq!(report.state, PipelineState::Done);
    let req = &source.requests.borrow()[0];
    assert_eq!(req.section.start, 0);
    assert_eq!(req.section.end, 5);
    assert_eq!(env.count_log(" ERROR "), 1);
    assert_eq!(env.count_log("HH:MM:SS"), 1);
}

#[test]
fn malformed_time_aborts_when_strict() {
    let mut env = Env::new();
    env.cfg.time_policy = TimePolicy::Strict;
    let source = FakeSource::titled("clip");
    let remux = ByteConcat::new();
    let pipeline = Pipeline::new(&env.cfg, &source, &remux, env.log.clone()).with_date(date());

    let report = pipeline.run(
        URL,
        &ranges(&[("00:00:01", "00:00:02"), ("00:00:03", "oops")]),
    );

    assert_eq!(report.state, PipelineState::Aborted);
    assert_eq!(source.calls(), 1);
    assert_eq!(report.segments.len(), 1);
}

#[test]
fn concat_failure_is_logged_and_run_completes() {
    let env = Env::new();
    let source = FakeSource::titled("clip");
    let remux = ByteConcat::failing();
    let pipeline = Pipeline::new(&env.cfg, &source, &remux, env.log.clone()).with_date(date());

    let report = pipeline.run(
        URL,
        &ranges(&[("00:00:01", "00:00:02"), ("00:00:03", "00:00:04")]),
    );

    assert_eq!(report.state, PipelineState::Done);
    assert_eq!(report.segments.len(), 2);
    assert_eq!(report.concat_failures, 2);
    assert!(report.merged.is_none());
    assert_eq!(env.count_log(" ERROR "), 2);
    for manifest in remux.manifests.borrow().iter() {
        assert!(!manifest.exists());
    }
}

#[test]
fn same_day_rerun_overwrites_by_index() {
    let env = Env::new();
    let remux = ByteConcat::new();

    let first = FakeSource::titled("clip");
    Pipeline::new(&env.cfg, &first, &remux, env.log.clone())
        .with_date(date())
        .run(URL, &ranges(&[("00:00:01", "00:00:02")]));

    let second = FakeSource::titled("clip");
    let report = Pipeline::new(&env.cfg, &second, &remux, env.log.clone())
        .with_date(date())
        .run(URL, &ranges(&[("00:00:07", "00:00:09")]));

    assert_eq!(report.state, PipelineState::Done);
    assert_eq!(read(&env.day_dir().join("download_1.mp4")), segment_body(7, 9));
    assert_eq!(
        read(&env.day_dir().join("concat_concat.mp4")),
        segment_body(7, 9)
    );
}
