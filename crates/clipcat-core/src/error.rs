//! Error taxonomy for the clip pipeline.
//!
//! Not every variant is fatal. `TimeFormat` and `TitleLookup` are normally
//! recovered where they occur (zero offset, placeholder title). `Concatenation`
//! is logged and the run carries on. The rest end the run.

use std::path::PathBuf;
use thiserror::Error;

/// A time string that is not `HH:MM:SS` with three non-negative integer parts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("time string {input:?} must be in 'HH:MM:SS' format")]
pub struct TimeFormatError {
    pub input: String,
}

#[derive(Debug, Error)]
pub enum ClipError {
    #[error(transparent)]
    TimeFormat(#[from] TimeFormatError),

    #[error("title lookup failed for {url}: {reason}")]
    TitleLookup { url: String, reason: String },

    /// The downloader returned but the expected file is not on disk.
    #[error("downloaded file not found at {}", .expected.display())]
    DownloadVerification { expected: PathBuf },

    #[error("concatenation into {} failed (exit code {code:?}): {stderr}", .output.display())]
    Concatenation {
        output: PathBuf,
        code: Option<i32>,
        stderr: String,
    },

    /// An external tool other than the remuxer exited non-zero.
    #[error("{program} exited with code {code:?}: {stderr}")]
    Tool {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no input files to concatenate")]
    NothingToConcat,

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl ClipError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        ClipError::Io {
            context: context.into(),
            source,
        }
    }
}

/// Last few lines of a tool's stderr, enough for a log line.
pub(crate) fn stderr_tail(raw: &[u8]) -> String {
    const MAX_LINES: usize = 5;
    let text = String::from_utf8_lossy(raw);
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(MAX_LINES);
    lines[start..].join(" | ")
}
