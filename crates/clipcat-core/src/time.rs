//! `HH:MM:SS` parsing and the time ranges handed to the downloader.

use crate::error::{ClipError, TimeFormatError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Parses `HH:MM:SS` into a second offset (`h*3600 + m*60 + s`).
///
/// Exactly three colon-separated parts are required, each a non-negative
/// integer (surrounding whitespace is ignored). Components are not range-checked,
/// so `"00:90:00"` is 5400.
pub fn parse_hms(input: &str) -> Result<u64, TimeFormatError> {
    let err = || TimeFormatError {
        input: input.to_string(),
    };
    let parts: Vec<&str> = input.split(':').collect();
    let [h, m, s] = parts.as_slice() else {
        return Err(err());
    };
    let field = |p: &str| p.trim().parse::<u64>().map_err(|_| err());
    let (h, m, s) = (field(*h)?, field(*m)?, field(*s)?);
    h.checked_mul(3600)
        .and_then(|v| v.checked_add(m.checked_mul(60)?))
        .and_then(|v| v.checked_add(s))
        .ok_or_else(err)
}

/// Lenient form of [`parse_hms`]: logs one error and yields 0 on malformed input.
///
/// A bad range therefore starts (or ends) at `00:00:00` instead of failing the job.
pub fn seconds_or_zero(input: &str) -> u64 {
    match parse_hms(input) {
        Ok(secs) => secs,
        Err(e) => {
            tracing::error!("{}; using 0 seconds", e);
            0
        }
    }
}

/// What to do with a malformed time string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimePolicy {
    /// Fall back to 0 seconds and keep going.
    #[default]
    Lenient,
    /// Fail the segment (and so the run).
    Strict,
}

/// Start/end offsets in seconds, as passed to the downloader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSeconds {
    pub start: u64,
    pub end: u64,
}

impl SectionSeconds {
    /// yt-dlp `--download-sections` form, e.g. `*90-141`.
    pub fn to_section_arg(self) -> String {
        format!("*{}-{}", self.start, self.end)
    }
}

/// One requested segment, kept as the user wrote it.
///
/// Parsing into seconds happens at download time so the [`TimePolicy`]
/// decides what a malformed string means. `end > start` is not checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

impl TimeRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    pub fn to_seconds(&self, policy: TimePolicy) -> Result<SectionSeconds, ClipError> {
        let (start, end) = match policy {
            TimePolicy::Lenient => (seconds_or_zero(&self.start), seconds_or_zero(&self.end)),
            TimePolicy::Strict => (parse_hms(&self.start)?, parse_hms(&self.end)?),
        };
        Ok(SectionSeconds { start, end })
    }
}

impl From<(String, String)> for TimeRange {
    fn from((start, end): (String, String)) -> Self {
        Self { start, end }
    }
}

impl From<TimeRange> for (String, String) {
    fn from(r: TimeRange) -> Self {
        (r.start, r.end)
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Parses the CLI form `START-END`. Only the separator is checked here.
impl FromStr for TimeRange {
    type Err = TimeFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('-') {
            Some((start, end)) if !start.is_empty() && !end.is_empty() => {
                Ok(TimeRange::new(start, end))
            }
            _ => Err(TimeFormatError {
                input: s.to_string(),
            }),
        }
    }
}
