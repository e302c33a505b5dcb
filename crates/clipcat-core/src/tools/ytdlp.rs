//! `yt-dlp` as a [`MediaSource`].

use super::{MediaSource, SectionRequest};
use crate::error::{stderr_tail, ClipError};
use serde::Deserialize;
use std::process::{Command, Output, Stdio};

/// Subset of `--dump-single-json` output we read.
#[derive(Debug, Deserialize)]
struct VideoInfo {
    title: String,
}

#[derive(Debug, Clone)]
pub struct YtDlp {
    bin: String,
}

impl Default for YtDlp {
    fn default() -> Self {
        Self::new("yt-dlp")
    }
}

impl YtDlp {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    fn run(&self, args: &[String]) -> Result<Output, ClipError> {
        tracing::debug!(program = %self.bin, ?args, "spawning");
        let output = Command::new(&self.bin)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ClipError::Spawn {
                program: self.bin.clone(),
                source,
            })?;
        if !output.status.success() {
            return Err(ClipError::Tool {
                program: self.bin.clone(),
                code: output.status.code(),
                stderr: stderr_tail(&output.stderr),
            });
        }
        Ok(output)
    }
}

/// Arguments for a single-section download.
pub fn section_args(request: &SectionRequest) -> Vec<String> {
    let ext = request.container.extension();
    let overwrite = if request.overwrite {
        "--force-overwrites"
    } else {
        "--no-overwrites"
    };
    vec![
        "-o".to_string(),
        request.output_template.clone(),
        "--download-sections".to_string(),
        request.section.to_section_arg(),
        "--force-keyframes-at-cuts".to_string(),
        "--merge-output-format".to_string(),
        ext.to_string(),
        "--remux-video".to_string(),
        ext.to_string(),
        overwrite.to_string(),
        "--no-playlist".to_string(),
        "--no-progress".to_string(),
        request.url.clone(),
    ]
}

fn title_args(url: &str) -> Vec<String> {
    [
        "--dump-single-json",
        "--skip-download",
        "--no-playlist",
        "--no-warnings",
        url,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn parse_title(json: &[u8]) -> Result<String, serde_json::Error> {
    let info: VideoInfo = serde_json::from_slice(json)?;
    Ok(info.title)
}

impl MediaSource for YtDlp {
    fn fetch_title(&self, url: &str) -> Result<String, ClipError> {
        let lookup_err = |reason: String| ClipError::TitleLookup {
            url: url.to_string(),
            reason,
        };
        let output = self.run(&title_args(url)).map_err(|e| lookup_err(e.to_string()))?;
        parse_title(&output.stdout).map_err(|e| lookup_err(format!("unreadable metadata: {e}")))
    }

    fn download_section(&self, request: &SectionRequest) -> Result<(), ClipError> {
        self.run(&section_args(request)).map(|_| ())
    }
}
