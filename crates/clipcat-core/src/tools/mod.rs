//! External collaborators: the media downloader and the remuxer.
//!
//! The pipeline only talks to these traits. [`ytdlp::YtDlp`] and
//! [`ffmpeg::Ffmpeg`] run the real tools as blocking child processes; tests
//! plug in fakes that write files directly.

pub mod ffmpeg;
pub mod ytdlp;

pub use ffmpeg::Ffmpeg;
pub use ytdlp::YtDlp;

use crate::error::ClipError;
use crate::time::SectionSeconds;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Output container requested from the downloader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Container {
    #[default]
    Mp4,
    Mkv,
    Webm,
}

impl Container {
    pub fn extension(self) -> &'static str {
        match self {
            Container::Mp4 => "mp4",
            Container::Mkv => "mkv",
            Container::Webm => "webm",
        }
    }
}

/// Everything the downloader needs for one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRequest {
    pub url: String,
    /// Output path with a `%(ext)s` placeholder for the extension.
    pub output_template: String,
    pub section: SectionSeconds,
    pub container: Container,
    pub overwrite: bool,
}

/// Resolves remote media: title lookup and time-bounded downloads.
pub trait MediaSource {
    fn fetch_title(&self, url: &str) -> Result<String, ClipError>;

    /// Writes the requested section to disk. Success only means the tool
    /// reported success; the caller verifies the file.
    fn download_section(&self, request: &SectionRequest) -> Result<(), ClipError>;
}

/// Stream-copy concatenation driven by a manifest file.
pub trait Remuxer {
    /// Returns [`ClipError::Concatenation`] when the tool exits non-zero.
    fn concat_copy(&self, manifest: &Path, output: &Path) -> Result<(), ClipError>;
}

impl<T: MediaSource + ?Sized> MediaSource for &T {
    fn fetch_title(&self, url: &str) -> Result<String, ClipError> {
        (**self).fetch_title(url)
    }

    fn download_section(&self, request: &SectionRequest) -> Result<(), ClipError> {
        (**self).download_section(request)
    }
}

impl<T: Remuxer + ?Sized> Remuxer for &T {
    fn concat_copy(&self, manifest: &Path, output: &Path) -> Result<(), ClipError> {
        (**self).concat_copy(manifest, output)
    }
}
