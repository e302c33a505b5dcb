//! One time-bounded download, verified on disk.

use crate::error::ClipError;
use crate::time::{TimePolicy, TimeRange};
use crate::tools::{Container, MediaSource, SectionRequest};
use std::path::{Path, PathBuf};

/// A single segment to fetch. `destination` has no extension; the container adds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadJob {
    /// 1-based position in the requested range list.
    pub index: usize,
    pub url: String,
    pub range: TimeRange,
    pub destination: PathBuf,
}

impl DownloadJob {
    /// Job for `<dir>/download_<index>`.
    pub fn in_dir(dir: &Path, index: usize, url: &str, range: TimeRange) -> Self {
        Self {
            index,
            url: url.to_string(),
            range,
            destination: dir.join(format!("download_{}", index)),
        }
    }
}

/// Appends `.<ext>` without touching dots already in the file name.
pub fn with_container_ext(destination: &Path, container: Container) -> PathBuf {
    let mut o = destination.as_os_str().to_owned();
    o.push(".");
    o.push(container.extension());
    PathBuf::from(o)
}

/// yt-dlp `-o` template for `destination`: `%` is escaped as `%%` and
/// `.%(ext)s` appended. The path must be UTF-8 so the template names the same
/// file that is later checked.
pub fn output_template(destination: &Path) -> Result<String, ClipError> {
    let raw = destination.to_str().ok_or_else(|| {
        ClipError::io(
            format!("destination {} is not valid UTF-8", destination.display()),
            std::io::Error::from(std::io::ErrorKind::InvalidInput),
        )
    })?;
    let mut template = raw.replace('%', "%%");
    template.push_str(".%(ext)s");
    Ok(template)
}

pub struct SegmentDownloader<S> {
    source: S,
    container: Container,
    time_policy: TimePolicy,
    overwrite: bool,
}

impl<S: MediaSource> SegmentDownloader<S> {
    pub fn new(source: S, container: Container, time_policy: TimePolicy, overwrite: bool) -> Self {
        Self {
            source,
            container,
            time_policy,
            overwrite,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Downloads `job` and returns the path of the file it produced.
    ///
    /// A tool that reports success but leaves no `<destination>.<ext>` behind is
    /// a [`ClipError::DownloadVerification`].
    pub fn download(&self, job: &DownloadJob) -> Result<PathBuf, ClipError> {
        let section = job.range.to_seconds(self.time_policy)?;
        let expected = with_container_ext(&job.destination, self.container);
        let template = output_template(&job.destination)?;

        tracing::info!(
            index = job.index,
            range = %job.range,
            start = section.start,
            end = section.end,
            "downloading segment"
        );
        self.source.download_section(&SectionRequest {
            url: job.url.clone(),
            output_template: template,
            section,
            container: self.container,
            overwrite: self.overwrite,
        })?;

        if !expected.is_file() {
            return Err(ClipError::DownloadVerification { expected });
        }
        tracing::info!(index = job.index, "saved {}", expected.display());
        Ok(expected)
    }
}
