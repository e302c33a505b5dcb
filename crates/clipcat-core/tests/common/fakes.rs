//! In-process stand-ins for yt-dlp and ffmpeg.
//!
//! `FakeSource` writes a small text file per section so concatenation order is
//! visible in the merged bytes. `ByteConcat` follows the manifest and appends
//! the listed files, which is what a stream-copy concat does for our purposes.

#![allow(dead_code)]

use clipcat_core::tools::{MediaSource, Remuxer, SectionRequest};
use clipcat_core::ClipError;
use std::cell::{Cell, RefCell};
use std::fs;
use std::path::{Path, PathBuf};

/// Bytes the fake downloader writes for a section.
pub fn segment_body(start: u64, end: u64) -> String {
    format!("segment {}-{}\n", start, end)
}

pub struct FakeSource {
    pub title: Option<String>,
    /// 1-based call number that "succeeds" without writing a file.
    pub drop_file_on_call: Option<usize>,
    pub requests: RefCell<Vec<SectionRequest>>,
}

impl FakeSource {
    pub fn titled(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            drop_file_on_call: None,
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn untitled() -> Self {
        Self {
            title: None,
            ..Self::titled("")
        }
    }

    pub fn dropping_file_on_call(mut self, call: usize) -> Self {
        self.drop_file_on_call = Some(call);
        self
    }

    pub fn calls(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl MediaSource for FakeSource {
    fn fetch_title(&self, url: &str) -> Result<String, ClipError> {
        self.title.clone().ok_or_else(|| ClipError::TitleLookup {
            url: url.to_string(),
            reason: "HTTP Error 403: Forbidden".to_string(),
        })
    }

    fn download_section(&self, request: &SectionRequest) -> Result<(), ClipError> {
        self.requests.borrow_mut().push(request.clone());
        if self.drop_file_on_call == Some(self.calls()) {
            return Ok(());
        }
        let path = request
            .output_template
            .replace("%(ext)s", request.container.extension());
        fs::write(
            path,
            segment_body(request.section.start, request.section.end),
        )
        .unwrap();
        Ok(())
    }
}

pub struct ByteConcat {
    pub fail: bool,
    pub runs: Cell<usize>,
    pub manifests: RefCell<Vec<PathBuf>>,
}

impl ByteConcat {
    pub fn new() -> Self {
        Self {
            fail: false,
            runs: Cell::new(0),
            manifests: RefCell::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }
}

impl Remuxer for ByteConcat {
    fn concat_copy(&self, manifest: &Path, output: &Path) -> Result<(), ClipError> {
        self.runs.set(self.runs.get() + 1);
        self.manifests.borrow_mut().push(manifest.to_path_buf());
        if self.fail {
            return Err(ClipError::Concatenation {
                output: output.to_path_buf(),
                code: Some(1),
                stderr: "Invalid data found when processing input".to_string(),
            });
        }
        let listing = fs::read_to_string(manifest).unwrap();
        let mut merged = Vec::new();
        for line in listing.lines() {
            let path = line
                .strip_prefix("file '")
                .and_then(|s| s.strip_suffix('\''))
                .expect("manifest line in concat format");
            assert!(Path::new(path).is_absolute());
            merged.extend(fs::read(path).unwrap());
        }
        fs::write(output, merged).unwrap();
        Ok(())
    }
}
