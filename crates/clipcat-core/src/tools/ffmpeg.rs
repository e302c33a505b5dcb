//! `ffmpeg` concat demuxer as a [`Remuxer`].

use super::Remuxer;
use crate::error::{stderr_tail, ClipError};
use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};

#[derive(Debug, Clone)]
pub struct Ffmpeg {
    bin: String,
}

impl Default for Ffmpeg {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl Ffmpeg {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }
}

/// `-safe 0` is required because manifest entries are absolute paths.
pub fn concat_args(manifest: &Path, output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-y", "-loglevel", "error", "-f", "concat", "-safe", "0", "-i"]
        .iter()
        .map(OsString::from)
        .collect();
    args.push(manifest.as_os_str().to_owned());
    args.push("-c".into());
    args.push("copy".into());
    args.push(output.as_os_str().to_owned());
    args
}

impl Remuxer for Ffmpeg {
    fn concat_copy(&self, manifest: &Path, output: &Path) -> Result<(), ClipError> {
        let args = concat_args(manifest, output);
        tracing::debug!(program = %self.bin, ?args, "spawning");
        let out = Command::new(&self.bin)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ClipError::Spawn {
                program: self.bin.clone(),
                source,
            })?;
        if !out.status.success() {
            return Err(ClipError::Concatenation {
                output: output.to_path_buf(),
                code: out.status.code(),
                stderr: stderr_tail(&out.stderr),
            });
        }
        Ok(())
    }
}
