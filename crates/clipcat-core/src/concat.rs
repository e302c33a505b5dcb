//! Lossless concatenation of downloaded segments.
//!
//! The inputs are listed in a temporary manifest in the concat demuxer's format
//! (`file '<absolute path>'`, one per line, in input order). The manifest lives
//! next to the output and is deleted when this call returns, success or not.

use crate::error::ClipError;
use crate::tools::Remuxer;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Quotes a path for a manifest line. `'` becomes `'\''`.
pub fn manifest_line(path: &Path) -> String {
    let escaped = path.to_string_lossy().replace('\'', r"'\''");
    format!("file '{}'", escaped)
}

/// Manifest body for `inputs`, with every path made absolute.
pub fn manifest_contents(inputs: &[PathBuf]) -> Result<String, ClipError> {
    let mut out = String::new();
    for input in inputs {
        let abs = std::path::absolute(input)
            .map_err(|e| ClipError::io(format!("resolve {}", input.display()), e))?;
        out.push_str(&manifest_line(&abs));
        out.push('\n');
    }
    Ok(out)
}

pub struct Concatenator<R> {
    remuxer: R,
}

impl<R: Remuxer> Concatenator<R> {
    pub fn new(remuxer: R) -> Self {
        Self { remuxer }
    }

    pub fn remuxer(&self) -> &R {
        &self.remuxer
    }

    /// Joins `inputs` (in order) into `output` without re-encoding.
    ///
    /// Every failure is logged here once before it is returned.
    pub fn concat(&self, inputs: &[PathBuf], output: &Path) -> Result<(), ClipError> {
        match self.join(inputs, output) {
            Ok(()) => {
                tracing::info!("concatenated {}", output.display());
                Ok(())
            }
            Err(e) => {
                tracing::error!("{}", e);
                Err(e)
            }
        }
    }

    fn join(&self, inputs: &[PathBuf], output: &Path) -> Result<(), ClipError> {
        if inputs.is_empty() {
            return Err(ClipError::NothingToConcat);
        }
        let dir = match output.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let body = manifest_contents(inputs)?;
        let mut manifest = tempfile::Builder::new()
            .prefix("concat_list_")
            .suffix(".txt")
            .tempfile_in(dir)
            .map_err(|e| ClipError::io(format!("create manifest in {}", dir.display()), e))?;
        let manifest_path = manifest.path().to_path_buf();
        manifest
            .as_file_mut()
            .write_all(body.as_bytes())
            .map_err(|e| ClipError::io(format!("write {}", manifest_path.display()), e))?;

        tracing::info!(
            inputs = inputs.len(),
            "concatenating into {}",
            output.display()
        );
        let result = self.remuxer.concat_copy(manifest.path(), output);

        if let Err(e) = manifest.close() {
            tracing::warn!("could not remove concat manifest: {}", e);
        }
        result
    }
}
