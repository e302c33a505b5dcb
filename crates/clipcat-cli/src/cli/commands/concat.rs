//! `clipcat concat <output> <inputs>...` – join files already on disk.

use anyhow::{bail, Context, Result};
use clipcat_core::concat::Concatenator;
use clipcat_core::config::ClipcatConfig;
use clipcat_core::tools::Ffmpeg;
use std::path::{Path, PathBuf};

pub fn run_concat(cfg: &ClipcatConfig, inputs: &[PathBuf], output: &Path) -> Result<()> {
    if let Some(missing) = inputs.iter().find(|p| !p.is_file()) {
        bail!("input file not found: {}", missing.display());
    }
    Concatenator::new(Ffmpeg::new(cfg.ffmpeg_bin.clone()))
        .concat(inputs, output)
        .with_context(|| format!("concatenate {} file(s)", inputs.len()))?;
    println!("Wrote {}", output.display());
    Ok(())
}
