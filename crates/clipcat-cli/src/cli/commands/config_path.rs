//! `clipcat config-path` – show where the config lives.

use anyhow::Result;
use clipcat_core::config;

pub fn run_config_path() -> Result<()> {
    println!("{}", config::config_path()?.display());
    Ok(())
}
