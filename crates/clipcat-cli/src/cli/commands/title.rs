//! `clipcat title <url>` – look up the display title.

use anyhow::{Context, Result};
use clipcat_core::config::ClipcatConfig;
use clipcat_core::sanitize::sanitize_title;
use clipcat_core::tools::{MediaSource, YtDlp};

pub fn run_title(cfg: &ClipcatConfig, url: &str) -> Result<()> {
    let title = YtDlp::new(cfg.ytdlp_bin.clone())
        .fetch_title(url)
        .with_context(|| format!("look up title of {}", url))?;
    println!("title:     {}", title);
    println!("sanitized: {}", sanitize_title(&title));
    Ok(())
}
