use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::time::{TimePolicy, TimeRange};
use crate::tools::Container;

/// When the merged file is (re)built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConcatMode {
    /// After every successful segment, so a playable prefix always exists.
    #[default]
    Incremental,
    /// Once, after all segments downloaded.
    Once,
}

/// Source and ranges to clip when none are given on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfig {
    pub url: String,
    pub ranges: Vec<TimeRange>,
}

/// Global configuration loaded from `~/.config/clipcat/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipcatConfig {
    /// Parent of the per-day save directories.
    pub base_dir: PathBuf,
    /// Container for segments and the merged file.
    #[serde(default)]
    pub container: Container,
    /// yt-dlp executable (name on PATH or absolute path).
    pub ytdlp_bin: String,
    /// ffmpeg executable.
    pub ffmpeg_bin: String,
    #[serde(default)]
    pub concat_mode: ConcatMode,
    /// "lenient" turns malformed times into 0 seconds, "strict" fails the segment.
    #[serde(default)]
    pub time_policy: TimePolicy,
    /// Let the downloader overwrite existing segment files.
    pub overwrite: bool,
    /// Used when the title cannot be looked up.
    pub placeholder_title: String,
    /// Name the merged file `<title>_concat.<ext>` instead of `concat_concat.<ext>`.
    #[serde(default)]
    pub name_merged_by_title: bool,
    #[serde(default)]
    pub job: Option<JobConfig>,
}

impl Default for ClipcatConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("base_videos"),
            container: Container::Mp4,
            ytdlp_bin: "yt-dlp".to_string(),
            ffmpeg_bin: "ffmpeg".to_string(),
            concat_mode: ConcatMode::Incremental,
            time_policy: TimePolicy::Lenient,
            overwrite: true,
            placeholder_title: "untitled".to_string(),
            name_merged_by_title: false,
            job: None,
        }
    }
}

/// Appended to a freshly written config so the job section is discoverable.
const EXAMPLE_JOB: &str = r#"
# Default job for `clipcat run` without arguments:
#
# [job]
# url = "https://youtu.be/6olH7m-OJXM"
# ranges = [["00:01:30", "00:02:21"]]
"#;

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("clipcat")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ClipcatConfig> {
    let path = config_path()?;
    load_or_init_at(&path)
}

pub fn load_or_init_at(path: &Path) -> Result<ClipcatConfig> {
    if !path.exists() {
        let default_cfg = ClipcatConfig::default();
        let mut toml = toml::to_string_pretty(&default_cfg)?;
        toml.push_str(EXAMPLE_JOB);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(path)
}

pub fn load_from_path(path: &Path) -> Result<ClipcatConfig> {
    let data = fs::read_to_string(path)?;
    let cfg: ClipcatConfig = toml::from_str(&data)?;
    Ok(cfg)
}
