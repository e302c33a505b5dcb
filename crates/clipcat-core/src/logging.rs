//! Logging context: a file under the XDG state dir, or stderr as a fallback.
//!
//! Nothing here installs a global subscriber. A [`LogContext`] owns its
//! dispatcher and the pipeline runs inside [`LogContext::scope`], so a log
//! destination lives exactly as long as the run that uses it.

use anyhow::Result;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::Dispatch;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,clipcat_core=debug,clipcat=debug";

/// Writer that is either a file or stderr (used when file clone fails).
enum FileOrStderr {
    File(fs::File),
    Stderr,
}

impl io::Write for FileOrStderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            FileOrStderr::File(f) => f.write(buf),
            FileOrStderr::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            FileOrStderr::File(f) => f.flush(),
            FileOrStderr::Stderr => io::stderr().lock().flush(),
        }
    }
}

struct FileMakeWriter(fs::File);

impl<'a> MakeWriter<'a> for FileMakeWriter {
    type Writer = FileOrStderr;

    fn make_writer(&'a self) -> Self::Writer {
        self.0
            .try_clone()
            .map(FileOrStderr::File)
            .unwrap_or(FileOrStderr::Stderr)
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

#[derive(Clone)]
pub struct LogContext {
    dispatch: Dispatch,
    path: Option<PathBuf>,
}

impl LogContext {
    /// Log file at `~/.local/state/clipcat/clipcat.log`.
    pub fn open_default() -> Result<Self> {
        Self::open(&default_log_path()?)
    }

    /// Append-only log at `path`, filtered by `RUST_LOG` (or the built-in default).
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_filter(path, env_filter())
    }

    pub fn open_with_filter(path: &Path, filter: EnvFilter) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(BoxMakeWriter::new(FileMakeWriter(file)))
            .with_ansi(false)
            .finish();

        Ok(Self {
            dispatch: Dispatch::new(subscriber),
            path: Some(path.to_path_buf()),
        })
    }

    /// Logging to stderr only. Use when the log file cannot be opened.
    pub fn stderr() -> Self {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(io::stderr)
            .with_ansi(false)
            .finish();
        Self {
            dispatch: Dispatch::new(subscriber),
            path: None,
        }
    }

    /// File path, or `None` when logging to stderr.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Runs `f` with this context as the current dispatcher.
    pub fn scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}

pub fn default_log_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("clipcat")?;
    Ok(xdg_dirs.get_state_home().join("clipcat.log"))
}
