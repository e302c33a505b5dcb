//! Download time-ranged video segments and join them into one file.
//!
//! Fetching goes through [`tools::MediaSource`] (yt-dlp), joining through
//! [`tools::Remuxer`] (ffmpeg's concat demuxer, stream copy). [`pipeline::Pipeline`]
//! ties them together.

pub mod config;
pub mod logging;

pub mod concat;
pub mod error;
pub mod pipeline;
pub mod sanitize;
pub mod segment;
pub mod time;
pub mod tools;

pub use error::{ClipError, TimeFormatError};
