//! CLI command handlers, one per file.

mod concat;
mod config_path;
mod run;
mod title;

pub use concat::run_concat;
pub use config_path::run_config_path;
pub use run::{run_pipeline, RunOverrides};
pub use title::run_title;
