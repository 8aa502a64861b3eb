//! CLI commands

pub mod downloads;
pub mod library;
pub mod list;
pub mod storage;
pub mod utils;
pub mod vdf;

use std::path::PathBuf;

/// Options for snapshot commands without extra inputs
pub struct SnapshotOptions {
    /// Steam root override
    pub steam_root: Option<PathBuf>,
    /// Snapshot file to write
    pub out: PathBuf,
    /// Keep running and refresh
    pub watch: bool,
    /// Poll interval in seconds
    pub interval: f64,
}
