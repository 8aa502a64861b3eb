//! Shared utilities for commands

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::config;
use crate::steam::library;

/// Format bytes as human-readable size
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Calculate total size of a directory
///
/// Missing directories count as 0; unreadable entries are skipped. Symlinks
/// are not followed.
pub fn calculate_dir_size(path: &Path) -> u64 {
    if !path.exists() {
        return 0;
    }

    WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum()
}

/// Locate the Steam root from the CLI override, `STEAM_ROOT`, or defaults
pub fn resolve_steam_root(explicit: Option<&Path>) -> Result<PathBuf> {
    let candidates = config::steam_root_candidates(explicit);
    let root = library::find_root(&candidates)?;
    Ok(root)
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SSZ`
pub fn utc_timestamp() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%SZ")
        .to_string()
}

/// Envelope shared by every snapshot file
#[derive(Debug, Serialize)]
pub struct Snapshot<T: Serialize> {
    pub generated_at: String,
    pub steam_root: String,
    #[serde(flatten)]
    pub payload: T,
}

impl<T: Serialize> Snapshot<T> {
    pub fn new(steam_root: &Path, payload: T) -> Self {
        Self {
            generated_at: utc_timestamp(),
            steam_root: steam_root.to_string_lossy().into_owned(),
            payload,
        }
    }
}

/// Write a value as pretty JSON, atomically
///
/// The JSON goes to a temporary file in the destination directory which is
/// then renamed over `out`, so readers never see a partial snapshot.
pub fn write_snapshot<T: Serialize>(out: &Path, value: &T) -> Result<()> {
    let dir = match out.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let content = serde_json::to_string_pretty(value)?;

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in: {}", dir.display()))?;
    tmp.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write: {}", tmp.path().display()))?;
    tmp.persist(out)
        .with_context(|| format!("Failed to write: {}", out.display()))?;

    tracing::debug!("Wrote {}", out.display());
    Ok(())
}

/// Convert a `--interval` value in seconds
pub fn parse_interval(secs: f64) -> Result<Duration> {
    if !(secs.is_finite() && secs > 0.0) {
        bail!("Interval must be a positive number of seconds, got {}", secs);
    }
    Ok(Duration::from_secs_f64(secs))
}

/// Run `pass` once, or forever every `interval` when watching
///
/// The first pass must succeed. Later failures are logged and the loop keeps
/// going; it only ends with the process.
pub fn run_passes<F>(watch: bool, interval: Duration, mut pass: F) -> Result<()>
where
    F: FnMut() -> Result<()>,
{
    pass()?;

    if !watch {
        return Ok(());
    }

    tracing::info!("Watching, refresh interval {:?}", interval);
    loop {
        thread::sleep(interval);
        if let Err(e) = pass() {
            tracing::error!("Refresh failed: {:#}", e);
        }
    }
}
