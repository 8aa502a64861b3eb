//! Merge installed apps with the owned-games list
//!
//! Installed records are authoritative for paths, flags and sizes. The owned
//! list only contributes apps that are not installed and better names for
//! installed apps whose manifest had none.

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::manifest::AppRecord;

/// An app reported as owned by the account
///
/// Built from an entry of the Web API `GetOwnedGames` response; other fields
/// (playtime, icons) are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedApp {
    pub app_id: u32,
    pub name: Option<String>,
}

impl OwnedApp {
    /// Trimmed name, if any
    fn usable_name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }

    /// Read one list entry; `None` for non-objects and missing or invalid ids
    fn from_entry(entry: &Value) -> Option<Self> {
        let app_id = match entry.get("appid")? {
            Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
        .filter(|id| *id != 0)?;

        Some(Self {
            app_id,
            name: entry.get("name").and_then(Value::as_str).map(str::to_owned),
        })
    }
}

/// Parse an owned-games list
///
/// Accepts either a bare array of `{appid, name}` objects or the full Web API
/// envelope `{"response": {"games": [...]}}`. A missing or null `games` is an
/// empty list. Entries that are not objects or whose appid is missing, zero or
/// out of range are skipped one by one.
pub fn parse_owned(json: &str) -> Result<Vec<OwnedApp>> {
    let value: Value = serde_json::from_str(json).context("Invalid owned-games JSON")?;
    let entries: &[Value] = match &value {
        Value::Array(entries) => entries,
        Value::Object(object) => object
            .get("response")
            .and_then(|r| r.get("games"))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default(),
        _ => bail!("Owned-games JSON must be an array or a GetOwnedGames response"),
    };

    let owned: Vec<OwnedApp> = entries.iter().filter_map(OwnedApp::from_entry).collect();
    if owned.len() < entries.len() {
        tracing::debug!(
            "Skipped {} unusable owned-games entries",
            entries.len() - owned.len()
        );
    }
    Ok(owned)
}

/// Read an owned-games list from a file
pub fn load_owned<P: AsRef<Path>>(path: P) -> Result<Vec<OwnedApp>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read: {}", path.display()))?;
    let owned =
        parse_owned(&content).with_context(|| format!("Failed to parse: {}", path.display()))?;
    tracing::info!("Loaded {} owned apps from {}", owned.len(), path.display());
    Ok(owned)
}

/// Merge installed and owned apps into one sorted catalog
///
/// When the same app is installed in several libraries the first record wins.
pub fn merge(installed: Vec<AppRecord>, owned: &[OwnedApp]) -> Vec<AppRecord> {
    let mut merged: HashMap<u32, AppRecord> = HashMap::with_capacity(installed.len());

    for record in installed {
        merged.entry(record.app_id).or_insert(record);
    }

    for app in owned.iter().filter(|a| a.app_id != 0) {
        match merged.get_mut(&app.app_id) {
            Some(existing) => {
                if let Some(name) = app.usable_name().filter(|_| existing.has_placeholder_name()) {
                    existing.name = name.to_string();
                }
            }
            None => {
                merged.insert(
                    app.app_id,
                    AppRecord::not_installed(app.app_id, app.usable_name()),
                );
            }
        }
    }

    let mut catalog: Vec<AppRecord> = merged.into_values().collect();
    sort_catalog(&mut catalog);
    catalog
}

/// Case-insensitive by name, then by app id
pub fn sort_catalog(records: &mut [AppRecord]) {
    records.sort_by_cached_key(|r| (r.name.to_lowercase(), r.app_id));
}
