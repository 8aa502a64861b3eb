//! List command - Show the merged catalog as a table

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, ContentArrangement, Table};
use std::path::PathBuf;

use super::library::{build_catalog, resolve_owned};
use super::utils;
use crate::steam::{discover_library_paths, AppRecord};

/// Options for the list command
pub struct ListOptions {
    /// Steam root override
    pub steam_root: Option<PathBuf>,
    /// Owned-games JSON file; overrides the Web API fetch
    pub owned: Option<PathBuf>,
    /// Hide owned apps that are not installed
    pub installed_only: bool,
}

/// Render catalog records as a table
pub fn format_catalog(games: &[AppRecord]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("AppID"),
        Cell::new("Name"),
        Cell::new("Installed"),
        Cell::new("Size"),
        Cell::new("Library"),
    ]);

    for game in games {
        let size = if game.installed {
            utils::format_size(game.size_on_disk.max(0) as u64)
        } else {
            "-".to_string()
        };
        let library = if game.library_path.is_empty() {
            "-"
        } else {
            game.library_path.as_str()
        };

        table.add_row(vec![
            Cell::new(game.app_id),
            Cell::new(&game.name),
            Cell::new(if game.installed { "yes" } else { "no" }),
            Cell::new(size),
            Cell::new(library),
        ]);
    }

    table.to_string()
}

/// Total `SizeOnDisk` of installed games; negative sizes count as zero
pub fn installed_bytes(games: &[AppRecord]) -> u64 {
    games
        .iter()
        .filter(|g| g.installed)
        .fold(0u64, |total, g| total.saturating_add(g.size_on_disk.max(0) as u64))
}

/// Execute the list command and return formatted output
pub fn execute(options: ListOptions) -> Result<String> {
    let steam_root = utils::resolve_steam_root(options.steam_root.as_deref())?;
    let owned = resolve_owned(options.owned.as_deref())?;

    let libraries = discover_library_paths(&steam_root);
    let mut games = build_catalog(&steam_root, &libraries, &owned);
    if options.installed_only {
        games.retain(|g| g.installed);
    }

    let mut output = format_catalog(&games);
    output.push_str(&format!(
        "\n\n{} games in {} libraries, {} installed",
        games.len(),
        libraries.len(),
        utils::format_size(installed_bytes(&games))
    ));

    Ok(output)
}
