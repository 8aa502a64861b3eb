//! End-to-end scans over a fake Steam tree

use std::fs;
use std::path::{Path, PathBuf};

use steam_catalog::commands::downloads::downloads_view;
use steam_catalog::commands::library::build_catalog;
use steam_catalog::steam::{discover_library_paths, find_root, scan_installed, OwnedApp};
use tempfile::TempDir;

fn make_library(dir: &Path) -> PathBuf {
    fs::create_dir_all(dir.join("steamapps")).unwrap();
    dir.canonicalize().unwrap()
}

fn write_manifest(library: &Path, app_id: u32, body: &str) {
    fs::write(
        library
            .join("steamapps")
            .join(format!("appmanifest_{}.acf", app_id)),
        format!("\"AppState\"\n{{\n\t\"appid\"\t\t\"{}\"\n{}}}\n", app_id, body),
    )
    .unwrap();
}

fn write_libraryfolders(root: &Path, paths: &[&Path]) {
    let mut vdf = String::from("\"libraryfolders\"\n{\n");
    for (i, path) in paths.iter().enumerate() {
        vdf.push_str(&format!(
            "\t\"{}\"\n\t{{\n\t\t\"path\"\t\t\"{}\"\n\t\t\"label\"\t\t\"\"\n\t}}\n",
            i,
            path.display()
        ));
    }
    vdf.push_str("}\n");
    fs::write(root.join("steamapps").join("libraryfolders.vdf"), vdf).unwrap();
}

#[test]
fn test_catalog_sorted_by_name() {
    let temp = TempDir::new().unwrap();
    let root = make_library(temp.path());
    write_manifest(&root, 10, "\t\"name\"\t\t\"Zeta\"\n");
    write_manifest(&root, 5, "\t\"name\"\t\t\"Alpha\"\n");

    let libraries = discover_library_paths(&root);
    let catalog = build_catalog(&root, &libraries, &[]);

    let summary: Vec<(u32, &str)> = catalog.iter().map(|g| (g.app_id, g.name.as_str())).collect();
    assert_eq!(summary, vec![(5, "Alpha"), (10, "Zeta")]);
    assert!(catalog.iter().all(|g| g.installed));
}

#[test]
fn test_discover_deduplicates_root() {
    let temp = TempDir::new().unwrap();
    let root = make_library(&temp.path().join("Steam"));
    let sd = make_library(&temp.path().join("sdcard"));
    write_libraryfolders(&root, &[&root, &sd]);

    let libraries = discover_library_paths(&root);
    let paths: Vec<&Path> = libraries.iter().map(|l| l.path()).collect();
    assert_eq!(paths, vec![root.as_path(), sd.as_path()]);
}

#[test]
fn test_discover_deduplicates_alternate_spelling() {
    let temp = TempDir::new().unwrap();
    let root = make_library(&temp.path().join("Steam"));
    let sd = make_library(&temp.path().join("sdcard"));
    let sd_again = root.join("..").join("sdcard");
    write_libraryfolders(&root, &[&sd, &sd_again]);

    assert_eq!(discover_library_paths(&root).len(), 2);
}

#[test]
fn test_scan_spans_libraries_and_skips_bad_files() {
    let temp = TempDir::new().unwrap();
    let root = make_library(&temp.path().join("Steam"));
    let sd = make_library(&temp.path().join("sdcard"));
    write_libraryfolders(&root, &[&root, &sd]);

    write_manifest(&root, 1, "\t\"name\"\t\t\"On Root\"\n");
    write_manifest(&sd, 2, "\t\"name\"\t\t\"On Card\"\n");
    fs::write(
        sd.join("steamapps").join("appmanifest_3.acf"),
        "\"AppState\" { \"appid\" \"3\" \"name\" \"half-writ",
    )
    .unwrap();

    let records = scan_installed(&discover_library_paths(&root));
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].library_path, root.to_string_lossy());
    assert_eq!(records[1].library_path, sd.to_string_lossy());
}

#[test]
fn test_owned_apps_merged_with_covers() {
    let temp = TempDir::new().unwrap();
    let root = make_library(temp.path());
    write_manifest(&root, 570, "");

    let cache = root.join("appcache").join("librarycache");
    fs::create_dir_all(&cache).unwrap();
    fs::write(cache.join("730_header.jpg"), b"jpg").unwrap();

    let owned = vec![
        OwnedApp {
            app_id: 570,
            name: Some("Dota 2".to_string()),
        },
        OwnedApp {
            app_id: 730,
            name: Some("Counter-Strike 2".to_string()),
        },
    ];

    let libraries = discover_library_paths(&root);
    let catalog = build_catalog(&root, &libraries, &owned);
    assert_eq!(catalog.len(), 2);

    let cs = &catalog[0];
    assert_eq!(cs.app_id, 730);
    assert!(!cs.installed);
    assert!(cs.cover_path.ends_with("730_header.jpg"));

    let dota = &catalog[1];
    assert_eq!(dota.name, "Dota 2");
    assert!(dota.installed);
    assert_eq!(dota.library_path, root.to_string_lossy());
    assert_eq!(dota.cover_path, "");
}

#[test]
fn test_downloads_from_manifests() {
    let temp = TempDir::new().unwrap();
    let root = make_library(temp.path());
    write_manifest(
        &root,
        1,
        "\t\"name\"\t\t\"Updating\"\n\t\"BytesDownloaded\"\t\t\"50\"\n\t\"BytesToDownload\"\t\t\"50\"\n",
    );
    write_manifest(&root, 2, "\t\"name\"\t\t\"Idle\"\n");

    let view = downloads_view(&scan_installed(&discover_library_paths(&root)));
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].app_id, 1);
    assert_eq!(view[0].progress, 0.5);
}

#[test]
fn test_find_root_uses_first_steam_install() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("missing");
    let root = make_library(&temp.path().join("Steam"));

    assert_eq!(find_root(&[missing, root.clone()]).unwrap(), root);
}
