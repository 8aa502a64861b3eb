//! steam-catalog library
//!
//! Reads Steam's local state (library folders, app manifests, artwork cache)
//! and produces JSON snapshots for handheld shell UIs.
//!
//! # Disclaimer
//!
//! This tool is not affiliated with or endorsed by Valve Corporation.
//! It only reads files the Steam client keeps on your machine and never
//! writes to them.

pub mod commands;
pub mod config;
pub mod logging;
pub mod steam;
pub mod vdf;
