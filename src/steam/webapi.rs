//! Owned-games list from the Steam Web API
//!
//! `IPlayerService/GetOwnedGames` needs a Web API key and the account's
//! SteamID64. The response is handed to [`parse_owned`], so it goes through
//! the same per-entry checks as an owned-games file.

use anyhow::{Context, Result};
use std::time::Duration;

use super::reconcile::{parse_owned, OwnedApp};
use crate::config::WebApiCredentials;

const OWNED_GAMES_URL: &str = "https://api.steampowered.com/IPlayerService/GetOwnedGames/v0001/";
const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Fetch the owned-games list for the account in `credentials`
pub fn fetch_owned_games(credentials: &WebApiCredentials) -> Result<Vec<OwnedApp>> {
    fetch_owned_games_from(OWNED_GAMES_URL, credentials)
}

fn fetch_owned_games_from(url: &str, credentials: &WebApiCredentials) -> Result<Vec<OwnedApp>> {
    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .user_agent(concat!("steam-catalog/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;

    // The query string carries the key, so errors are reported without the URL
    let body = client
        .get(url)
        .query(&[
            ("key", credentials.api_key.as_str()),
            ("steamid", credentials.steam_id.as_str()),
            ("include_appinfo", "1"),
            ("include_played_free_games", "1"),
            ("format", "json"),
        ])
        .send()
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.text())
        .map_err(|e| e.without_url())
        .context("GetOwnedGames request failed")?;

    let owned = parse_owned(&body).context("Invalid GetOwnedGames response")?;
    tracing::info!("Fetched {} owned apps from the Steam Web API", owned.len());
    Ok(owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> WebApiCredentials {
        WebApiCredentials {
            api_key: "SECRETKEY".to_string(),
            steam_id: "76561197960287930".to_string(),
        }
    }

    #[test]
    fn test_unreachable_endpoint_is_an_error() {
        let err = fetch_owned_games_from("http://127.0.0.1:1/GetOwnedGames/", &credentials())
            .unwrap_err();
        assert!(format!("{:#}", err).contains("GetOwnedGames request failed"));
    }

    #[test]
    fn test_error_does_not_leak_key() {
        let err = fetch_owned_games_from("http://127.0.0.1:1/GetOwnedGames/", &credentials())
            .unwrap_err();
        assert!(!format!("{:#}", err).contains("SECRETKEY"));
    }
}
