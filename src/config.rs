//! Configuration management for scrobblesync.
//!
//! Settings are read once at startup from environment variables. Values can
//! also be stored in a `.env` file, looked up in this order:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory (`scrobblesync/.env`)
//! 3. `.env` file in the working directory
//! 4. Application defaults (where applicable)

use std::{env, path::PathBuf, time::Duration};

use url::Url;

use crate::{error::ConfigError, types::SyncWindow};

pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_ACCOUNTS_URL: &str = "https://accounts.spotify.com";
pub const DEFAULT_LASTFM_API_URL: &str = "http://ws.audioscrobbler.com/2.0";
pub const DEFAULT_REFRESH_INTERVAL_MINUTES: u64 = 24 * 60;
pub const CALLBACK_PATH: &str = "/spotifyCallback";
pub const AUTHORIZE_PATH: &str = "/authSpotify";
pub const SPOTIFY_SCOPE: &str =
    "user-read-private playlist-read-private playlist-modify-public playlist-modify-private";

/// Loads environment variables from `.env` files.
///
/// Creates the data directory if needed so users know where to put the file.
/// Missing files are not an error, the variables may come from the
/// environment directly.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/scrobblesync/.env`
/// - macOS: `~/Library/Application Support/scrobblesync/.env`
/// - Windows: `%LOCALAPPDATA%/scrobblesync/.env`
pub async fn load_env() -> Result<(), ConfigError> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if dotenv::from_path(&path).is_err() {
        // fall back to a .env next to the binary's working directory
        let _ = dotenv::dotenv();
    }
    Ok(())
}

fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("scrobblesync/.env");
    path
}

/// Credentials for an OAuth client registered with Spotify.
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Everything the process reads from its environment.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Public base URL the browser reaches the server under.
    pub host: String,
    pub server_address: String,
    pub spotify: ClientCredentials,
    pub spotify_api_url: String,
    pub spotify_accounts_url: String,
    pub lastfm_api_key: String,
    pub lastfm_user: String,
    pub lastfm_api_url: String,
    pub windows: Vec<SyncWindow>,
    pub refresh_interval: Duration,
}

impl Settings {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads settings through an arbitrary lookup function.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let host = required("HOST")?.trim_end_matches('/').to_string();
        let host_url = Url::parse(&host).map_err(|e| ConfigError::Invalid {
            name: "HOST",
            reason: e.to_string(),
        })?;

        let server_address = match get("SERVER_ADDRESS") {
            Some(addr) => addr,
            None => {
                let port = host_url
                    .port_or_known_default()
                    .ok_or_else(|| ConfigError::Invalid {
                        name: "HOST",
                        reason: "cannot derive a port".to_string(),
                    })?;
                format!("0.0.0.0:{port}")
            }
        };

        let windows = vec![
            SyncWindow::new(
                "7day",
                required("WEEKLY_PLAYLIST_ID")?,
                parse_number(get("WEEKLY_TRACK_LIMIT"), "WEEKLY_TRACK_LIMIT", 20)?,
            ),
            SyncWindow::new(
                "1month",
                required("MONTHLY_PLAYLIST_ID")?,
                parse_number(get("MONTHLY_TRACK_LIMIT"), "MONTHLY_TRACK_LIMIT", 25)?,
            ),
            SyncWindow::new(
                "overall",
                required("OVERALL_PLAYLIST_ID")?,
                parse_number(get("OVERALL_TRACK_LIMIT"), "OVERALL_TRACK_LIMIT", 50)?,
            ),
        ];

        let interval_minutes: u64 = parse_number(
            get("REFRESH_INTERVAL_MINUTES"),
            "REFRESH_INTERVAL_MINUTES",
            DEFAULT_REFRESH_INTERVAL_MINUTES,
        )?;
        let interval = refresh_interval(interval_minutes)?;

        Ok(Settings {
            host,
            server_address,
            spotify: ClientCredentials {
                client_id: required("SPOTIFY_CLIENT_ID")?,
                client_secret: required("SPOTIFY_CLIENT_SECRET")?,
            },
            spotify_api_url: base_url(get("SPOTIFY_API_URL"), DEFAULT_SPOTIFY_API_URL),
            spotify_accounts_url: base_url(
                get("SPOTIFY_ACCOUNTS_URL"),
                DEFAULT_SPOTIFY_ACCOUNTS_URL,
            ),
            lastfm_api_key: required("LASTFM_API_KEY")?,
            lastfm_user: required("LASTFM_USER")?,
            lastfm_api_url: base_url(get("LASTFM_API_URL"), DEFAULT_LASTFM_API_URL),
            windows,
            refresh_interval: interval,
        })
    }

    /// The OAuth redirect URI registered with Spotify.
    pub fn redirect_uri(&self) -> String {
        format!("{}{}", self.host, CALLBACK_PATH)
    }

    /// URL a user opens to start the authorization flow.
    pub fn authorize_url(&self) -> String {
        format!("{}{}", self.host, AUTHORIZE_PATH)
    }
}

/// Converts a refresh interval in minutes into a [`Duration`].
///
/// # Arguments
///
/// * `minutes` - Minutes between two sync passes.
///
/// # Returns
///
/// `ConfigError::Invalid` for zero or for a value whose seconds overflow `u64`.
pub fn refresh_interval(minutes: u64) -> Result<Duration, ConfigError> {
    if minutes == 0 {
        return Err(ConfigError::Invalid {
            name: "REFRESH_INTERVAL_MINUTES",
            reason: "must be greater than zero".to_string(),
        });
    }
    minutes
        .checked_mul(60)
        .map(Duration::from_secs)
        .ok_or_else(|| ConfigError::Invalid {
            name: "REFRESH_INTERVAL_MINUTES",
            reason: format!("{minutes} minutes is out of range"),
        })
}

fn base_url(value: Option<String>, default: &str) -> String {
    value
        .unwrap_or_else(|| default.to_string())
        .trim_end_matches('/')
        .to_string()
}

fn parse_number<T>(value: Option<String>, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
