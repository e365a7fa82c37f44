//! # Last.fm Module
//!
//! Fetches ranked top tracks for a user from the Last.fm `user.getTopTracks`
//! method. Failures never propagate: the source logs them and hands back an
//! empty list, which the orchestrator reads as "nothing to sync".

use async_trait::async_trait;
use reqwest::Client;

use crate::{
    config::Settings,
    types::{LastfmResponse, ScrobbleRecord},
    warning,
};

/// Upper bound on the number of tracks fetched per window.
pub const TOP_TRACKS_LIMIT: usize = 100;

/// Source of ranked top tracks per reporting window.
#[async_trait]
pub trait ScrobbleSource: Send + Sync {
    /// Returns the top tracks for `window`, most played first.
    ///
    /// # Arguments
    ///
    /// * `window` - Last.fm period key (`7day`, `1month`, `overall`, ...)
    ///
    /// # Returns
    ///
    /// Up to [`TOP_TRACKS_LIMIT`] records in Last.fm rank order. An empty list
    /// means the fetch failed or the window has no plays; failures are logged.
    ///
    /// # API Endpoint
    ///
    /// Uses `user.getTopTracks` with `format=json`, so play counts arrive as
    /// strings and API errors as an `{error, message}` body.
    async fn top_tracks(&self, window: &str) -> Vec<ScrobbleRecord>;
}

#[derive(Debug, Clone)]
pub struct LastfmClient {
    client: Client,
    api_url: String,
    api_key: String,
    user: String,
}

impl LastfmClient {
    pub fn new(settings: &Settings) -> Self {
        Self::with_client(
            Client::new(),
            settings.lastfm_api_url.clone(),
            settings.lastfm_api_key.clone(),
            settings.lastfm_user.clone(),
        )
    }

    pub fn with_client(client: Client, api_url: String, api_key: String, user: String) -> Self {
        Self {
            client,
            api_url,
            api_key,
            user,
        }
    }

    async fn fetch(&self, window: &str) -> Result<Vec<ScrobbleRecord>, String> {
        let limit = TOP_TRACKS_LIMIT.to_string();
        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("method", "user.getTopTracks"),
                ("user", self.user.as_str()),
                ("api_key", self.api_key.as_str()),
                ("period", window),
                ("limit", limit.as_str()),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        // Last.fm reports most errors with a JSON envelope, sometimes with a
        // 200 status, so decode before looking at the status.
        let status = response.status();
        let body = response.text().await.map_err(|e| e.to_string())?;

        match serde_json::from_str::<LastfmResponse>(&body) {
            Ok(LastfmResponse::TopTracks { toptracks }) => Ok(toptracks
                .track
                .into_iter()
                .take(TOP_TRACKS_LIMIT)
                .map(ScrobbleRecord::from)
                .collect()),
            Ok(LastfmResponse::Error { error, message }) => {
                Err(format!("Last.fm error {error}: {message}"))
            }
            Err(e) => Err(format!("unexpected response ({status}): {e}")),
        }
    }
}

#[async_trait]
impl ScrobbleSource for LastfmClient {
    async fn top_tracks(&self, window: &str) -> Vec<ScrobbleRecord> {
        match self.fetch(window).await {
            Ok(tracks) => tracks,
            Err(e) => {
                warning!("Failed to fetch {} top tracks: {}", window, e);
                Vec::new()
            }
        }
    }
}
