//! # Spotify Integration Module
//!
//! Thin client over the parts of the Spotify Web API a sync pass needs.
//!
//! ```text
//! Sync orchestration
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (authorization code + refresh)
//!     ├── Track search (TrackMatcher)
//!     └── Playlist operations (PlaylistUpdater)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## Rate Limiting
//!
//! Every API call goes through [`send_with_retry`]: a 429 answer is followed
//! by a sleep of `Retry-After` seconds and exactly one more attempt. A second
//! 429 surfaces as [`SyncError::RateLimited`] and callers decide whether that
//! is fatal. Requests are issued one at a time; there is no client side
//! parallelism to throttle.
//!
//! ## API Coverage
//!
//! - `GET /search` - track lookup scoped by track and artist name
//! - `PUT /playlists/{playlist_id}/tracks` - replace the playlist content
//! - `PUT /playlists/{playlist_id}` - update the playlist description
//! - `POST /api/token` - code exchange and token refresh (accounts service)

pub mod auth;
pub mod playlist;
pub mod search;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, header::RETRY_AFTER};
use tokio::time::sleep;

use crate::{
    config::Settings,
    error::SyncError,
    management::{TokenProvider, TokenStore},
    types::{MatchOutcome, SyncWindow},
    utils, warning,
};

/// Resolves a Last.fm (track, artist) pair to a Spotify track URI.
///
/// Lookups never fail the caller: every problem ends up as an
/// [`MatchOutcome::Unresolved`] with the reason attached.
#[async_trait]
pub trait TrackMatcher: Send + Sync {
    /// Looks up the Spotify track for one scrobbled track.
    ///
    /// # Arguments
    ///
    /// * `track_name` - Track title as reported by Last.fm
    /// * `artist_name` - Primary artist as reported by Last.fm
    ///
    /// # Returns
    ///
    /// - `MatchOutcome::Resolved(uri)` - first candidate whose title and primary
    ///   artist equal the request, ignoring case and quote characters
    /// - `MatchOutcome::Unresolved(NotFound)` - no candidate matched
    /// - `MatchOutcome::Unresolved(RateLimited)` - still rate limited after one retry
    /// - `MatchOutcome::Unresolved(Transport)` - network, status or auth failure
    ///
    /// # Example
    ///
    /// ```ignore
    /// match matcher.find_track("Don't Stop", "Journey").await {
    ///     MatchOutcome::Resolved(uri) => println!("{uri}"),
    ///     MatchOutcome::Unresolved(reason) => println!("missing: {reason:?}"),
    /// }
    /// ```
    async fn find_track(&self, track_name: &str, artist_name: &str) -> MatchOutcome;
}

/// Writes playlist content and metadata.
#[async_trait]
pub trait PlaylistUpdater: Send + Sync {
    /// Replaces the whole playlist with `track_uris`, in order.
    ///
    /// # Arguments
    ///
    /// * `playlist_id` - Spotify ID of a playlist the user can modify
    /// * `track_uris` - Track URIs in rank order; duplicates are written as given
    ///
    /// # Returns
    ///
    /// - `Ok(())` - the playlist now holds exactly `track_uris`
    /// - `Err(SyncError::RateLimited)` - a 429 came back on the retry too
    /// - `Err(SyncError)` - any other transport, status or auth failure
    ///
    /// # Rate Limiting
    ///
    /// A first 429 is answered by sleeping for `Retry-After` seconds (1 when the
    /// header is missing) and sending the request once more.
    async fn replace_contents(&self, playlist_id: &str, track_uris: &[String])
    -> Result<(), SyncError>;

    /// Writes the sync summary into the playlist description.
    ///
    /// Cosmetic: implementations log failures instead of returning them.
    async fn set_description(
        &self,
        window: &SyncWindow,
        total_play_count: u64,
        unresolved_count: usize,
    );
}

/// Spotify Web API client authenticated through a [`TokenStore`].
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    client: Client,
    api_url: String,
    tokens: TokenStore,
}

impl SpotifyClient {
    pub fn new(settings: &Settings, tokens: TokenStore) -> Self {
        Self::with_client(Client::new(), settings.spotify_api_url.clone(), tokens)
    }

    pub fn with_client(client: Client, api_url: String, tokens: TokenStore) -> Self {
        Self {
            client,
            api_url,
            tokens,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    async fn auth_header(&self) -> Result<String, SyncError> {
        self.tokens
            .auth_header()
            .await
            .ok_or_else(|| SyncError::Auth("not authorized with Spotify".to_string()))
    }
}

/// Sends a request, retrying once after a 429 answer.
///
/// `build` is called once per attempt so the request can be rebuilt.
///
/// # Returns
///
/// - `Ok(Response)` - the first non-429 response, whatever its status
/// - `Err(SyncError::RateLimited)` - the retry was rate limited as well
/// - `Err(SyncError::Transport)` - the request could not be sent
pub async fn send_with_retry<F>(build: F) -> Result<Response, SyncError>
where
    F: Fn() -> RequestBuilder,
{
    let response = build().send().await?;
    if response.status() != StatusCode::TOO_MANY_REQUESTS {
        return Ok(response);
    }

    let wait = retry_after(&response);
    warning!("Rate limited, trying again in {} seconds...", wait);
    sleep(Duration::from_secs(wait)).await;

    let response = build().send().await?;
    if response.status() == StatusCode::TOO_MANY_REQUESTS {
        return Err(SyncError::RateLimited {
            retry_after: retry_after(&response),
        });
    }
    Ok(response)
}

fn retry_after(response: &Response) -> u64 {
    utils::parse_retry_after(
        response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok()),
    )
}

/// Turns a non-success response into [`SyncError::Status`].
async fn check_status(response: Response) -> Result<Response, SyncError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SyncError::Status { status, body })
}
