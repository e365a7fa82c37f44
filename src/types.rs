use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tabled::Tabled;

/// OAuth credential pair held by the token store.
///
/// Lives only in memory; a restart requires a new authorization.
#[derive(Debug, Clone, PartialEq)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Response of the Spotify token endpoint for both grant types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// One entry of a ranked top tracks list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrobbleRecord {
    pub track_name: String,
    pub artist_name: String,
    pub play_count: u64,
}

impl ScrobbleRecord {
    pub fn new(track_name: impl Into<String>, artist_name: impl Into<String>, play_count: u64) -> Self {
        Self {
            track_name: track_name.into(),
            artist_name: artist_name.into(),
            play_count,
        }
    }
}

/// A reporting window mapped to the playlist it feeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncWindow {
    /// Last.fm period key: `7day`, `1month` or `overall`.
    pub key: String,
    pub playlist_id: String,
    pub track_limit: usize,
}

impl SyncWindow {
    pub fn new(key: impl Into<String>, playlist_id: impl Into<String>, track_limit: usize) -> Self {
        Self {
            key: key.into(),
            playlist_id: playlist_id.into(),
            track_limit,
        }
    }

    /// Human readable name used in logs and playlist descriptions.
    pub fn label(&self) -> &str {
        match self.key.as_str() {
            "7day" => "last 7 days",
            "1month" => "last month",
            "overall" => "all time",
            other => other,
        }
    }
}

#[derive(Tabled)]
pub struct WindowTableRow {
    pub window: String,
    pub playlist: String,
    pub limit: usize,
}

/// Why a scrobble could not be mapped to a Spotify track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnresolvedReason {
    NotFound,
    RateLimited,
    Transport,
}

/// Result of resolving a single scrobble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Resolved(String),
    Unresolved(UnresolvedReason),
}

impl MatchOutcome {
    pub fn track_uri(&self) -> Option<&str> {
        match self {
            MatchOutcome::Resolved(uri) => Some(uri),
            MatchOutcome::Unresolved(_) => None,
        }
    }
}

/// A scrobble paired with the outcome of its lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub record: ScrobbleRecord,
    pub outcome: MatchOutcome,
}

// Last.fm wire types

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LastfmResponse {
    TopTracks { toptracks: TopTracks },
    Error { error: i64, message: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopTracks {
    #[serde(default)]
    pub track: Vec<LastfmTrack>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LastfmTrack {
    pub name: String,
    pub artist: LastfmArtist,
    #[serde(deserialize_with = "string_or_number")]
    pub playcount: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LastfmArtist {
    pub name: String,
}

impl From<LastfmTrack> for ScrobbleRecord {
    fn from(track: LastfmTrack) -> Self {
        ScrobbleRecord {
            track_name: track.name,
            artist_name: track.artist.name,
            play_count: track.playcount,
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

// Spotify wire types

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub tracks: SearchTracks,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchTracks {
    /// Spotify occasionally returns `null` in place of a track.
    pub items: Vec<Option<Track>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub uri: String,
    pub artists: Vec<TrackArtist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackArtist {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceTracksRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePlaylistDetailsRequest {
    pub description: String,
}
