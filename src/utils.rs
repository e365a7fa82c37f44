use base64::{Engine, engine::general_purpose::STANDARD};
use rand::{Rng, distr::Alphanumeric};

use crate::types::SyncWindow;

const QUOTES: [char; 2] = ['\'', '"'];

/// Generates the CSRF nonce carried through the authorization redirect.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}

/// Builds the `Authorization: Basic` value for client credentials.
pub fn basic_auth_header(client_id: &str, client_secret: &str) -> String {
    let encoded = STANDARD.encode(format!("{client_id}:{client_secret}"));
    format!("Basic {encoded}")
}

/// Normalizes a track or artist name for use in a search query.
///
/// Strips quote characters, turns the first hyphen into a space and lowercases.
pub fn normalize_query_field(value: &str) -> String {
    let stripped: String = value.chars().filter(|c| !QUOTES.contains(c)).collect();
    stripped.replacen('-', " ", 1).to_lowercase()
}

/// Key used to compare a search candidate with the requested name.
///
/// Equality on this key is the match rule: case and quote characters are
/// ignored, everything else must be identical.
pub fn match_key(value: &str) -> String {
    value
        .chars()
        .filter(|c| !QUOTES.contains(c))
        .collect::<String>()
        .to_lowercase()
}

/// Builds the field-scoped Spotify search query for a track.
pub fn search_query(track_name: &str, artist_name: &str) -> String {
    format!(
        "track:\"{}\" artist:\"{}\"",
        normalize_query_field(track_name),
        normalize_query_field(artist_name)
    )
}

/// Playlist description summarizing the last sync of a window.
pub fn playlist_description(
    window: &SyncWindow,
    total_play_count: u64,
    unresolved_count: usize,
    updated_on: chrono::NaiveDate,
) -> String {
    let health = match unresolved_count {
        0 => "All tracks found on Spotify.".to_string(),
        1 => "1 track could not be found on Spotify.".to_string(),
        n => format!("{n} tracks could not be found on Spotify."),
    };

    format!(
        "Most played tracks on Last.fm, {label}. {total_play_count} plays. {health} Updated {updated_on}.",
        label = window.label(),
        updated_on = updated_on.format("%Y-%m-%d"),
    )
}

/// Parses a `Retry-After` header value in seconds.
///
/// Falls back to one second when the header is missing or not a number.
pub fn parse_retry_after(value: Option<&str>) -> u64 {
    value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(1)
}
