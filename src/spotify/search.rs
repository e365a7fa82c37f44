use async_trait::async_trait;

use super::{SpotifyClient, TrackMatcher, check_status, send_with_retry};
use crate::{
    error::SyncError,
    types::{MatchOutcome, SearchResponse, Track, UnresolvedReason},
    utils, warning,
};

/// Number of candidates requested per search.
pub const SEARCH_LIMIT: u32 = 50;

impl SpotifyClient {
    /// Runs a track search and returns the candidates in provider order.
    ///
    /// `null` entries in the result list are dropped.
    pub async fn search_tracks(&self, query: &str) -> Result<Vec<Track>, SyncError> {
        let auth = self.auth_header().await?;
        let url = self.url("/search");
        let limit = SEARCH_LIMIT.to_string();

        let response = send_with_retry(|| {
            self.client
                .get(&url)
                .header(reqwest::header::AUTHORIZATION, &auth)
                .query(&[("q", query), ("type", "track"), ("limit", limit.as_str())])
        })
        .await?;

        let json = check_status(response).await?.json::<SearchResponse>().await?;
        Ok(json.tracks.items.into_iter().flatten().collect())
    }
}

/// Picks the first candidate whose name and primary artist equal the request.
///
/// Comparison ignores case and quote characters only. Remix tags, featured
/// artists or other punctuation differences make a candidate miss.
pub fn select_candidate<'a>(
    candidates: &'a [Track],
    track_name: &str,
    artist_name: &str,
) -> Option<&'a Track> {
    let wanted_track = utils::match_key(track_name);
    let wanted_artist = utils::match_key(artist_name);

    candidates.iter().find(|candidate| {
        utils::match_key(&candidate.name) == wanted_track
            && candidate
                .artists
                .first()
                .is_some_and(|artist| utils::match_key(&artist.name) == wanted_artist)
    })
}

#[async_trait]
impl TrackMatcher for SpotifyClient {
    async fn find_track(&self, track_name: &str, artist_name: &str) -> MatchOutcome {
        let query = utils::search_query(track_name, artist_name);

        let candidates = match self.search_tracks(&query).await {
            Ok(candidates) => candidates,
            Err(SyncError::RateLimited { retry_after }) => {
                warning!(
                    "Still rate limited searching {} by {} (retry after {}s), skipping.",
                    track_name,
                    artist_name,
                    retry_after
                );
                return MatchOutcome::Unresolved(UnresolvedReason::RateLimited);
            }
            Err(e) => {
                warning!("Search failed for {} by {}: {}", track_name, artist_name, e);
                return MatchOutcome::Unresolved(UnresolvedReason::Transport);
            }
        };

        if candidates.is_empty() {
            warning!(
                "Spotify failed to return any results for {} by {}.",
                track_name,
                artist_name
            );
        }

        match select_candidate(&candidates, track_name, artist_name) {
            Some(track) => MatchOutcome::Resolved(track.uri.clone()),
            None => {
                warning!(
                    "Failed to find {} by {}. Query: {}",
                    track_name,
                    artist_name,
                    query
                );
                MatchOutcome::Unresolved(UnresolvedReason::NotFound)
            }
        }
    }
}
