use async_trait::async_trait;
use chrono::Local;

use super::{PlaylistUpdater, SpotifyClient, check_status, send_with_retry};
use crate::{
    error::SyncError,
    types::{ReplaceTracksRequest, SyncWindow, UpdatePlaylistDetailsRequest},
    utils, warning,
};

impl SpotifyClient {
    /// Writes a new description on a playlist owned by the user.
    pub async fn update_description(
        &self,
        playlist_id: &str,
        description: &str,
    ) -> Result<(), SyncError> {
        let auth = self.auth_header().await?;
        let url = self.url(&format!("/playlists/{playlist_id}"));
        let body = UpdatePlaylistDetailsRequest {
            description: description.to_string(),
        };

        let response = send_with_retry(|| {
            self.client
                .put(&url)
                .header(reqwest::header::AUTHORIZATION, &auth)
                .json(&body)
        })
        .await?;

        check_status(response).await?;
        Ok(())
    }
}

#[async_trait]
impl PlaylistUpdater for SpotifyClient {
    async fn replace_contents(
        &self,
        playlist_id: &str,
        track_uris: &[String],
    ) -> Result<(), SyncError> {
        let auth = self.auth_header().await?;
        let url = self.url(&format!("/playlists/{playlist_id}/tracks"));
        let body = ReplaceTracksRequest {
            uris: track_uris.to_vec(),
        };

        let response = send_with_retry(|| {
            self.client
                .put(&url)
                .header(reqwest::header::AUTHORIZATION, &auth)
                .json(&body)
        })
        .await?;

        check_status(response).await?;
        Ok(())
    }

    async fn set_description(
        &self,
        window: &SyncWindow,
        total_play_count: u64,
        unresolved_count: usize,
    ) {
        let description = utils::playlist_description(
            window,
            total_play_count,
            unresolved_count,
            Local::now().date_naive(),
        );

        if let Err(e) = self
            .update_description(&window.playlist_id, &description)
            .await
        {
            warning!(
                "Failed to update description of {} playlist: {}",
                window.key,
                e
            );
        }
    }
}
