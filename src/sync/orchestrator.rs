use std::sync::Arc;

use crate::{
    error::SyncError,
    info,
    lastfm::ScrobbleSource,
    management::TokenProvider,
    spotify::{PlaylistUpdater, TrackMatcher},
    success,
    types::{MatchOutcome, MatchResult, ScrobbleRecord, SyncWindow},
    warning,
};

/// Matching result for one window, before anything is written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciliation {
    /// Every fetched record with its lookup outcome, in rank order.
    pub matches: Vec<MatchResult>,
    /// Resolved URIs in rank order, cut to the window limit.
    pub track_uris: Vec<String>,
    /// Play counts summed over the tracks in `track_uris`.
    pub total_play_count: u64,
    pub unresolved_count: usize,
}

/// Resolves `records` one at a time and keeps the first `limit` hits.
///
/// Duplicates are kept: two records resolving to the same URI both land in
/// the playlist.
///
/// # Arguments
///
/// * `records` - Top tracks in rank order
/// * `limit` - Maximum number of tracks sent to the playlist
/// * `matcher` - Lookup used for every record, one call in flight at a time
///
/// # Returns
///
/// A [`Reconciliation`] where `unresolved_count` counts all of `records` while
/// `total_play_count` only sums the tracks that survived the limit.
///
/// # Example
///
/// ```ignore
/// let result = reconcile(records, window.track_limit, matcher.as_ref()).await;
/// updater.replace_contents(&window.playlist_id, &result.track_uris).await?;
/// ```
pub async fn reconcile(
    records: Vec<ScrobbleRecord>,
    limit: usize,
    matcher: &dyn TrackMatcher,
) -> Reconciliation {
    let mut matches = Vec::with_capacity(records.len());
    let mut resolved: Vec<(String, u64)> = Vec::new();
    let mut unresolved_count = 0;

    for record in records {
        let outcome = matcher
            .find_track(&record.track_name, &record.artist_name)
            .await;

        match &outcome {
            MatchOutcome::Resolved(uri) => resolved.push((uri.clone(), record.play_count)),
            MatchOutcome::Unresolved(_) => unresolved_count += 1,
        }
        matches.push(MatchResult { record, outcome });
    }

    resolved.truncate(limit);
    let total_play_count = resolved.iter().map(|(_, plays)| plays).sum();

    Reconciliation {
        matches,
        track_uris: resolved.into_iter().map(|(uri, _)| uri).collect(),
        total_play_count,
        unresolved_count,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WindowStatus {
    /// Playlist content and description were written.
    Updated,
    /// The source returned nothing; the playlist was left alone.
    Skipped,
    /// Replacing the playlist content failed.
    Failed(String),
}

/// Per-window statistics of a pass.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowReport {
    pub window: String,
    pub fetched: usize,
    pub resolved: usize,
    pub unresolved: usize,
    pub sent: usize,
    pub total_play_count: u64,
    pub status: WindowStatus,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassReport {
    pub windows: Vec<WindowReport>,
}

impl PassReport {
    pub fn failed_windows(&self) -> usize {
        self.windows
            .iter()
            .filter(|w| matches!(w.status, WindowStatus::Failed(_)))
            .count()
    }
}

/// Runs sync passes across the configured windows.
///
/// Windows are processed one after another, and inside a window one search
/// is in flight at a time. The provider rate limit is shared by all calls.
pub struct SyncOrchestrator {
    tokens: Arc<dyn TokenProvider>,
    source: Arc<dyn ScrobbleSource>,
    matcher: Arc<dyn TrackMatcher>,
    updater: Arc<dyn PlaylistUpdater>,
    windows: Vec<SyncWindow>,
}

impl SyncOrchestrator {
    pub fn new(
        tokens: Arc<dyn TokenProvider>,
        source: Arc<dyn ScrobbleSource>,
        matcher: Arc<dyn TrackMatcher>,
        updater: Arc<dyn PlaylistUpdater>,
        windows: Vec<SyncWindow>,
    ) -> Self {
        Self {
            tokens,
            source,
            matcher,
            updater,
            windows,
        }
    }

    pub fn tokens(&self) -> Arc<dyn TokenProvider> {
        Arc::clone(&self.tokens)
    }

    pub fn windows(&self) -> &[SyncWindow] {
        &self.windows
    }

    /// Runs one full pass.
    ///
    /// Starts with a token refresh; if that fails nothing else happens and the
    /// error is returned. Window level failures are recorded in the report.
    ///
    /// # Returns
    ///
    /// - `Ok(PassReport)` - one [`WindowReport`] per window, in configured order
    /// - `Err(SyncError)` - the refresh failed and no window was touched
    ///
    /// # Window Handling
    ///
    /// - an empty fetch marks the window `Skipped` and writes nothing
    /// - a failed replace marks it `Failed` and leaves the description alone
    /// - otherwise the content is replaced, then the description is updated
    pub async fn run_pass(&self) -> Result<PassReport, SyncError> {
        if let Err(e) = self.tokens.refresh().await {
            warning!("Token refresh failed, skipping this pass: {}", e);
            return Err(e);
        }

        let mut report = PassReport::default();
        for window in &self.windows {
            report.windows.push(self.sync_window(window).await);
        }

        match report.failed_windows() {
            0 => success!("Success!"),
            n => warning!("Pass finished with {} failed window(s).", n),
        }
        Ok(report)
    }

    async fn sync_window(&self, window: &SyncWindow) -> WindowReport {
        info!("Updating {} playlist...", window.key);

        let records = self.source.top_tracks(&window.key).await;
        let fetched = records.len();
        if records.is_empty() {
            info!("No top tracks for {}, leaving playlist untouched.", window.key);
            return WindowReport {
                window: window.key.clone(),
                fetched,
                resolved: 0,
                unresolved: 0,
                sent: 0,
                total_play_count: 0,
                status: WindowStatus::Skipped,
            };
        }

        let reconciliation = reconcile(records, window.track_limit, self.matcher.as_ref()).await;
        let mut report = WindowReport {
            window: window.key.clone(),
            fetched,
            resolved: fetched - reconciliation.unresolved_count,
            unresolved: reconciliation.unresolved_count,
            sent: reconciliation.track_uris.len(),
            total_play_count: reconciliation.total_play_count,
            status: WindowStatus::Updated,
        };

        if let Err(e) = self
            .updater
            .replace_contents(&window.playlist_id, &reconciliation.track_uris)
            .await
        {
            warning!("Failed to replace {} playlist: {}", window.key, e);
            report.status = WindowStatus::Failed(e.to_string());
            return report;
        }

        self.updater
            .set_description(
                window,
                reconciliation.total_play_count,
                reconciliation.unresolved_count,
            )
            .await;

        info!(
            "{}: {} fetched, {} resolved, {} not found, {} sent ({} plays).",
            report.window,
            report.fetched,
            report.resolved,
            report.unresolved,
            report.sent,
            report.total_play_count
        );
        report
    }
}
