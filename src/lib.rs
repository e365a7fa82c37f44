//! Last.fm to Spotify top tracks synchronizer.
//!
//! This library keeps a set of Spotify playlists in step with a Last.fm user's
//! most played tracks for three reporting windows (weekly, monthly, all-time).
//! A pass fetches the ranked scrobbles for each window, resolves every entry to
//! a Spotify track, and replaces the window's playlist with the resolved tracks.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the OAuth authorization flow
//! - `config` - Settings loaded from the environment and `.env` files
//! - `error` - Error taxonomy shared by every provider call
//! - `lastfm` - Last.fm top tracks client
//! - `management` - In-memory credential store
//! - `server` - Local HTTP server hosting the OAuth routes
//! - `spotify` - Spotify Web API client (tokens, search, playlists)
//! - `sync` - Pass orchestration and the interval scheduler
//! - `types` - Wire types and domain records
//! - `utils` - Normalization and small helpers

pub mod api;
pub mod config;
pub mod error;
pub mod lastfm;
pub mod management;
pub mod server;
pub mod spotify;
pub mod sync;
pub mod types;
pub mod utils;

/// A convenient Result type alias for bootstrapping code.
///
/// Used where errors of different kinds only need to be reported, never
/// matched on (server startup, command dispatch).
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Returns the timestamp prefix used on every log line.
#[doc(hidden)]
pub fn log_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Updating {} playlist...", window);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] [{}] {}", $crate::log_timestamp(), "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] [{}] {}", $crate::log_timestamp(), "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only for failures the process cannot recover from, such as missing
/// configuration at startup. Everything that happens inside a pass is logged
/// with [`warning!`] instead.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] [{}] {}", $crate::log_timestamp(), "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Recoverable failures (unresolved tracks, rate limits, skipped windows) are
/// reported through this macro.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] [{}] {}", $crate::log_timestamp(), "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
