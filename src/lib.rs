//! albumroom library
//!
//! Extracts a user's Spotify listening data, condenses it into ranked album
//! summaries and prepares the JSON, CSV and cover art files the music room
//! front-end loads.
//!
//! # Modules
//!
//! - `albums` - Album aggregation, ranking and playlist ordering
//! - `api` - HTTP endpoints for the local OAuth callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration from environment variables and `.env`
//! - `management` - Token cache and the JSON/CSV data store
//! - `matching` - Fuzzy matching of records against image filenames
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API client
//! - `types` - Data structures and type definitions
//! - `utils` - Filename, PKCE and parsing helpers
//!
//! # Example
//!
//! ```
//! use albumroom::albums::{AggregateOptions, AlbumAggregator, RankingMode};
//! use albumroom::types::TrackRecord;
//!
//! let aggregator = AlbumAggregator::new(AggregateOptions::new(RankingMode::Popularity));
//! let albums = aggregator.aggregate(Vec::<TrackRecord>::new());
//! assert!(aggregator.top_n(&albums).is_empty());
//! ```

pub mod albums;
pub mod api;
pub mod cli;
pub mod config;
pub mod management;
pub mod matching;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// Result type used by orchestration code.
///
/// The boxed error is `Send + Sync` so results can cross `tokio::spawn`
/// boundaries.
///
/// ```
/// use albumroom::Res;
///
/// async fn load_count() -> Res<usize> {
///     Ok(40)
/// }
/// ```
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints a status line with a blue `o` marker.
///
/// ```
/// info!("Found {} albums", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a completion line with a green checkmark.
///
/// ```
/// success!("Downloaded {} covers", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a red `!` line and exits the process with status 1.
///
/// Only the CLI layer uses this; library functions return errors instead.
///
/// ```
/// error!("Cannot read metadata file: {}", e);
/// // unreachable
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a yellow `!` line for problems that do not stop the command, such as
/// a single failed download.
///
/// ```
/// warning!("No image found for {} - {}", artist, name);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
