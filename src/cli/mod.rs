//! # CLI Module
//!
//! User-facing commands. Each command is one step of the pipeline that feeds
//! the music room front-end:
//!
//! ```text
//! auth ──► top / playlist ──► covers ──► reorder ──► rename ──► enrich ──► relink
//!          (extract albums)   (images)   (playlist order)       (tags)     (fix paths)
//! ```
//!
//! ## Commands
//!
//! - [`auth`] - Spotify OAuth 2.0 PKCE login
//! - [`top_albums`] - albums behind the user's top tracks, ranked by popularity
//! - [`playlist`] - albums of a playlist, ranked by how many tracks they contribute
//! - [`list_playlists`] - playlists extracted so far
//! - [`covers`] - downloads cover art for an extraction and writes the image mapping
//! - [`reorder`] - puts playlist albums into playlist order
//! - [`rename`] - renames downloaded covers to match playlist order
//! - [`enrich`] - adds genres, moods and top tracks from a catalog file
//! - [`relink`] - fuzzy-matches mapping entries to the images actually on disk
//!
//! ## Conventions
//!
//! Commands print progress with the crate's `info!`/`success!`/`warning!`
//! macros. Fatal problems (no token, unreadable input) end the process through
//! `error!`; per-album problems are warnings and the command carries on.
//!
//! ## Files
//!
//! JSON and CSV files are read from and written to `DATA_DIR`, cover images
//! to `ALBUMS_DIR` (see [`crate::config`]).

mod auth;
mod covers;
mod enrich;
mod playlist;
mod relink;
mod rename;
mod reorder;
mod top;

pub use auth::auth;
pub use covers::CoverSource;
pub use covers::covers;
pub use enrich::enrich;
pub use playlist::list_playlists;
pub use playlist::playlist;
pub use relink::relink;
pub use rename::rename;
pub use reorder::reorder;
pub use top::top_albums;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tabled::Table;

use crate::{
    error, info,
    management::{DataStore, TokenManager},
    success,
    types::{AlbumSummary, AlbumTableRow},
    utils, warning,
};

/// File names shared between commands.
pub mod files {
    pub const TOP_ALBUMS_JSON: &str = "spotify_top_albums.json";
    pub const TOP_ALBUMS_CSV: &str = "spotify_top_albums.csv";
    pub const TOP_METADATA_JSON: &str = "spotify_3d_metadata.json";
    pub const TOP_IMAGE_MAPPING_JSON: &str = "album_image_mapping.json";

    pub const PLAYLIST_PREFIX: &str = "playlist_";
    pub const PLAYLIST_METADATA_SUFFIX: &str = "_3d_metadata.json";

    /// Files written by `playlist`, e.g. `playlist_ROOM_albums.json`.
    pub fn playlist_file(safe_name: &str, kind: &str) -> String {
        format!("{PLAYLIST_PREFIX}{safe_name}_{kind}")
    }

    pub fn playlist_metadata(safe_name: &str) -> String {
        format!("{PLAYLIST_PREFIX}{safe_name}{PLAYLIST_METADATA_SUFFIX}")
    }

    pub fn image_mapping(prefix: &str) -> String {
        format!("{prefix}_album_image_mapping.json")
    }

    /// Files written by `reorder` and later steps, e.g.
    /// `ROOM_playlist_album_image_mapping_ordered.json`.
    pub fn ordered_file(name: &str, kind: &str) -> String {
        format!("{name}_playlist_{kind}")
    }
}

/// File prefix for a `--name` argument. Anything `utils::safe_name` would
/// change, such as spaces or path separators, is replaced before the name is
/// used in a file name.
pub(crate) fn prefix_name(name: &str) -> String {
    let safe = utils::safe_name(name);
    if safe.is_empty() {
        error!("Name '{}' has no letters or digits to use as file prefix", name);
    }
    if safe != name {
        info!("Using '{}' as file prefix", safe);
    }
    safe
}

/// Loads the cached token, refreshing it if needed. Exits when there is none.
pub(crate) async fn access_token() -> String {
    let mut token_mgr = match TokenManager::load().await {
        Ok(manager) => manager,
        Err(e) => {
            error!(
                "Failed to load token. Please run albumroom auth\n Error: {}",
                e
            );
        }
    };

    token_mgr.get_valid_token().await
}

pub(crate) fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}

pub(crate) async fn save_json<T>(store: &DataStore, file: &str, value: &T)
where
    T: Serialize + ?Sized,
{
    match store.write_json(file, value).await {
        Ok(path) => success!("Data saved to {}", path.display()),
        Err(e) => warning!("Failed to save {}: {}", file, e),
    }
}

pub(crate) async fn save_csv<T>(store: &DataStore, file: &str, rows: &[T])
where
    T: Serialize,
{
    if rows.is_empty() {
        return;
    }

    match store.write_csv(file, rows).await {
        Ok(path) => success!("Data saved to {}", path.display()),
        Err(e) => warning!("Failed to save {}: {}", file, e),
    }
}

/// Prints the first `count` albums as a table.
pub(crate) fn print_albums_table(albums: &[AlbumSummary], count: usize) {
    let rows: Vec<AlbumTableRow> = albums
        .iter()
        .take(count)
        .enumerate()
        .map(|(i, a)| AlbumTableRow {
            rank: i + 1,
            name: a.name.clone(),
            artist: a.artist.clone(),
            tracks: a.track_count,
            popularity: a.total_popularity,
            length: utils::format_duration(a.tracks.iter().map(|t| t.duration_ms).sum()),
        })
        .collect();

    println!("{}", Table::new(rows));
}
