use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Local;
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

use crate::{albums::RankingMode, spotify::tracks::MAX_TOP_TRACKS, types::TimeRange};

/// Longest playlist prefix used in cover image filenames.
pub const PLAYLIST_PREFIX_LEN: usize = 20;

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

pub fn parse_time_range(s: &str) -> Result<TimeRange, String> {
    s.parse()
}

pub fn parse_ranking_mode(s: &str) -> Result<RankingMode, String> {
    s.parse()
}

/// Parses `--limit` for top tracks; the endpoint accepts 1 to 50.
pub fn parse_top_limit(s: &str) -> Result<u32, String> {
    let limit: u32 = s
        .trim()
        .parse()
        .map_err(|e| format!("invalid limit '{s}': {e}"))?;
    if !(1..=MAX_TOP_TRACKS).contains(&limit) {
        return Err(format!("limit must be between 1 and {MAX_TOP_TRACKS}, got {limit}"));
    }
    Ok(limit)
}

/// Keeps alphanumerics, spaces, `-` and `_`, then trims trailing whitespace.
pub fn sanitize(value: &str) -> String {
    let kept: String = value
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    kept.trim_end().to_string()
}

/// Sanitized name with spaces replaced by underscores, used in file names.
pub fn safe_name(value: &str) -> String {
    sanitize(value).replace(' ', "_")
}

/// Filename prefix for a playlist's cover images, at most 20 characters.
pub fn playlist_prefix(playlist_name: &str) -> String {
    safe_name(playlist_name)
        .chars()
        .take(PLAYLIST_PREFIX_LEN)
        .collect()
}

/// Cover image filename, e.g. `ROOM_03_Frank_Ocean_Blonde.jpg`.
///
/// Top-albums covers have no prefix.
pub fn cover_filename(prefix: Option<&str>, position: usize, artist: &str, name: &str) -> String {
    let base = format!("{position:02}_{}_{}.jpg", sanitize(artist), sanitize(name));
    let filename = match prefix {
        Some(p) if !p.is_empty() => format!("{p}_{base}"),
        _ => base,
    };
    filename.replace(' ', "_")
}

/// Extracts the playlist id from a share URL, or returns the input as is.
///
/// `https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M?si=abc` yields
/// `37i9dQZF1DXcBWIGoYBM5M`.
pub fn playlist_id_from_input(input: &str) -> String {
    let input = input.trim();
    match input.split_once("playlist/") {
        Some((_, rest)) => rest
            .split(['?', '/'])
            .next()
            .unwrap_or_default()
            .to_string(),
        None => input
            .strip_prefix("spotify:playlist:")
            .unwrap_or(input)
            .to_string(),
    }
}

/// Local timestamp in the format the visualization expects.
pub fn extraction_date() -> String {
    Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

pub fn format_duration(duration_ms: u64) -> String {
    let total_secs = duration_ms / 1000;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}
