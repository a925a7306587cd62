use reqwest::Client;

use crate::{
    spotify::{api_url, get_json},
    types::{SpotifyTrack, TimeRange, TopTracksResponse},
};

/// Largest page the top-items endpoint accepts.
pub const MAX_TOP_TRACKS: u32 = 50;

/// Retrieves the user's top tracks for a time range.
///
/// `limit` is clamped to `1..=50`, the range the endpoint accepts.
///
/// # Example
///
/// ```rust,ignore
/// let tracks = get_top_tracks(&token, TimeRange::LongTerm, 50).await?;
/// println!("Fetched {} tracks", tracks.len());
/// ```
pub async fn get_top_tracks(
    token: &str,
    time_range: TimeRange,
    limit: u32,
) -> Result<Vec<SpotifyTrack>, reqwest::Error> {
    let url = format!(
        "{base}?time_range={time_range}&limit={limit}",
        base = api_url("/me/top/tracks"),
        time_range = time_range,
        limit = limit.clamp(1, MAX_TOP_TRACKS)
    );

    let client = Client::new();
    let res = get_json::<TopTracksResponse>(&client, &url, token).await?;
    Ok(res.items)
}
