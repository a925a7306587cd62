use std::time::Duration;

use reqwest::Client;
use tokio::time::sleep;

use crate::{
    spotify::{api_url, get_json},
    types::{PlaylistInfo, PlaylistResponse, PlaylistTrackItem, PlaylistTracksResponse},
};

/// Items requested per page; the endpoint's maximum.
pub const PAGE_SIZE: usize = 100;

/// Pause between page requests.
pub const PAGE_DELAY: Duration = Duration::from_millis(100);

/// Retrieves name, owner and size of a playlist.
pub async fn get_playlist(token: &str, playlist_id: &str) -> Result<PlaylistInfo, reqwest::Error> {
    let url = format!(
        "{base}?fields=id,name,description,owner(id,display_name),tracks(total),external_urls",
        base = api_url(&format!("/playlists/{playlist_id}"))
    );

    let client = Client::new();
    let playlist = get_json::<PlaylistResponse>(&client, &url, token).await?;
    Ok(PlaylistInfo::from(playlist))
}

/// Retrieves all items of a playlist, page by page.
///
/// The offset advances by [`PAGE_SIZE`] until an empty page comes back. With
/// `limit` set, fetching stops once that many items were collected and the
/// result is truncated to it.
pub async fn get_playlist_tracks(
    token: &str,
    playlist_id: &str,
    limit: Option<usize>,
) -> Result<Vec<PlaylistTrackItem>, reqwest::Error> {
    let client = Client::new();
    let base = api_url(&format!("/playlists/{playlist_id}/tracks"));
    let mut items: Vec<PlaylistTrackItem> = Vec::new();
    let mut offset = 0;

    loop {
        let url = format!("{base}?offset={offset}&limit={PAGE_SIZE}");
        let page = get_json::<PlaylistTracksResponse>(&client, &url, token).await?;

        if page.items.is_empty() {
            break;
        }

        items.extend(page.items);
        offset += PAGE_SIZE;

        if let Some(limit) = limit {
            if items.len() >= limit {
                items.truncate(limit);
                break;
            }
        }

        sleep(PAGE_DELAY).await;
    }

    Ok(items)
}
