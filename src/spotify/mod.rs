//! # Spotify Integration Module
//!
//! Thin client for the parts of the Spotify Web API albumroom needs. Each
//! submodule covers one area:
//!
//! - [`auth`] - OAuth 2.0 PKCE flow, code exchange and token refresh
//! - [`tracks`] - the user's top tracks (`GET /me/top/tracks`)
//! - [`playlists`] - playlist details and offset-paginated playlist items
//! - [`covers`] - plain HTTP download of cover art
//!
//! ## Error Handling
//!
//! All JSON requests go through [`get_json`], which retries transient
//! failures the same way everywhere:
//! - **502 Bad Gateway**: wait 10 seconds and retry
//! - **429 Too Many Requests**: wait for `Retry-After` (up to 120 seconds)
//!   and retry; longer waits are reported and the error is returned
//!
//! Everything else is returned to the caller as a `reqwest::Error`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let mut token_mgr = TokenManager::load().await?;
//! let token = token_mgr.get_valid_token().await;
//! let tracks = spotify::tracks::get_top_tracks(&token, TimeRange::LongTerm, 50).await?;
//! ```

pub mod auth;
pub mod covers;
pub mod playlists;
pub mod tracks;

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tokio::time::sleep;

use crate::{config, warning};

const BAD_GATEWAY_BACKOFF: Duration = Duration::from_secs(10);
const MAX_RETRY_AFTER_SECS: u64 = 120;

/// Builds a full API URL from a path such as `/me/top/tracks`.
pub fn api_url(path: &str) -> String {
    format!(
        "{uri}/{path}",
        uri = config::spotify_apiurl().trim_end_matches('/'),
        path = path.trim_start_matches('/')
    )
}

/// Performs an authenticated GET and decodes the JSON body.
pub async fn get_json<T>(client: &Client, url: &str, token: &str) -> Result<T, reqwest::Error>
where
    T: DeserializeOwned,
{
    loop {
        let response = client.get(url).bearer_auth(token).send().await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(1);
            if retry_after <= MAX_RETRY_AFTER_SECS {
                sleep(Duration::from_secs(retry_after)).await;
                continue;
            }
            warning!(
                "Retry after has reached an abnormal high of {} seconds. Try again later.",
                retry_after
            );
        }

        let response = match response.error_for_status() {
            Ok(valid_response) => valid_response,
            Err(err) => {
                if err.status() == Some(StatusCode::BAD_GATEWAY) {
                    sleep(BAD_GATEWAY_BACKOFF).await;
                    continue;
                }
                return Err(err);
            }
        };

        return response.json::<T>().await;
    }
}
