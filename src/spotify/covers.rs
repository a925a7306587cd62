use std::{path::Path, time::Duration};

use reqwest::Client;

use crate::Res;

pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(10);

pub fn download_client() -> Result<Client, reqwest::Error> {
    Client::builder().timeout(DOWNLOAD_TIMEOUT).build()
}

/// Downloads one cover image and writes it to `path`.
///
/// Non-success responses are errors; nothing is written for them.
pub async fn download_cover(client: &Client, url: &str, path: &Path) -> Res<u64> {
    if url.is_empty() {
        return Err("album has no cover image url".into());
    }

    let bytes = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;

    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }
    async_fs::write(path, &bytes).await?;
    Ok(bytes.len() as u64)
}
