use std::{path::PathBuf, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;

use crate::{
    albums::image_mapping,
    cli::{files, save_json},
    config, error, info,
    management::{DataStore, list_files, read_json_file},
    spotify::covers::{download_client, download_cover},
    success,
    types::VisualizationMetadata,
    utils, warning,
};

const DOWNLOAD_DELAY: Duration = Duration::from_millis(100);

/// Which extraction to download covers for.
#[derive(Debug, Clone, PartialEq)]
pub enum CoverSource {
    /// The most recently written playlist metadata file.
    Latest,
    /// The playlist with this name.
    Playlist(String),
    AllPlaylists,
    TopAlbums,
}

pub async fn covers(source: CoverSource) {
    let store = DataStore::from_config();

    let targets: Vec<PathBuf> = match source {
        CoverSource::Latest => {
            match store
                .latest(files::PLAYLIST_PREFIX, files::PLAYLIST_METADATA_SUFFIX)
                .await
            {
                Ok(Some(path)) => vec![path],
                Ok(None) => error!("No playlist metadata files found. Run albumroom playlist first."),
                Err(e) => error!("Cannot read data directory: {}", e),
            }
        }
        CoverSource::Playlist(name) => {
            let file = files::playlist_metadata(&utils::safe_name(&name));
            if !store.exists(&file) {
                error!("Metadata file {} not found", store.path(&file).display());
            }
            vec![store.path(&file)]
        }
        CoverSource::AllPlaylists => {
            match store
                .list(files::PLAYLIST_PREFIX, files::PLAYLIST_METADATA_SUFFIX)
                .await
            {
                Ok(paths) if paths.is_empty() => {
                    error!("No playlist metadata files found. Run albumroom playlist first.")
                }
                Ok(paths) => paths,
                Err(e) => error!("Cannot read data directory: {}", e),
            }
        }
        CoverSource::TopAlbums => {
            if !store.exists(files::TOP_METADATA_JSON) {
                error!("No top albums metadata found. Run albumroom top first.");
            }
            vec![store.path(files::TOP_METADATA_JSON)]
        }
    };

    let client = match download_client() {
        Ok(client) => client,
        Err(e) => error!("Failed to create HTTP client: {}", e),
    };

    for path in targets {
        let metadata = match read_json_file::<VisualizationMetadata>(&path).await {
            Ok(metadata) => metadata,
            Err(e) => {
                warning!("Error reading {}: {}", path.display(), e);
                continue;
            }
        };
        download_for(&client, &store, metadata).await;
    }
}

async fn download_for(client: &Client, store: &DataStore, metadata: VisualizationMetadata) {
    let prefix = metadata
        .playlist_info
        .as_ref()
        .map(|p| utils::playlist_prefix(&p.name));

    match &metadata.playlist_info {
        Some(p) => info!("Downloading {} covers for '{}'", metadata.albums.len(), p.name),
        None => info!("Downloading {} covers for top albums", metadata.albums.len()),
    }

    let albums_dir = config::albums_dir();
    let mapping = image_mapping(&metadata.albums, prefix.as_deref());

    let pb = ProgressBar::new(metadata.albums.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut downloaded = 0;
    let mut failed = Vec::new();

    for album in &metadata.albums {
        let position = album.playlist_position.unwrap_or(album.rank);
        let filename =
            utils::cover_filename(prefix.as_deref(), position, &album.artist, &album.name);
        pb.set_message(format!("{} - {}", album.artist, album.name));

        match download_cover(client, &album.image_url, &albums_dir.join(&filename)).await {
            Ok(_) => downloaded += 1,
            Err(e) => failed.push(format!("{} - {}: {}", album.artist, album.name, e)),
        }

        pb.inc(1);
        tokio::time::sleep(DOWNLOAD_DELAY).await;
    }
    pb.finish_and_clear();

    for failure in &failed {
        warning!("Failed to download {}", failure);
    }
    success!(
        "Downloaded {} covers to {} ({} failed)",
        downloaded,
        albums_dir.display(),
        failed.len()
    );

    let mapping_file = match &prefix {
        Some(prefix) => files::image_mapping(prefix),
        None => files::TOP_IMAGE_MAPPING_JSON.to_string(),
    };
    save_json(store, &mapping_file, &mapping).await;

    if let Some(prefix) = &prefix {
        let marker = format!("{prefix}_");
        match list_files(&albums_dir, |name| {
            name.starts_with(&marker) && name.ends_with(".jpg")
        })
        .await
        {
            Ok(found) => info!("{} images with prefix '{}' in {}", found.len(), prefix, albums_dir.display()),
            Err(e) => warning!("Cannot verify images: {}", e),
        }
    }
}
