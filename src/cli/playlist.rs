use tabled::Table;

use crate::{
    albums::{AggregateOptions, AlbumAggregator, RankingMode},
    cli::{access_token, files, print_albums_table, save_csv, save_json, spinner},
    error, info,
    management::{DataStore, read_json_file},
    spotify, success,
    types::{AlbumCsvRow, PlaylistTableRow, TrackRecord, VisualizationMetadata},
    utils, warning,
};

/// Extracts the albums of one playlist.
///
/// Albums are ranked by how many of their tracks the playlist contains, then
/// by summed popularity, unless another `mode` is given. `limit` caps the
/// number of playlist items fetched.
pub async fn playlist(source: String, limit: Option<usize>, mode: RankingMode) {
    let playlist_id = utils::playlist_id_from_input(&source);
    if playlist_id.is_empty() {
        error!("No playlist URL or ID provided");
    }

    let token = access_token().await;

    info!("Getting playlist information...");
    let playlist_info = match spotify::playlists::get_playlist(&token, &playlist_id).await {
        Ok(info) => info,
        Err(e) => error!("Could not retrieve playlist information: {}", e),
    };
    success!("Playlist: {}", playlist_info.name);
    info!("Owner: {}", playlist_info.owner);
    info!("Tracks: {}", playlist_info.total_tracks);

    let pb = spinner("Extracting playlist tracks...");
    let items = match spotify::playlists::get_playlist_tracks(&token, &playlist_id, limit).await {
        Ok(items) => items,
        Err(e) => {
            pb.finish_and_clear();
            error!("Error getting playlist tracks: {}", e);
        }
    };
    pb.finish_and_clear();

    if items.is_empty() {
        error!("No tracks found in playlist");
    }
    success!("Extracted {} tracks", items.len());

    info!("Processing album data...");
    let aggregator = AlbumAggregator::new(AggregateOptions::new(mode));
    let albums = aggregator.aggregate(items.into_iter().filter_map(TrackRecord::from_playlist_item));

    if albums.is_empty() {
        error!("No album data extracted");
    }
    success!("Found {} unique albums", albums.len());

    let safe_name = utils::safe_name(&playlist_info.name);
    let store = DataStore::from_config();

    save_json(&store, &files::playlist_file(&safe_name, "albums.json"), &albums).await;

    let rows: Vec<AlbumCsvRow> = albums.iter().map(AlbumCsvRow::from).collect();
    save_csv(&store, &files::playlist_file(&safe_name, "albums.csv"), &rows).await;

    let playlist_name = playlist_info.name.clone();
    let metadata = VisualizationMetadata {
        extraction_date: utils::extraction_date(),
        playlist_info: Some(playlist_info),
        total_albums: albums.len(),
        albums: aggregator.top_n(&albums),
    };
    save_json(&store, &files::playlist_metadata(&safe_name), &metadata).await;

    println!("\nTop Albums in '{playlist_name}':");
    print_albums_table(&albums, 10);
}

/// Lists the playlists extracted so far, with their album counts.
pub async fn list_playlists() {
    let store = DataStore::from_config();
    let paths = match store
        .list(files::PLAYLIST_PREFIX, files::PLAYLIST_METADATA_SUFFIX)
        .await
    {
        Ok(paths) => paths,
        Err(e) => error!("Cannot read data directory: {}", e),
    };

    if paths.is_empty() {
        warning!("No playlist metadata files found. Run albumroom playlist first.");
        return;
    }

    let mut rows: Vec<PlaylistTableRow> = Vec::new();
    for path in paths {
        let file = path
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_default();

        match read_json_file::<VisualizationMetadata>(&path).await {
            Ok(metadata) => rows.push(PlaylistTableRow {
                name: metadata
                    .playlist_info
                    .map(|p| p.name)
                    .unwrap_or_else(|| file.clone()),
                albums: metadata.albums.len(),
                file,
            }),
            Err(e) => warning!("Error reading {}: {}", file, e),
        }
    }

    println!("{}", Table::new(rows));
}
