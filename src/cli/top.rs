use crate::{
    albums::{AggregateOptions, AlbumAggregator, RankingMode},
    cli::{access_token, files, print_albums_table, save_csv, save_json, spinner},
    error, info,
    management::DataStore,
    spotify, success,
    types::{AlbumCsvRow, TimeRange, TrackRecord, VisualizationMetadata},
    utils,
};

/// Extracts the albums behind the user's top tracks.
///
/// Albums are ranked by summed track popularity unless another `mode` is
/// given. The first `limit` summaries go to `spotify_top_albums.{json,csv}`,
/// the top 40 of those to `spotify_3d_metadata.json`.
pub async fn top_albums(time_range: TimeRange, limit: u32, mode: RankingMode) {
    let token = access_token().await;

    let pb = spinner(&format!("Fetching top tracks ({time_range})..."));
    let tracks = match spotify::tracks::get_top_tracks(&token, time_range, limit).await {
        Ok(tracks) => tracks,
        Err(e) => {
            pb.finish_and_clear();
            error!("Error getting top tracks: {}", e);
        }
    };
    pb.finish_and_clear();
    info!("Fetched {} top tracks", tracks.len());

    let aggregator = AlbumAggregator::new(AggregateOptions::new(mode));
    let mut albums = aggregator.aggregate(tracks.into_iter().map(TrackRecord::from));
    albums.truncate(limit as usize);

    if albums.is_empty() {
        error!("No data extracted. Please check your Spotify credentials.");
    }
    success!("Extracted {} albums", albums.len());

    let store = DataStore::from_config();
    save_json(&store, files::TOP_ALBUMS_JSON, &albums).await;

    let rows: Vec<AlbumCsvRow> = albums.iter().map(AlbumCsvRow::from).collect();
    save_csv(&store, files::TOP_ALBUMS_CSV, &rows).await;

    let metadata = VisualizationMetadata {
        extraction_date: utils::extraction_date(),
        playlist_info: None,
        total_albums: albums.len(),
        albums: aggregator.top_n(&albums),
    };
    save_json(&store, files::TOP_METADATA_JSON, &metadata).await;

    println!("\nTop 10 Albums:");
    print_albums_table(&albums, 10);
}
