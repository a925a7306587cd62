use std::path::PathBuf;

use crate::{
    albums::{DEFAULT_LIMIT, image_mapping, order_by_playlist_sequence, top_n_ordered},
    cli::{files, prefix_name, print_albums_table, save_csv, save_json},
    error, info,
    management::{DataStore, read_json_file},
    success,
    types::{AlbumSummary, OrderedAlbumCsvRow, PlaylistInfo, VisualizationMetadata},
    utils,
};

pub const ORDERED_BY: &str = "playlist_sequence";

/// Reorders an extracted playlist into playlist sequence and rewrites its
/// derived files with playlist positions.
///
/// `input` defaults to the albums file `playlist` wrote for `name`.
pub async fn reorder(name: String, input: Option<PathBuf>) {
    let name = prefix_name(&name);
    let store = DataStore::from_config();
    let input = input.unwrap_or_else(|| {
        store.path(&files::playlist_file(&utils::safe_name(&name), "albums.json"))
    });

    let albums = match read_json_file::<Vec<AlbumSummary>>(&input).await {
        Ok(albums) => albums,
        Err(e) => error!("Cannot read {}: {}", input.display(), e),
    };
    info!("Loaded {} albums from {}", albums.len(), input.display());

    let ordered = order_by_playlist_sequence(albums);
    save_json(&store, &files::ordered_file(&name, "albums_ordered.json"), &ordered).await;

    let top = top_n_ordered(&ordered, DEFAULT_LIMIT);
    let metadata = VisualizationMetadata {
        extraction_date: utils::extraction_date(),
        playlist_info: Some(PlaylistInfo {
            name: name.clone(),
            total_albums: Some(ordered.len()),
            ordered_by: Some(ORDERED_BY.to_string()),
            ..PlaylistInfo::default()
        }),
        total_albums: ordered.len(),
        albums: top.clone(),
    };
    save_json(&store, &files::ordered_file(&name, "3d_metadata_ordered.json"), &metadata).await;

    let mapping = image_mapping(&top, Some(name.as_str()));
    save_json(
        &store,
        &files::ordered_file(&name, "album_image_mapping_ordered.json"),
        &mapping,
    )
    .await;

    let rows: Vec<OrderedAlbumCsvRow> = ordered.iter().map(OrderedAlbumCsvRow::from).collect();
    save_csv(&store, &files::ordered_file(&name, "albums_ordered.csv"), &rows).await;

    success!("Reordered {} albums into playlist order", ordered.len());

    println!("\nAlbums in Playlist Order:");
    let summaries: Vec<AlbumSummary> = ordered.iter().take(10).map(|o| o.album.clone()).collect();
    print_albums_table(&summaries, 10);
    if ordered.len() > 10 {
        info!("... and {} more albums", ordered.len() - 10);
    }
}
