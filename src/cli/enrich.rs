use std::{collections::HashMap, path::PathBuf};

use crate::{
    albums::apply_tags,
    cli::{files, prefix_name, save_json},
    error, info,
    management::{DataStore, read_json_file},
    success,
    types::{AlbumTags, ImageMappingEntry},
    warning,
};

/// Adds genres, moods and top tracks to the ordered image mapping.
///
/// `catalog` is a JSON object keyed by album name:
///
/// ```json
/// { "Blonde": { "genres": ["R&B"], "moods": ["Dreamy"], "top_tracks": ["Nikes"] } }
/// ```
pub async fn enrich(name: String, catalog: PathBuf) {
    let name = prefix_name(&name);
    let store = DataStore::from_config();

    let tags = match read_json_file::<HashMap<String, AlbumTags>>(&catalog).await {
        Ok(tags) => tags,
        Err(e) => error!("Cannot read catalog {}: {}", catalog.display(), e),
    };

    let mapping_file = files::ordered_file(&name, "album_image_mapping_ordered.json");
    let mut entries = match store.read_json::<Vec<ImageMappingEntry>>(&mapping_file).await {
        Ok(entries) => entries,
        Err(e) => error!(
            "Cannot read {}: {}. Run albumroom reorder first.",
            store.path(&mapping_file).display(),
            e
        ),
    };
    info!("Adding metadata to {} albums", entries.len());

    let defaulted = apply_tags(&mut entries, &tags);
    for album in &defaulted {
        warning!("No catalog entry for '{}', using defaults", album);
    }

    save_json(
        &store,
        &files::ordered_file(&name, "album_image_mapping_with_metadata.json"),
        &entries,
    )
    .await;

    success!(
        "Added metadata to {} albums ({} with defaults)",
        entries.len(),
        defaulted.len()
    );
}
