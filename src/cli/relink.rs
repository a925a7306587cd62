use crate::{
    cli::{files, prefix_name, save_json},
    config, error, info,
    management::{DataStore, list_files},
    matching::relink_entries,
    success,
    types::ImageMappingEntry,
    warning,
};

/// Points every entry of the enriched mapping at the closest `.jpg` actually
/// present in the albums directory.
pub async fn relink(name: String, cutoff: f64) {
    let name = prefix_name(&name);
    let store = DataStore::from_config();
    let mapping_file = files::ordered_file(&name, "album_image_mapping_with_metadata.json");

    let mut entries = match store.read_json::<Vec<ImageMappingEntry>>(&mapping_file).await {
        Ok(entries) => entries,
        Err(e) => error!(
            "Cannot read {}: {}. Run albumroom enrich first.",
            store.path(&mapping_file).display(),
            e
        ),
    };

    let albums_dir = config::albums_dir();
    let images: Vec<String> = match list_files(&albums_dir, |f| f.to_lowercase().ends_with(".jpg")).await {
        Ok(paths) => paths
            .iter()
            .filter_map(|p| p.file_name())
            .map(|f| f.to_string_lossy().to_string())
            .collect(),
        Err(e) => error!("Cannot read {}: {}", albums_dir.display(), e),
    };
    info!("Matching {} albums against {} images", entries.len(), images.len());

    let report = relink_entries(&mut entries, &images, cutoff);

    for (artist, album) in &report.unmatched {
        warning!("No match for {} - {}", artist, album);
    }
    for (artist, album, candidates) in &report.ambiguous {
        warning!(
            "Ambiguous match for {} - {}: {}",
            artist,
            album,
            candidates.join(", ")
        );
    }

    save_json(
        &store,
        &files::ordered_file(&name, "album_image_mapping_with_metadata_fixed.json"),
        &entries,
    )
    .await;

    success!(
        "Linked {} of {} albums ({} unmatched, {} ambiguous)",
        report.matched,
        entries.len(),
        report.unmatched.len(),
        report.ambiguous.len()
    );
}
