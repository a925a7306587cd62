use crate::{
    albums::rename_plan,
    cli::{files, prefix_name},
    config, error, info,
    management::{DataStore, list_files, rename_files},
    success,
    types::ImageMappingEntry,
    warning,
};

const BACKUP_DIR: &str = "albums_backup";

/// Renames downloaded covers so their filenames carry the playlist position
/// from the ordered image mapping.
///
/// All `<name>_*.jpg` files are copied to a sibling `albums_backup` directory
/// first.
pub async fn rename(name: String) {
    let name = prefix_name(&name);
    let store = DataStore::from_config();
    let mapping_file = files::ordered_file(&name, "album_image_mapping_ordered.json");

    let entries = match store.read_json::<Vec<ImageMappingEntry>>(&mapping_file).await {
        Ok(entries) => entries,
        Err(e) => error!(
            "Cannot read {}: {}. Run albumroom reorder first.",
            store.path(&mapping_file).display(),
            e
        ),
    };
    info!("Found {} albums to rename", entries.len());

    let albums_dir = config::albums_dir();
    let marker = format!("{name}_");
    let images = match list_files(&albums_dir, |f| {
        f.starts_with(&marker) && f.ends_with(".jpg")
    })
    .await
    {
        Ok(images) => images,
        Err(e) => error!("Cannot read {}: {}", albums_dir.display(), e),
    };

    let backup_dir = albums_dir.with_file_name(BACKUP_DIR);
    if let Err(e) = async_fs::create_dir_all(&backup_dir).await {
        error!("Cannot create {}: {}", backup_dir.display(), e);
    }
    for image in &images {
        if let Some(file) = image.file_name() {
            if let Err(e) = async_fs::copy(image, backup_dir.join(file)).await {
                error!("Backup of {} failed: {}", image.display(), e);
            }
        }
    }
    success!("Backed up {} images to {}", images.len(), backup_dir.display());

    let filenames: Vec<String> = images
        .iter()
        .filter_map(|p| p.file_name())
        .map(|f| f.to_string_lossy().to_string())
        .collect();

    let plan = rename_plan(&entries, &filenames, &name);
    for (artist, album) in &plan.missing {
        warning!("No image found for {} - {}", artist, album);
    }

    let report = rename_files(&albums_dir, &plan.renames).await;
    for (old, new, e) in &report.failed {
        warning!("Failed to rename {} to {}: {}", old, new, e);
    }
    for (tmp, old) in &report.stranded {
        warning!(
            "{} could not be moved back; rename it to {} by hand",
            tmp.display(),
            old
        );
    }
    success!(
        "Renamed {} images ({} missing, {} failed)",
        report.renamed,
        plan.missing.len(),
        report.failed.len()
    );
}
