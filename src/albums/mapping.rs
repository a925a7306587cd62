use std::collections::{HashMap, HashSet};

use crate::{
    types::{AlbumTags, ImageMappingEntry, RankedAlbum},
    utils,
};

pub const DEFAULT_GENRES: [&str; 2] = ["Hip-Hop", "R&B"];
pub const DEFAULT_MOODS: [&str; 2] = ["Chill", "Energetic"];
pub const UNKNOWN_TRACK: &str = "Unknown Track";

/// Public path the front-end loads a cover from.
pub fn local_image_path(filename: &str) -> String {
    format!("/albums/{filename}")
}

/// Links each ranked album to the cover file written for it.
///
/// The filename position is the playlist position when known, the rank
/// otherwise.
pub fn image_mapping(albums: &[RankedAlbum], prefix: Option<&str>) -> Vec<ImageMappingEntry> {
    albums
        .iter()
        .map(|a| {
            let position = a.playlist_position.unwrap_or(a.rank);
            let filename = utils::cover_filename(prefix, position, &a.artist, &a.name);
            ImageMappingEntry {
                rank: a.rank,
                playlist_position: a.playlist_position,
                artist: a.artist.clone(),
                name: a.name.clone(),
                local_image: local_image_path(&filename),
                spotify_url: a.spotify_url.clone(),
                spotify_image_url: a.image_url.clone(),
                track_count: a.track_count,
                avg_popularity: a.avg_popularity,
                track_name: a.track_name.clone(),
                genres: None,
                moods: None,
                top_tracks: None,
            }
        })
        .collect()
}

/// Copies genres, moods and top tracks from the catalog, keyed by album name.
///
/// Albums missing from the catalog get generic defaults. Returns the names of
/// those albums.
pub fn apply_tags(
    entries: &mut [ImageMappingEntry],
    catalog: &HashMap<String, AlbumTags>,
) -> Vec<String> {
    let mut defaulted = Vec::new();

    for entry in entries.iter_mut() {
        let tags = match catalog.get(&entry.name) {
            Some(tags) => tags.clone(),
            None => {
                defaulted.push(entry.name.clone());
                AlbumTags {
                    genres: DEFAULT_GENRES.iter().map(|g| g.to_string()).collect(),
                    moods: DEFAULT_MOODS.iter().map(|m| m.to_string()).collect(),
                    top_tracks: vec![
                        entry
                            .track_name
                            .clone()
                            .unwrap_or_else(|| UNKNOWN_TRACK.to_string()),
                    ],
                }
            }
        };

        entry.genres = Some(tags.genres);
        entry.moods = Some(tags.moods);
        entry.top_tracks = Some(tags.top_tracks);
    }

    defaulted
}

#[derive(Debug, Default, PartialEq)]
pub struct RenamePlan {
    /// `(current filename, new filename)` pairs.
    pub renames: Vec<(String, String)>,
    /// Entries for which no existing file was found, as `(artist, name)`.
    pub missing: Vec<(String, String)>,
}

/// Works out which existing cover file belongs to each entry and the name it
/// should have for the entry's playlist position.
///
/// A file belongs to an entry when its name contains both the sanitized
/// artist and album name. Each file is claimed at most once.
pub fn rename_plan(entries: &[ImageMappingEntry], files: &[String], prefix: &str) -> RenamePlan {
    let mut plan = RenamePlan::default();
    let mut claimed: HashSet<&str> = HashSet::new();

    for entry in entries {
        let safe_artist = utils::safe_name(&entry.artist);
        let safe_album = utils::safe_name(&entry.name);

        let existing = files.iter().find(|f| {
            !claimed.contains(f.as_str()) && f.contains(&safe_artist) && f.contains(&safe_album)
        });

        match existing {
            Some(old) => {
                claimed.insert(old.as_str());
                let position = entry.playlist_position.unwrap_or(entry.rank);
                let new = utils::cover_filename(Some(prefix), position, &entry.artist, &entry.name);
                plan.renames.push((old.clone(), new));
            }
            None => plan
                .missing
                .push((entry.artist.clone(), entry.name.clone())),
        }
    }

    plan
}
