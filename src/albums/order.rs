use crate::types::{AlbumSummary, OrderedAlbum, RankedAlbum};

use super::aggregate::ranked;

/// Reorders playlist albums into the sequence they appear in the playlist.
///
/// The position of an album is the `added_at` timestamp of its first track.
/// Albums without tracks or without a timestamp sort first, using the empty
/// string as key. ISO-8601 timestamps compare correctly as strings.
pub fn order_by_playlist_sequence(albums: Vec<AlbumSummary>) -> Vec<OrderedAlbum> {
    let mut keyed: Vec<(String, AlbumSummary)> = albums
        .into_iter()
        .map(|album| {
            let key = album
                .tracks
                .first()
                .and_then(|t| t.added_at.clone())
                .unwrap_or_default();
            (key, album)
        })
        .collect();

    keyed.sort_by(|(a, _), (b, _)| a.cmp(b));

    keyed
        .into_iter()
        .enumerate()
        .map(|(i, (_, album))| OrderedAlbum {
            album,
            playlist_rank: i + 1,
        })
        .collect()
}

/// Like [`super::top_n`], but keeps the playlist position and first track name.
pub fn top_n_ordered(ordered: &[OrderedAlbum], limit: usize) -> Vec<RankedAlbum> {
    ordered
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, o)| RankedAlbum {
            playlist_position: Some(o.playlist_rank),
            track_name: Some(o.album.first_track_name()),
            ..ranked(&o.album, i + 1)
        })
        .collect()
}
