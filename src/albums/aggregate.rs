use std::{cmp::Ordering, collections::HashMap, fmt, str::FromStr};

use crate::types::{AlbumSummary, RankedAlbum, TrackEntry, TrackRecord};

/// Number of albums the 3D room has slots for.
pub const DEFAULT_LIMIT: usize = 40;

/// How aggregated albums are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankingMode {
    /// Descending `total_popularity`. Used for top-tracks extraction.
    #[default]
    Popularity,
    /// Descending `(track_count, total_popularity)`. Used for playlists, where
    /// albums with more tracks in the collection should come first.
    Representation,
}

impl fmt::Display for RankingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankingMode::Popularity => f.write_str("popularity"),
            RankingMode::Representation => f.write_str("representation"),
        }
    }
}

impl FromStr for RankingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "popularity" => Ok(RankingMode::Popularity),
            "representation" => Ok(RankingMode::Representation),
            other => Err(format!(
                "invalid ranking mode '{other}', expected popularity or representation"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateOptions {
    pub limit: usize,
    pub mode: RankingMode,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            mode: RankingMode::default(),
        }
    }
}

impl AggregateOptions {
    pub fn new(mode: RankingMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// Aggregates and ranks tracks according to a fixed set of options.
pub struct AlbumAggregator {
    options: AggregateOptions,
}

impl AlbumAggregator {
    pub fn new(options: AggregateOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &AggregateOptions {
        &self.options
    }

    /// Groups the tracks by album and sorts the result by the configured mode.
    pub fn aggregate<I>(&self, tracks: I) -> Vec<AlbumSummary>
    where
        I: IntoIterator<Item = TrackRecord>,
    {
        let mut summaries = aggregate(tracks);
        rank(&mut summaries, self.options.mode);
        summaries
    }

    /// Ranked visualization records for the first `limit` summaries.
    pub fn top_n(&self, summaries: &[AlbumSummary]) -> Vec<RankedAlbum> {
        top_n(summaries, self.options.limit)
    }
}

/// Groups tracks by album id.
///
/// Summaries come back in the order their album was first seen. Tracks without
/// an album are skipped. When two tracks carry the same album id with
/// different metadata, the first one wins.
pub fn aggregate<I>(tracks: I) -> Vec<AlbumSummary>
where
    I: IntoIterator<Item = TrackRecord>,
{
    let mut summaries: Vec<AlbumSummary> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for track in tracks {
        let Some(album) = track.album else {
            continue;
        };

        let slot = *index.entry(album.id.clone()).or_insert_with(|| {
            summaries.push(AlbumSummary {
                id: album.id,
                name: album.name,
                artist: album.artist_name,
                artist_id: album.artist_id,
                release_date: album.release_date,
                total_tracks: album.total_tracks,
                album_type: album.album_type,
                images: album.images,
                external_url: album.external_url,
                track_count: 0,
                total_popularity: 0,
                tracks: Vec::new(),
            });
            summaries.len() - 1
        });

        let summary = &mut summaries[slot];
        summary.track_count += 1;
        summary.total_popularity += track.popularity as u64;
        summary.tracks.push(TrackEntry {
            name: track.name,
            popularity: track.popularity,
            duration_ms: track.duration_ms,
            added_at: track.added_at,
        });
    }

    summaries
}

/// Sorts summaries in place, highest ranked first.
pub fn rank(summaries: &mut [AlbumSummary], mode: RankingMode) {
    // slice::sort_by is stable; ties keep first-seen order
    summaries.sort_by(|a, b| compare(a, b, mode));
}

fn compare(a: &AlbumSummary, b: &AlbumSummary, mode: RankingMode) -> Ordering {
    match mode {
        RankingMode::Popularity => b.total_popularity.cmp(&a.total_popularity),
        RankingMode::Representation => {
            (b.track_count, b.total_popularity).cmp(&(a.track_count, a.total_popularity))
        }
    }
}

/// Truncates to `limit` entries and assigns 1-based ranks.
pub fn top_n(summaries: &[AlbumSummary], limit: usize) -> Vec<RankedAlbum> {
    summaries
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, album)| ranked(album, i + 1))
        .collect()
}

pub(crate) fn ranked(album: &AlbumSummary, rank: usize) -> RankedAlbum {
    RankedAlbum {
        rank,
        playlist_position: None,
        id: album.id.clone(),
        name: album.name.clone(),
        artist: album.artist.clone(),
        release_date: album.release_date.clone(),
        total_tracks: album.total_tracks,
        album_type: album.album_type.clone(),
        image_url: album.image_url(),
        spotify_url: album.external_url.clone(),
        track_count: album.track_count,
        total_popularity: album.total_popularity,
        avg_popularity: album.avg_popularity(),
        track_name: None,
    }
}
