use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
}

// Spotify Web API payloads. Every field is defaulted so that partially filled
// objects (local files, podcast episodes, removed tracks) still deserialize.
// Missing keys fall back to `Default`; explicit nulls go through `null_as_default`.

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Image {
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimpleArtist {
    pub id: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotifyAlbum {
    pub id: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub artists: Vec<SimpleArtist>,
    #[serde(deserialize_with = "null_as_default")]
    pub release_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub total_tracks: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub album_type: String,
    pub images: Option<Vec<Image>>,
    #[serde(deserialize_with = "null_as_default")]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotifyTrack {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub popularity: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub duration_ms: u64,
    pub album: Option<SpotifyAlbum>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TopTracksResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub items: Vec<SpotifyTrack>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaylistTrackItem {
    pub added_at: Option<String>,
    pub track: Option<SpotifyTrack>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaylistTracksResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub items: Vec<PlaylistTrackItem>,
    pub next: Option<String>,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaylistOwner {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaylistTracksRef {
    #[serde(deserialize_with = "null_as_default")]
    pub total: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaylistResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub description: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub owner: PlaylistOwner,
    #[serde(deserialize_with = "null_as_default")]
    pub tracks: PlaylistTracksRef,
    #[serde(deserialize_with = "null_as_default")]
    pub external_urls: ExternalUrls,
}

/// Album descriptor embedded in every track handed to the aggregator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    pub artist_name: String,
    pub artist_id: String,
    pub release_date: String,
    pub total_tracks: u32,
    pub album_type: String,
    pub images: Vec<Image>,
    pub external_url: String,
}

/// A single track as consumed by [`crate::albums::aggregate`].
///
/// `album` is `None` for deleted or unavailable tracks; those are skipped.
/// `added_at` is only known for playlist items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackRecord {
    pub name: String,
    pub popularity: u32,
    pub duration_ms: u64,
    pub added_at: Option<String>,
    pub album: Option<Album>,
}

impl SpotifyAlbum {
    /// Converts into an [`Album`], or `None` when the payload has no usable id.
    pub fn into_album(self) -> Option<Album> {
        // local files come back with a null album id
        let id = self.id.filter(|id| !id.is_empty())?;
        let (artist_name, artist_id) = self
            .artists
            .into_iter()
            .next()
            .map(|a| (a.name, a.id.unwrap_or_default()))
            .unwrap_or_default();

        Some(Album {
            id,
            name: self.name,
            artist_name,
            artist_id,
            release_date: self.release_date,
            total_tracks: self.total_tracks,
            album_type: self.album_type,
            images: self.images.unwrap_or_default(),
            external_url: self.external_urls.spotify.unwrap_or_default(),
        })
    }
}

impl From<SpotifyTrack> for TrackRecord {
    fn from(track: SpotifyTrack) -> Self {
        TrackRecord {
            name: track.name,
            popularity: track.popularity,
            duration_ms: track.duration_ms,
            added_at: None,
            album: track.album.and_then(SpotifyAlbum::into_album),
        }
    }
}

impl TrackRecord {
    /// Converts a playlist item, returning `None` for items without a track.
    pub fn from_playlist_item(item: PlaylistTrackItem) -> Option<Self> {
        let track = item.track?;
        Some(TrackRecord {
            added_at: Some(item.added_at.unwrap_or_default()),
            ..TrackRecord::from(track)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackEntry {
    pub name: String,
    pub popularity: u32,
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<String>,
}

/// Per-album accumulation of the tracks that reference it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumSummary {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub artist_id: String,
    pub release_date: String,
    pub total_tracks: u32,
    pub album_type: String,
    pub images: Vec<Image>,
    pub external_url: String,
    pub track_count: u32,
    pub total_popularity: u64,
    pub tracks: Vec<TrackEntry>,
}

impl AlbumSummary {
    pub fn avg_popularity(&self) -> f64 {
        if self.track_count == 0 {
            return 0.0;
        }
        self.total_popularity as f64 / self.track_count as f64
    }

    /// URL of the first (largest) cover image, or an empty string.
    pub fn image_url(&self) -> String {
        self.images
            .first()
            .map(|i| i.url.clone())
            .unwrap_or_default()
    }

    pub fn first_track_name(&self) -> String {
        self.tracks
            .first()
            .map(|t| t.name.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedAlbum {
    pub rank: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlist_position: Option<usize>,
    pub id: String,
    pub name: String,
    pub artist: String,
    pub release_date: String,
    pub total_tracks: u32,
    pub album_type: String,
    pub image_url: String,
    pub spotify_url: String,
    pub track_count: u32,
    pub total_popularity: u64,
    pub avg_popularity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderedAlbum {
    #[serde(flatten)]
    pub album: AlbumSummary,
    pub playlist_rank: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaylistInfo {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub total_tracks: u64,
    #[serde(default)]
    pub playlist_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_albums: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordered_by: Option<String>,
}

impl From<PlaylistResponse> for PlaylistInfo {
    fn from(p: PlaylistResponse) -> Self {
        PlaylistInfo {
            id: p.id,
            name: p.name,
            description: p.description.unwrap_or_default(),
            owner: p.owner.display_name.unwrap_or(p.owner.id),
            total_tracks: p.tracks.total,
            playlist_url: p.external_urls.spotify.unwrap_or_default(),
            total_albums: None,
            ordered_by: None,
        }
    }
}

/// Contents of a `*_3d_metadata*.json` file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualizationMetadata {
    pub extraction_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlist_info: Option<PlaylistInfo>,
    #[serde(default)]
    pub total_albums: usize,
    pub albums: Vec<RankedAlbum>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageMappingEntry {
    pub rank: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlist_position: Option<usize>,
    pub artist: String,
    pub name: String,
    pub local_image: String,
    pub spotify_url: String,
    pub spotify_image_url: String,
    pub track_count: u32,
    pub avg_popularity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moods: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_tracks: Option<Vec<String>>,
}

/// Hand curated descriptors for one album, keyed by album name in a catalog file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlbumTags {
    pub genres: Vec<String>,
    pub moods: Vec<String>,
    pub top_tracks: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlbumCsvRow {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub artist_id: String,
    pub release_date: String,
    pub total_tracks: u32,
    pub album_type: String,
    pub image_url: String,
    pub external_url: String,
    pub track_count: u32,
    pub total_popularity: u64,
    pub track_names: String,
    pub avg_track_popularity: f64,
}

impl From<&AlbumSummary> for AlbumCsvRow {
    fn from(a: &AlbumSummary) -> Self {
        let popularity_sum: u64 = a.tracks.iter().map(|t| t.popularity as u64).sum();
        let avg_track_popularity = if a.tracks.is_empty() {
            0.0
        } else {
            popularity_sum as f64 / a.tracks.len() as f64
        };

        AlbumCsvRow {
            id: a.id.clone(),
            name: a.name.clone(),
            artist: a.artist.clone(),
            artist_id: a.artist_id.clone(),
            release_date: a.release_date.clone(),
            total_tracks: a.total_tracks,
            album_type: a.album_type.clone(),
            image_url: a.image_url(),
            external_url: a.external_url.clone(),
            track_count: a.track_count,
            total_popularity: a.total_popularity,
            track_names: a
                .tracks
                .iter()
                .map(|t| t.name.as_str())
                .collect::<Vec<&str>>()
                .join(", "),
            avg_track_popularity,
        }
    }
}

/// CSV row for playlist-ordered output. The csv writer cannot serialize
/// flattened structs, so the album columns are repeated here.
#[derive(Debug, Clone, Serialize)]
pub struct OrderedAlbumCsvRow {
    pub playlist_position: usize,
    pub id: String,
    pub name: String,
    pub artist: String,
    pub artist_id: String,
    pub release_date: String,
    pub total_tracks: u32,
    pub album_type: String,
    pub image_url: String,
    pub external_url: String,
    pub track_count: u32,
    pub total_popularity: u64,
    pub track_names: String,
    pub avg_track_popularity: f64,
    pub track_name: String,
}

impl From<&OrderedAlbum> for OrderedAlbumCsvRow {
    fn from(o: &OrderedAlbum) -> Self {
        let row = AlbumCsvRow::from(&o.album);
        OrderedAlbumCsvRow {
            playlist_position: o.playlist_rank,
            id: row.id,
            name: row.name,
            artist: row.artist,
            artist_id: row.artist_id,
            release_date: row.release_date,
            total_tracks: row.total_tracks,
            album_type: row.album_type,
            image_url: row.image_url,
            external_url: row.external_url,
            track_count: row.track_count,
            total_popularity: row.total_popularity,
            track_names: row.track_names,
            avg_track_popularity: row.avg_track_popularity,
            track_name: o.album.first_track_name(),
        }
    }
}

#[derive(Tabled)]
pub struct AlbumTableRow {
    pub rank: usize,
    pub name: String,
    pub artist: String,
    pub tracks: u32,
    pub popularity: u64,
    pub length: String,
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    pub name: String,
    pub albums: usize,
    pub file: String,
}

/// Period the top-tracks endpoint aggregates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeRange {
    /// Roughly the last four weeks.
    ShortTerm,
    /// Roughly the last six months.
    MediumTerm,
    #[default]
    LongTerm,
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimeRange::ShortTerm => "short_term",
            TimeRange::MediumTerm => "medium_term",
            TimeRange::LongTerm => "long_term",
        };
        f.write_str(s)
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "short_term" | "short" => Ok(TimeRange::ShortTerm),
            "medium_term" | "medium" => Ok(TimeRange::MediumTerm),
            "long_term" | "long" => Ok(TimeRange::LongTerm),
            other => Err(format!(
                "invalid time range '{other}', expected short_term, medium_term or long_term"
            )),
        }
    }
}
