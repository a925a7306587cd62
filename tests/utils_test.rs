use albumroom::types::{
    AlbumCsvRow, PlaylistInfo, PlaylistResponse, PlaylistTracksResponse, TimeRange,
    TopTracksResponse, TrackRecord,
};
use albumroom::utils::*;
use albumroom::albums::{RankingMode, aggregate};

#[test]
fn test_generate_code_verifier() {
    let verifier = generate_code_verifier();

    // Should be exactly 128 characters
    assert_eq!(verifier.len(), 128);

    // Should contain only alphanumeric characters
    assert!(verifier.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated verifiers should be different
    let verifier2 = generate_code_verifier();
    assert_ne!(verifier, verifier2);
}

#[test]
fn test_generate_code_challenge() {
    let verifier = "test_verifier_123";
    let challenge = generate_code_challenge(verifier);

    // Should not be empty
    assert!(!challenge.is_empty());

    // Should be deterministic - same input produces same output
    let challenge2 = generate_code_challenge(verifier);
    assert_eq!(challenge, challenge2);

    // Different input should produce different output
    let challenge3 = generate_code_challenge("different_verifier");
    assert_ne!(challenge, challenge3);

    // SHA-256 is 32 bytes, 43 characters in unpadded base64
    assert_eq!(challenge.len(), 43);
    assert!(!challenge.contains('='));
}

#[test]
fn test_sanitize() {
    assert_eq!(sanitize("Blonde"), "Blonde");
    assert_eq!(sanitize("good kid, m.A.A.d city"), "good kid mAAd city");
    assert_eq!(sanitize("CTRL (Deluxe) "), "CTRL Deluxe");
    assert_eq!(sanitize("Lo-Fi_Beats"), "Lo-Fi_Beats");
    assert_eq!(sanitize("?!"), "");
}

#[test]
fn test_safe_name() {
    assert_eq!(safe_name("Frank Ocean"), "Frank_Ocean");
    assert_eq!(safe_name("ROOM"), "ROOM");
    assert_eq!(safe_name("Tyler, The Creator"), "Tyler_The_Creator");
}

#[test]
fn test_safe_name_strips_path_separators() {
    assert_eq!(safe_name("ROOM mix/2"), "ROOM_mix2");
    assert_eq!(safe_name("../../etc/passwd"), "etcpasswd");
    assert_eq!(safe_name("C:\\Music"), "CMusic");

    // already safe names are kept as they are
    assert_eq!(safe_name("ROOM_mix2"), "ROOM_mix2");
    assert_eq!(safe_name(&safe_name("Late Night / Chill")), safe_name("Late Night / Chill"));
}

#[test]
fn test_playlist_prefix_truncates() {
    assert_eq!(playlist_prefix("ROOM"), "ROOM");
    assert_eq!(
        playlist_prefix("My Very Long Playlist Name For Summer"),
        "My_Very_Long_Playlis"
    );
    assert_eq!(playlist_prefix("My Very Long Playlist Name").len(), PLAYLIST_PREFIX_LEN);
}

#[test]
fn test_cover_filename() {
    assert_eq!(
        cover_filename(Some("ROOM"), 3, "Frank Ocean", "Blonde"),
        "ROOM_03_Frank_Ocean_Blonde.jpg"
    );
    assert_eq!(
        cover_filename(None, 12, "Kendrick Lamar", "DAMN."),
        "12_Kendrick_Lamar_DAMN.jpg"
    );
    assert_eq!(
        cover_filename(Some(""), 1, "SZA", "Ctrl"),
        "01_SZA_Ctrl.jpg"
    );
    assert_eq!(
        cover_filename(Some("ROOM"), 100, "A", "B"),
        "ROOM_100_A_B.jpg"
    );
}

#[test]
fn test_playlist_id_from_input() {
    assert_eq!(
        playlist_id_from_input("https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M?si=abc123"),
        "37i9dQZF1DXcBWIGoYBM5M"
    );
    assert_eq!(
        playlist_id_from_input("https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M"),
        "37i9dQZF1DXcBWIGoYBM5M"
    );
    assert_eq!(
        playlist_id_from_input("spotify:playlist:37i9dQZF1DXcBWIGoYBM5M"),
        "37i9dQZF1DXcBWIGoYBM5M"
    );
    assert_eq!(
        playlist_id_from_input("  37i9dQZF1DXcBWIGoYBM5M "),
        "37i9dQZF1DXcBWIGoYBM5M"
    );
    assert_eq!(playlist_id_from_input(""), "");
}

#[test]
fn test_parse_time_range() {
    assert_eq!(parse_time_range("short_term"), Ok(TimeRange::ShortTerm));
    assert_eq!(parse_time_range("medium-term"), Ok(TimeRange::MediumTerm));
    assert_eq!(parse_time_range("LONG"), Ok(TimeRange::LongTerm));
    assert!(parse_time_range("forever").is_err());

    assert_eq!(TimeRange::default(), TimeRange::LongTerm);
    assert_eq!(TimeRange::MediumTerm.to_string(), "medium_term");
}

#[test]
fn test_parse_ranking_mode() {
    assert_eq!(parse_ranking_mode("popularity"), Ok(RankingMode::Popularity));
    assert_eq!(
        parse_ranking_mode("representation"),
        Ok(RankingMode::Representation)
    );
    assert!(parse_ranking_mode("").is_err());
}

#[test]
fn test_parse_top_limit() {
    assert_eq!(parse_top_limit("1"), Ok(1));
    assert_eq!(parse_top_limit("50"), Ok(50));
    assert_eq!(parse_top_limit(" 25 "), Ok(25));

    assert!(parse_top_limit("0").is_err());
    assert!(parse_top_limit("51").is_err());
    assert!(parse_top_limit("-3").is_err());
    assert!(parse_top_limit("ten").is_err());
}

#[test]
fn test_format_duration() {
    assert_eq!(format_duration(0), "0:00");
    assert_eq!(format_duration(59_999), "0:59");
    assert_eq!(format_duration(185_000), "3:05");
    assert_eq!(format_duration(3_600_000), "60:00");
}

#[test]
fn test_extraction_date_format() {
    let date = extraction_date();

    // e.g. 2024-05-01T12:34:56.123456
    assert_eq!(date.len(), 26);
    assert_eq!(&date[4..5], "-");
    assert_eq!(&date[10..11], "T");
    assert_eq!(&date[19..20], ".");
}

#[test]
fn test_top_tracks_payload_conversion() {
    let json = r#"{
        "items": [
            {
                "name": "Nikes",
                "popularity": 77,
                "duration_ms": 314000,
                "album": {
                    "id": "3mH6qwIy9crq0I9YQbOuDf",
                    "name": "Blonde",
                    "artists": [{ "id": "2h93pZq0e7k5yf4dywlkpM", "name": "Frank Ocean" }],
                    "release_date": "2016-08-20",
                    "total_tracks": 17,
                    "album_type": "album",
                    "images": [{ "url": "https://i.scdn.co/image/blonde", "width": 640, "height": 640 }],
                    "external_urls": { "spotify": "https://open.spotify.com/album/3mH6qwIy9crq0I9YQbOuDf" }
                }
            },
            { "name": "Local file", "popularity": 0, "duration_ms": 1000, "album": { "id": null, "name": "" } },
            { "name": "Episode", "popularity": 0, "duration_ms": 1000, "album": null }
        ]
    }"#;

    let response: TopTracksResponse = serde_json::from_str(json).expect("valid payload");
    let tracks: Vec<TrackRecord> = response.items.into_iter().map(TrackRecord::from).collect();

    assert_eq!(tracks.len(), 3);
    let album = tracks[0].album.as_ref().expect("first track has an album");
    assert_eq!(album.id, "3mH6qwIy9crq0I9YQbOuDf");
    assert_eq!(album.artist_name, "Frank Ocean");
    assert_eq!(album.artist_id, "2h93pZq0e7k5yf4dywlkpM");
    assert_eq!(album.external_url, "https://open.spotify.com/album/3mH6qwIy9crq0I9YQbOuDf");
    assert!(tracks[1].album.is_none());
    assert!(tracks[2].album.is_none());

    let summaries = aggregate(tracks);
    assert_eq!(summaries.len(), 1);

    let row = AlbumCsvRow::from(&summaries[0]);
    assert_eq!(row.image_url, "https://i.scdn.co/image/blonde");
    assert_eq!(row.track_names, "Nikes");
    assert_eq!(row.avg_track_popularity, 77.0);
}

#[test]
fn test_playlist_payload_conversion() {
    let json = r#"{
        "items": [
            {
                "added_at": "2023-01-15T08:30:00Z",
                "track": {
                    "name": "Love Galore",
                    "popularity": 70,
                    "duration_ms": 275000,
                    "album": {
                        "id": "76290XdXVF9rPzGdNRWdCh",
                        "name": "Ctrl",
                        "artists": [{ "id": "7tYKF4w9nC0nq9CsPZTHyP", "name": "SZA" }],
                        "images": null
                    }
                }
            },
            { "added_at": "2023-01-16T08:30:00Z", "track": null },
            {
                "track": {
                    "name": "No timestamp",
                    "popularity": 10,
                    "album": { "id": "abc", "name": "Other", "artists": [] }
                }
            }
        ],
        "next": null
    }"#;

    let response: PlaylistTracksResponse = serde_json::from_str(json).expect("valid payload");
    let tracks: Vec<TrackRecord> = response
        .items
        .into_iter()
        .filter_map(TrackRecord::from_playlist_item)
        .collect();

    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].added_at.as_deref(), Some("2023-01-15T08:30:00Z"));
    assert_eq!(tracks[1].added_at.as_deref(), Some(""));

    let album = tracks[0].album.as_ref().expect("album present");
    assert!(album.images.is_empty());
    let other = tracks[1].album.as_ref().expect("album present");
    assert_eq!(other.artist_name, "");
}

#[test]
fn test_playlist_page_with_local_file_decodes() {
    let json = r#"{
        "items": [
            {
                "added_at": "2023-01-15T08:30:00Z",
                "is_local": false,
                "track": {
                    "name": "Love Galore",
                    "popularity": 70,
                    "duration_ms": 275000,
                    "album": {
                        "id": "76290XdXVF9rPzGdNRWdCh",
                        "name": "Ctrl",
                        "album_type": "album",
                        "release_date": "2017-06-09",
                        "total_tracks": 14,
                        "artists": [{ "id": "7tYKF4w9nC0nq9CsPZTHyP", "name": "SZA" }],
                        "images": [{ "url": "https://i.scdn.co/image/ctrl", "width": 640, "height": 640 }],
                        "external_urls": { "spotify": "https://open.spotify.com/album/76290XdXVF9rPzGdNRWdCh" }
                    }
                }
            },
            {
                "added_at": "2023-01-16T09:00:00Z",
                "is_local": true,
                "track": {
                    "id": null,
                    "name": "Bootleg Remix",
                    "popularity": 0,
                    "duration_ms": 201000,
                    "is_local": true,
                    "uri": "spotify:local:DJ+Someone::Bootleg+Remix:201",
                    "album": {
                        "id": null,
                        "name": "",
                        "album_type": null,
                        "release_date": null,
                        "release_date_precision": null,
                        "total_tracks": null,
                        "artists": [],
                        "images": [],
                        "external_urls": {},
                        "uri": null
                    },
                    "artists": [{ "id": null, "name": "DJ Someone", "type": "artist", "uri": null }]
                }
            }
        ],
        "next": null,
        "total": 2
    }"#;

    let page: PlaylistTracksResponse =
        serde_json::from_str(json).expect("page with a local file decodes");
    assert_eq!(page.items.len(), 2);

    let tracks: Vec<TrackRecord> = page
        .items
        .into_iter()
        .filter_map(TrackRecord::from_playlist_item)
        .collect();
    assert_eq!(tracks.len(), 2);
    assert!(tracks[0].album.is_some());
    // local files have no album id and map to no album
    assert!(tracks[1].album.is_none());

    let summaries = aggregate(tracks);
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].name, "Ctrl");
}

#[test]
fn test_payload_nulls_become_defaults() {
    let json = r#"{
        "id": "37i9dQZF1DXcBWIGoYBM5M",
        "name": null,
        "owner": { "id": null, "display_name": null },
        "tracks": null,
        "external_urls": null
    }"#;

    let response: PlaylistResponse = serde_json::from_str(json).expect("nulls decode");
    let info = PlaylistInfo::from(response);

    assert_eq!(info.name, "");
    assert_eq!(info.owner, "");
    assert_eq!(info.total_tracks, 0);
    assert_eq!(info.playlist_url, "");
}

#[test]
fn test_playlist_info_from_response() {
    let json = r#"{
        "id": "37i9dQZF1DXcBWIGoYBM5M",
        "name": "ROOM",
        "description": null,
        "owner": { "id": "someone", "display_name": null },
        "tracks": { "total": 120 },
        "external_urls": { "spotify": "https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M" }
    }"#;

    let response: PlaylistResponse = serde_json::from_str(json).expect("valid payload");
    let info = PlaylistInfo::from(response);

    assert_eq!(info.name, "ROOM");
    assert_eq!(info.description, "");
    assert_eq!(info.owner, "someone");
    assert_eq!(info.total_tracks, 120);
    assert_eq!(info.total_albums, None);

    let serialized = serde_json::to_value(&info).expect("serializable");
    assert!(serialized.get("ordered_by").is_none());
}
