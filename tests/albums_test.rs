use std::collections::{HashMap, HashSet};

use albumroom::albums::*;
use albumroom::types::{
    Album, AlbumSummary, AlbumTags, Image, ImageMappingEntry, OrderedAlbumCsvRow, TrackRecord,
};

// Helper function to create a test album
fn create_test_album(id: &str, name: &str, artist: &str) -> Album {
    Album {
        id: id.to_string(),
        name: name.to_string(),
        artist_name: artist.to_string(),
        artist_id: format!("{}_artist_id", id),
        release_date: "2016-08-20".to_string(),
        total_tracks: 17,
        album_type: "album".to_string(),
        images: vec![Image {
            url: format!("https://i.scdn.co/image/{}", id),
            width: Some(640),
            height: Some(640),
        }],
        external_url: format!("https://open.spotify.com/album/{}", id),
    }
}

// Helper function to create a test track referencing an album
fn create_test_track(album_id: &str, popularity: u32) -> TrackRecord {
    TrackRecord {
        name: format!("{}_track_{}", album_id, popularity),
        popularity,
        duration_ms: 180_000,
        added_at: None,
        album: Some(create_test_album(album_id, &format!("Album {}", album_id), "Artist")),
    }
}

fn create_playlist_track(album_id: &str, name: &str, added_at: &str) -> TrackRecord {
    TrackRecord {
        name: name.to_string(),
        added_at: Some(added_at.to_string()),
        ..create_test_track(album_id, 50)
    }
}

fn create_test_entry(rank: usize, artist: &str, name: &str) -> ImageMappingEntry {
    ImageMappingEntry {
        rank,
        playlist_position: Some(rank),
        artist: artist.to_string(),
        name: name.to_string(),
        local_image: String::new(),
        spotify_url: String::new(),
        spotify_image_url: String::new(),
        track_count: 1,
        avg_popularity: 50.0,
        track_name: Some(format!("{} opener", name)),
        genres: None,
        moods: None,
        top_tracks: None,
    }
}

fn ids(summaries: &[AlbumSummary]) -> Vec<&str> {
    summaries.iter().map(|s| s.id.as_str()).collect()
}

#[test]
fn test_aggregate_sums_tracks_per_album() {
    let tracks = vec![
        create_test_track("A", 50),
        create_test_track("B", 90),
        create_test_track("A", 70),
    ];

    let aggregator = AlbumAggregator::new(AggregateOptions::new(RankingMode::Popularity));
    let summaries = aggregator.aggregate(tracks);

    assert_eq!(ids(&summaries), vec!["A", "B"]);
    assert_eq!(summaries[0].track_count, 2);
    assert_eq!(summaries[0].total_popularity, 120);
    assert_eq!(summaries[1].track_count, 1);
    assert_eq!(summaries[1].total_popularity, 90);

    let ranked = aggregator.top_n(&summaries);
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].rank, 1);
    assert_eq!(ranked[0].id, "A");
    assert_eq!(ranked[0].avg_popularity, 60.0);
    assert_eq!(ranked[1].rank, 2);
    assert_eq!(ranked[1].id, "B");
}

#[test]
fn test_ranking_modes_disagree_on_depth_versus_popularity() {
    let tracks = vec![
        create_test_track("A", 99),
        create_test_track("B", 1),
        create_test_track("B", 1),
    ];

    let by_popularity =
        AlbumAggregator::new(AggregateOptions::new(RankingMode::Popularity)).aggregate(tracks.clone());
    assert_eq!(ids(&by_popularity), vec!["A", "B"]);

    let by_representation =
        AlbumAggregator::new(AggregateOptions::new(RankingMode::Representation)).aggregate(tracks);
    assert_eq!(ids(&by_representation), vec!["B", "A"]);
}

#[test]
fn test_aggregate_invariants() {
    let tracks: Vec<TrackRecord> = (0..30)
        .map(|i| create_test_track(&format!("album{}", i % 7), (i * 13 % 100) as u32))
        .collect();

    let summaries = aggregate(tracks.clone());

    let distinct: HashSet<String> = tracks
        .iter()
        .filter_map(|t| t.album.as_ref().map(|a| a.id.clone()))
        .collect();
    assert_eq!(summaries.len(), distinct.len());

    for summary in &summaries {
        assert_eq!(summary.track_count as usize, summary.tracks.len());
        let sum: u64 = summary.tracks.iter().map(|t| t.popularity as u64).sum();
        assert_eq!(summary.total_popularity, sum);
    }

    // same input, same output
    assert_eq!(aggregate(tracks.clone()), aggregate(tracks));
}

#[test]
fn test_rank_orders_are_non_increasing() {
    let tracks: Vec<TrackRecord> = (0..40)
        .map(|i| create_test_track(&format!("album{}", i % 9), (i * 37 % 100) as u32))
        .collect();

    let mut summaries = aggregate(tracks);

    rank(&mut summaries, RankingMode::Popularity);
    assert!(
        summaries
            .windows(2)
            .all(|w| w[0].total_popularity >= w[1].total_popularity)
    );

    rank(&mut summaries, RankingMode::Representation);
    assert!(summaries.windows(2).all(|w| {
        (w[0].track_count, w[0].total_popularity) >= (w[1].track_count, w[1].total_popularity)
    }));
}

#[test]
fn test_rank_is_stable_on_ties() {
    let tracks = vec![
        create_test_track("C", 40),
        create_test_track("A", 40),
        create_test_track("B", 40),
    ];

    let summaries =
        AlbumAggregator::new(AggregateOptions::new(RankingMode::Popularity)).aggregate(tracks.clone());
    assert_eq!(ids(&summaries), vec!["C", "A", "B"]);

    let summaries =
        AlbumAggregator::new(AggregateOptions::new(RankingMode::Representation)).aggregate(tracks);
    assert_eq!(ids(&summaries), vec!["C", "A", "B"]);
}

#[test]
fn test_aggregate_skips_tracks_without_album() {
    let mut orphan = create_test_track("X", 100);
    orphan.album = None;

    let summaries = aggregate(vec![orphan, create_test_track("A", 10)]);

    assert_eq!(ids(&summaries), vec!["A"]);
    assert!(aggregate(Vec::<TrackRecord>::new()).is_empty());
}

#[test]
fn test_aggregate_first_seen_metadata_wins() {
    let first = create_test_track("A", 10);
    let mut second = create_test_track("A", 20);
    if let Some(album) = second.album.as_mut() {
        album.name = "Renamed".to_string();
    }

    let summaries = aggregate(vec![first, second]);

    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].name, "Album A");
    assert_eq!(summaries[0].track_count, 2);
}

#[test]
fn test_top_n_limits() {
    let tracks: Vec<TrackRecord> = (0..5)
        .map(|i| create_test_track(&format!("album{}", i), 10 * i as u32))
        .collect();
    let summaries = aggregate(tracks);

    assert!(top_n(&summaries, 0).is_empty());

    let all = top_n(&summaries, 100);
    assert_eq!(all.len(), 5);
    assert_eq!(
        all.iter().map(|r| r.rank).collect::<Vec<_>>(),
        vec![1, 2, 3, 4, 5]
    );

    let aggregator = AlbumAggregator::new(AggregateOptions::default().with_limit(2));
    assert_eq!(aggregator.top_n(&summaries).len(), 2);
    assert_eq!(aggregator.options().limit, 2);
}

#[test]
fn test_aggregate_options_default() {
    let options = AggregateOptions::default();
    assert_eq!(options.limit, DEFAULT_LIMIT);
    assert_eq!(options.limit, 40);
    assert_eq!(options.mode, RankingMode::Popularity);
}

#[test]
fn test_ranked_album_without_images_has_empty_url() {
    let mut track = create_test_track("A", 10);
    if let Some(album) = track.album.as_mut() {
        album.images.clear();
    }

    let ranked = top_n(&aggregate(vec![track]), 40);

    assert_eq!(ranked[0].image_url, "");
    assert_eq!(ranked[0].spotify_url, "https://open.spotify.com/album/A");
}

#[test]
fn test_avg_popularity_guards_zero_tracks() {
    let mut summary = aggregate(vec![create_test_track("A", 80)]).remove(0);
    assert_eq!(summary.avg_popularity(), 80.0);

    summary.track_count = 0;
    summary.total_popularity = 0;
    summary.tracks.clear();
    assert_eq!(summary.avg_popularity(), 0.0);
}

#[test]
fn test_order_by_playlist_sequence() {
    let tracks = vec![
        create_playlist_track("late", "Late", "2024-03-01T10:00:00Z"),
        create_playlist_track("early", "Early", "2023-01-15T08:30:00Z"),
        create_playlist_track("late", "Late Again", "2022-01-01T00:00:00Z"),
        create_playlist_track("mid", "Mid", "2023-06-01T12:00:00Z"),
    ];
    let summaries =
        AlbumAggregator::new(AggregateOptions::new(RankingMode::Representation)).aggregate(tracks);
    assert_eq!(ids(&summaries), vec!["late", "early", "mid"]);

    let ordered = order_by_playlist_sequence(summaries);

    // keyed by the first track's added_at only
    let order: Vec<(&str, usize)> = ordered
        .iter()
        .map(|o| (o.album.id.as_str(), o.playlist_rank))
        .collect();
    assert_eq!(order, vec![("early", 1), ("mid", 2), ("late", 3)]);
}

#[test]
fn test_order_missing_timestamps_sort_first_and_stay_stable() {
    let tracks = vec![
        create_playlist_track("b", "B", "2023-01-01T00:00:00Z"),
        create_test_track("x", 10),
        create_test_track("y", 10),
    ];
    let summaries = aggregate(tracks);

    let ordered = order_by_playlist_sequence(summaries);

    let order: Vec<&str> = ordered.iter().map(|o| o.album.id.as_str()).collect();
    assert_eq!(order, vec!["x", "y", "b"]);
}

#[test]
fn test_top_n_ordered_keeps_position_and_track_name() {
    let tracks = vec![
        create_playlist_track("second", "Two", "2023-02-01T00:00:00Z"),
        create_playlist_track("first", "One", "2023-01-01T00:00:00Z"),
    ];
    let ordered = order_by_playlist_sequence(aggregate(tracks));

    let top = top_n_ordered(&ordered, 1);

    assert_eq!(top.len(), 1);
    assert_eq!(top[0].rank, 1);
    assert_eq!(top[0].playlist_position, Some(1));
    assert_eq!(top[0].id, "first");
    assert_eq!(top[0].track_name.as_deref(), Some("One"));
}

#[test]
fn test_ordered_csv_row_columns() {
    let ordered = order_by_playlist_sequence(aggregate(vec![
        create_playlist_track("a", "Opener", "2023-01-01T00:00:00Z"),
        create_playlist_track("a", "Closer", "2023-01-02T00:00:00Z"),
    ]));

    let row = OrderedAlbumCsvRow::from(&ordered[0]);

    assert_eq!(row.playlist_position, 1);
    assert_eq!(row.track_names, "Opener, Closer");
    assert_eq!(row.track_name, "Opener");
    assert_eq!(row.avg_track_popularity, 50.0);
}

#[test]
fn test_image_mapping_uses_playlist_position_in_filename() {
    let ordered = order_by_playlist_sequence(aggregate(vec![
        create_playlist_track("a", "One", "2023-01-01T00:00:00Z"),
    ]));
    let top = top_n_ordered(&ordered, 40);

    let mapping = image_mapping(&top, Some("ROOM"));

    assert_eq!(mapping.len(), 1);
    assert_eq!(mapping[0].local_image, "/albums/ROOM_01_Artist_Album_a.jpg");
    assert_eq!(mapping[0].spotify_image_url, "https://i.scdn.co/image/a");
    assert_eq!(mapping[0].track_name.as_deref(), Some("One"));
}

#[test]
fn test_image_mapping_without_prefix_uses_rank() {
    let ranked = top_n(&aggregate(vec![create_test_track("A", 10)]), 40);

    let mapping = image_mapping(&ranked, None);

    assert_eq!(mapping[0].local_image, local_image_path("01_Artist_Album_A.jpg"));
    assert_eq!(mapping[0].playlist_position, None);
}

#[test]
fn test_apply_tags_from_catalog_and_defaults() {
    let mut entries = vec![
        create_test_entry(1, "Frank Ocean", "Blonde"),
        create_test_entry(2, "SZA", "Ctrl"),
    ];
    let mut no_track = create_test_entry(3, "Unknown", "Mystery");
    no_track.track_name = None;
    entries.push(no_track);

    let mut catalog = HashMap::new();
    catalog.insert(
        "Blonde".to_string(),
        AlbumTags {
            genres: vec!["R&B".to_string()],
            moods: vec!["Dreamy".to_string()],
            top_tracks: vec!["Nikes".to_string()],
        },
    );

    let defaulted = apply_tags(&mut entries, &catalog);

    assert_eq!(defaulted, vec!["Ctrl".to_string(), "Mystery".to_string()]);
    assert_eq!(entries[0].genres, Some(vec!["R&B".to_string()]));
    assert_eq!(entries[0].top_tracks, Some(vec!["Nikes".to_string()]));
    assert_eq!(
        entries[1].genres,
        Some(DEFAULT_GENRES.iter().map(|g| g.to_string()).collect())
    );
    assert_eq!(
        entries[1].moods,
        Some(vec!["Chill".to_string(), "Energetic".to_string()])
    );
    assert_eq!(entries[1].top_tracks, Some(vec!["Ctrl opener".to_string()]));
    assert_eq!(entries[2].top_tracks, Some(vec![UNKNOWN_TRACK.to_string()]));
}

#[test]
fn test_rename_plan() {
    let entries = vec![
        create_test_entry(1, "Frank Ocean", "Blonde"),
        create_test_entry(2, "SZA", "Ctrl"),
        create_test_entry(3, "Nobody", "Missing"),
    ];
    let files = vec![
        "ROOM_07_SZA_Ctrl.jpg".to_string(),
        "ROOM_02_Frank_Ocean_Blonde.jpg".to_string(),
    ];

    let plan = rename_plan(&entries, &files, "ROOM");

    assert_eq!(
        plan.renames,
        vec![
            (
                "ROOM_02_Frank_Ocean_Blonde.jpg".to_string(),
                "ROOM_01_Frank_Ocean_Blonde.jpg".to_string()
            ),
            (
                "ROOM_07_SZA_Ctrl.jpg".to_string(),
                "ROOM_02_SZA_Ctrl.jpg".to_string()
            ),
        ]
    );
    assert_eq!(
        plan.missing,
        vec![("Nobody".to_string(), "Missing".to_string())]
    );
}

#[test]
fn test_rename_plan_claims_each_file_once() {
    let entries = vec![
        create_test_entry(1, "SZA", "Ctrl"),
        create_test_entry(2, "SZA", "Ctrl"),
    ];
    let files = vec!["ROOM_01_SZA_Ctrl.jpg".to_string()];

    let plan = rename_plan(&entries, &files, "ROOM");

    assert_eq!(plan.renames.len(), 1);
    assert_eq!(plan.missing.len(), 1);
}

#[test]
fn test_ranking_mode_from_str() {
    assert_eq!("popularity".parse::<RankingMode>(), Ok(RankingMode::Popularity));
    assert_eq!(
        " Representation ".parse::<RankingMode>(),
        Ok(RankingMode::Representation)
    );
    assert!("loudness".parse::<RankingMode>().is_err());
    assert_eq!(RankingMode::Representation.to_string(), "representation");
}
