//! # Album aggregation
//!
//! Turns a flat sequence of tracks into per-album summaries and ranks them.
//! Both extractors (`top` and `playlist`) feed this module; they only differ in
//! where the tracks come from and in the [`RankingMode`] they pick.
//!
//! - [`aggregate`] groups tracks by album id in a single pass, keeping the
//!   order in which albums were first seen.
//! - [`rank`] sorts summaries by the configured mode. The sort is stable, so
//!   albums with equal keys stay in first-seen order.
//! - [`top_n`] truncates and numbers the ranked list for the visualization.
//! - [`order_by_playlist_sequence`] reorders playlist albums by the time their
//!   first track was added.
//! - [`image_mapping`], [`apply_tags`] and [`rename_plan`] derive the files
//!   that link albums to their cover images.
//!
//! Everything here is pure and in-memory; nothing fails for well-formed input.

mod aggregate;
mod mapping;
mod order;

pub use aggregate::AggregateOptions;
pub use aggregate::AlbumAggregator;
pub use aggregate::DEFAULT_LIMIT;
pub use aggregate::RankingMode;
pub use aggregate::aggregate;
pub use aggregate::rank;
pub use aggregate::top_n;
pub use mapping::DEFAULT_GENRES;
pub use mapping::DEFAULT_MOODS;
pub use mapping::RenamePlan;
pub use mapping::UNKNOWN_TRACK;
pub use mapping::apply_tags;
pub use mapping::image_mapping;
pub use mapping::local_image_path;
pub use mapping::rename_plan;
pub use order::order_by_playlist_sequence;
pub use order::top_n_ordered;
