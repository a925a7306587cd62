//! Fuzzy matching of album records against image filenames.
//!
//! Filenames on disk drift from the JSON records over time (renames, manual
//! downloads, different sanitizing). Both sides are normalized to lowercase
//! alphanumerics and compared with the Ratcliff/Obershelp similarity ratio,
//! the same measure Python's `difflib.SequenceMatcher.ratio` reports.

use std::{collections::HashMap, path::Path};

use crate::{albums::local_image_path, types::ImageMappingEntry};

/// Minimum similarity for a candidate to count as a match.
pub const DEFAULT_CUTOFF: f64 = 0.6;

/// Result of looking up the best candidate for one key.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome<'a> {
    Matched { candidate: &'a str, score: f64 },
    /// Several candidates share the best score; the caller has to decide.
    Ambiguous { candidates: Vec<&'a str>, score: f64 },
    NoMatch,
}

/// Lowercases and keeps only alphanumeric characters.
pub fn normalize(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Match key of an album record, built from artist and album name.
pub fn record_key(artist: &str, name: &str) -> String {
    normalize(&format!("{artist} {name}"))
}

/// Match key of an image file: the normalized file stem.
pub fn file_key(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);
    normalize(stem)
}

/// Ratcliff/Obershelp similarity of two strings in `[0, 1]`.
///
/// Twice the number of matched characters divided by the total length. Two
/// empty strings are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (i, j, size) = longest_common_block(a, b);
    if size == 0 {
        return 0;
    }
    size + matching_chars(&a[..i], &b[..j]) + matching_chars(&a[i + size..], &b[j + size..])
}

/// Longest common substring as `(start_a, start_b, len)`. Ties resolve to the
/// earliest start in `a`, then in `b`.
fn longest_common_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    // lengths of common suffixes ending at a[i - 1], b[j - 1]
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            curr[j] = if a[i - 1] == b[j - 1] {
                prev[j - 1] + 1
            } else {
                0
            };

            let len = curr[j];
            let (start_a, start_b) = (i - len, j - len);
            if len > best.2
                || (len == best.2 && len > 0 && (start_a, start_b) < (best.0, best.1))
            {
                best = (start_a, start_b, len);
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    best
}

/// Picks the candidate most similar to `key`.
///
/// The ratio is not symmetric; each candidate is the first sequence and `key`
/// the second. Candidates scoring below `cutoff` are ignored. A tie at the
/// best score is reported as [`MatchOutcome::Ambiguous`] instead of picking
/// one arbitrarily.
pub fn best_match<'a, I>(key: &str, candidates: I, cutoff: f64) -> MatchOutcome<'a>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best_score = f64::NEG_INFINITY;
    let mut best: Vec<&'a str> = Vec::new();

    for candidate in candidates {
        let score = similarity(candidate, key);
        if score < cutoff {
            continue;
        }

        if score > best_score {
            best_score = score;
            best.clear();
            best.push(candidate);
        } else if score == best_score && !best.contains(&candidate) {
            best.push(candidate);
        }
    }

    match best.len() {
        0 => MatchOutcome::NoMatch,
        1 => MatchOutcome::Matched {
            candidate: best[0],
            score: best_score,
        },
        _ => MatchOutcome::Ambiguous {
            candidates: best,
            score: best_score,
        },
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct RelinkReport {
    pub matched: usize,
    /// `(artist, name)` of entries without a candidate above the cutoff.
    pub unmatched: Vec<(String, String)>,
    /// `(artist, name, tied filenames)` of entries with several best candidates.
    pub ambiguous: Vec<(String, String, Vec<String>)>,
}

/// Points each mapping entry's `local_image` at its best matching file.
///
/// Entries without a unique match keep their current `local_image` and are
/// listed in the report.
pub fn relink_entries(
    entries: &mut [ImageMappingEntry],
    files: &[String],
    cutoff: f64,
) -> RelinkReport {
    let mut by_key: HashMap<String, Vec<&String>> = HashMap::new();
    for file in files {
        by_key.entry(file_key(file)).or_default().push(file);
    }

    let mut report = RelinkReport::default();

    for entry in entries.iter_mut() {
        let key = record_key(&entry.artist, &entry.name);
        let outcome = best_match(&key, by_key.keys().map(String::as_str), cutoff);

        let tied: Vec<&String> = match outcome {
            MatchOutcome::Matched { candidate, .. } => by_key[candidate].clone(),
            MatchOutcome::Ambiguous { candidates, .. } => candidates
                .iter()
                .flat_map(|c| by_key[*c].iter().copied())
                .collect(),
            MatchOutcome::NoMatch => {
                report
                    .unmatched
                    .push((entry.artist.clone(), entry.name.clone()));
                continue;
            }
        };

        if let [file] = tied.as_slice() {
            entry.local_image = local_image_path(file);
            report.matched += 1;
        } else {
            let mut names: Vec<String> = tied.iter().map(|f| f.to_string()).collect();
            names.sort();
            report
                .ambiguous
                .push((entry.artist.clone(), entry.name.clone(), names));
        }
    }

    report
}
