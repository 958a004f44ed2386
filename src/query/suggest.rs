//! Nearest-name suggestions for lookups that matched nothing.
//!
//! Distances are measured between normalized keys, so a suggestion never
//! depends on casing or separators. Suggestions are reported next to an
//! empty result and never replace it.

use crate::graph::{NameKey, NodeData};

/// Levenshtein distance over chars.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Pick the closest candidate within `max_distance` edits.
///
/// Ties go to the candidate seen first. A candidate must also be closer than
/// the length of the query key, so very short keys don't match everything.
pub fn nearest<'a>(
    key: &NameKey,
    candidates: impl Iterator<Item = &'a NodeData>,
    max_distance: usize,
) -> Option<&'a NodeData> {
    let query_len = key.as_str().chars().count();
    let mut best: Option<(usize, &NodeData)> = None;

    for node in candidates {
        let distance = edit_distance(key.as_str(), node.key.as_str());
        if distance > max_distance || distance >= query_len {
            continue;
        }
        if best.map_or(true, |(d, _)| distance < d) {
            best = Some((distance, node));
        }
    }

    best.map(|(_, node)| node)
}
