//! Identity-based pairing of sections and rows between two documents.
//!
//! Matching is deliberately structural: sections pair by table name, rows
//! pair by resolved description, both exact string comparisons. Cosmetic
//! renames therefore read as a remove plus an add. The only concession is
//! the opt-in `normalize_labels` knob (trim + case-fold), which callers
//! must enable explicitly.

use crate::config::ScanConfig;
use crate::totals::TableTotals;
use std::collections::HashMap;

/// One pairing outcome. Indices point into the respective input slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pairing {
    Matched { old_idx: usize, new_idx: usize },
    RemovedFromOld { old_idx: usize },
    AddedInNew { new_idx: usize },
}

fn match_key(label: &str, config: &ScanConfig) -> String {
    if config.normalize_labels {
        label.trim().to_lowercase()
    } else {
        label.to_string()
    }
}

fn pair_by_key(
    old_keys: &[String],
    new_keys: &[String],
) -> Vec<Pairing> {
    let new_by_key: HashMap<&str, usize> = new_keys
        .iter()
        .enumerate()
        .map(|(idx, key)| (key.as_str(), idx))
        .collect();
    let old_by_key: HashMap<&str, usize> = old_keys
        .iter()
        .enumerate()
        .map(|(idx, key)| (key.as_str(), idx))
        .collect();

    // Old-document order first (matched and removed interleaved as
    // authored), then additions in new-document order. Deterministic for
    // stable output.
    let mut pairings = Vec::with_capacity(old_keys.len() + new_keys.len());
    for (old_idx, key) in old_keys.iter().enumerate() {
        match new_by_key.get(key.as_str()) {
            Some(&new_idx) => pairings.push(Pairing::Matched { old_idx, new_idx }),
            None => pairings.push(Pairing::RemovedFromOld { old_idx }),
        }
    }
    for (new_idx, key) in new_keys.iter().enumerate() {
        if !old_by_key.contains_key(key.as_str()) {
            pairings.push(Pairing::AddedInNew { new_idx });
        }
    }
    pairings
}

/// Pair sections (tables) of two documents by name.
///
/// Both sides are expected to have already been run through the totals
/// engine so that any overrides are honored before comparison.
pub fn pair_sections(
    old: &[TableTotals],
    new: &[TableTotals],
    config: &ScanConfig,
) -> Vec<Pairing> {
    let old_keys: Vec<String> = old.iter().map(|t| match_key(&t.name, config)).collect();
    let new_keys: Vec<String> = new.iter().map(|t| match_key(&t.name, config)).collect();
    pair_by_key(&old_keys, &new_keys)
}

/// Pair rows of two matched sections by resolved description.
pub fn pair_rows(old: &TableTotals, new: &TableTotals, config: &ScanConfig) -> Vec<Pairing> {
    let old_keys: Vec<String> = old
        .items
        .iter()
        .map(|item| match_key(&item.description, config))
        .collect();
    let new_keys: Vec<String> = new
        .items
        .iter()
        .map(|item| match_key(&item.description, config))
        .collect();
    pair_by_key(&old_keys, &new_keys)
}
