use std::collections::{HashMap, VecDeque};

use crate::models::{Invoice, MatchKey, MatchResult};
use crate::service::normalizer::normalize;

/// Pairs original and supplement lines by exact normalized key.
///
/// Output order: matched pairs in supplement order, then removed originals in
/// original order, then added supplement lines in supplement order. Duplicate keys
/// are consumed first-come-first-served in original order.
pub fn reconcile(original: &Invoice, supplement: &Invoice) -> Vec<MatchResult> {
    reconcile_with_positions(original, supplement)
        .into_iter()
        .map(|(result, _)| result)
        .collect()
}

/// Source indices of a match result in the two invoices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub original: Option<usize>,
    pub supplement: Option<usize>,
}

/// Same as [`reconcile`], also reporting where each result came from.
pub fn reconcile_with_positions(
    original: &Invoice,
    supplement: &Invoice,
) -> Vec<(MatchResult, Position)> {
    // key -> unconsumed original indices, in original order
    let mut lookup: HashMap<MatchKey, VecDeque<usize>> = HashMap::new();
    for (idx, item) in original.line_items.iter().enumerate() {
        lookup.entry(normalize(item)).or_default().push_back(idx);
    }

    let mut consumed = vec![false; original.line_items.len()];
    let mut matched = Vec::new();
    let mut added = Vec::new();

    for (s_idx, s) in supplement.line_items.iter().enumerate() {
        let hit = lookup
            .get_mut(&normalize(s))
            .and_then(|queue| queue.pop_front());

        match hit {
            Some(idx) => {
                consumed[idx] = true;
                matched.push((
                    MatchResult::Matched {
                        original: original.line_items[idx].clone(),
                        supplement: s.clone(),
                    },
                    Position { original: Some(idx), supplement: Some(s_idx) },
                ));
            }
            None => added.push((
                MatchResult::Added { supplement: s.clone() },
                Position { original: None, supplement: Some(s_idx) },
            )),
        }
    }

    let removed: Vec<(MatchResult, Position)> = original
        .line_items
        .iter()
        .enumerate()
        .filter(|(idx, _)| !consumed[*idx])
        .map(|(idx, o)| {
            (
                MatchResult::Removed { original: o.clone() },
                Position { original: Some(idx), supplement: None },
            )
        })
        .collect();

    tracing::debug!(
        "reconciled {} original / {} supplement lines: {} matched, {} removed, {} added",
        original.len(),
        supplement.len(),
        matched.len(),
        removed.len(),
        added.len()
    );

    let mut results = matched;
    results.extend(removed);
    results.extend(added);
    results
}
