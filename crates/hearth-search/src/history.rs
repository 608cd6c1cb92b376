//! Recommendations from a viewing history.
//!
//! Viewed ids are given oldest first, so the last element is the most recent
//! view. Walking back from the most recent view, the view at distance `i`
//! weighs `1 / (i + 1)`; each peer in that property's neighbour list earns
//! `score × weight`, summed over all views. Peers that were themselves viewed
//! are left out.

use std::collections::{HashMap, HashSet};

use hearth_core::{Neighbour, PropertyId};

use crate::index::SimilarityIndex;
use crate::ranking::rank_order;

/// Anything that can hand out a property's ranked neighbours.
pub trait NeighbourSource {
    /// The ranked list for `id`, or `None` when `id` is unknown.
    fn neighbours_of(&self, id: &str) -> Option<&[Neighbour]>;
}

impl NeighbourSource for SimilarityIndex {
    fn neighbours_of(&self, id: &str) -> Option<&[Neighbour]> {
        self.neighbours(id).ok()
    }
}

impl NeighbourSource for HashMap<PropertyId, Vec<Neighbour>> {
    fn neighbours_of(&self, id: &str) -> Option<&[Neighbour]> {
        self.get(id).map(Vec::as_slice)
    }
}

/// Combines the neighbour lists of recently viewed properties.
#[derive(Debug, Clone, Copy)]
pub struct HistoryAggregator {
    limit: usize,
}

impl HistoryAggregator {
    #[must_use]
    pub const fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Rank peers for a history given oldest first.
    ///
    /// Unknown ids are skipped. An empty history yields an empty list.
    pub fn aggregate<S, I>(&self, source: &S, viewed: &[I]) -> Vec<Neighbour>
    where
        S: NeighbourSource + ?Sized,
        I: AsRef<str>,
    {
        let seen: HashSet<&str> = viewed.iter().map(|id| id.as_ref()).collect();
        let mut totals: HashMap<&PropertyId, f64> = HashMap::new();

        for (position, viewed_id) in viewed.iter().rev().enumerate() {
            let viewed_id = viewed_id.as_ref();
            let Some(neighbours) = source.neighbours_of(viewed_id) else {
                log::debug!("Skipping unindexed history entry {}", viewed_id);
                continue;
            };

            #[allow(clippy::cast_precision_loss)]
            let weight = 1.0 / (position + 1) as f64;
            for neighbour in neighbours {
                if seen.contains(neighbour.id.as_str()) {
                    continue;
                }
                *totals.entry(&neighbour.id).or_insert(0.0) += neighbour.score * weight;
            }
        }

        let mut ranked: Vec<Neighbour> = totals
            .into_iter()
            .map(|(id, score)| Neighbour::new(id.clone(), score))
            .collect();
        ranked.sort_by(rank_order);
        ranked.truncate(self.limit);
        ranked
    }
}

impl Default for HistoryAggregator {
    fn default() -> Self {
        Self::new(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lists(entries: Vec<(&str, Vec<(&str, f64)>)>) -> HashMap<PropertyId, Vec<Neighbour>> {
        entries
            .into_iter()
            .map(|(id, peers)| {
                let peers = peers
                    .into_iter()
                    .map(|(peer, score)| Neighbour::new(peer, score))
                    .collect();
                (PropertyId::from(id), peers)
            })
            .collect()
    }

    fn score_of(ranked: &[Neighbour], id: &str) -> Option<f64> {
        ranked.iter().find(|n| n.id.as_str() == id).map(|n| n.score)
    }

    #[test]
    fn test_recency_weighting() {
        let source = lists(vec![("A", vec![("C", 0.4)]), ("B", vec![("C", 0.8)])]);
        let ranked = HistoryAggregator::default().aggregate(&source, &["A", "B"]);

        assert_eq!(ranked.len(), 1);
        assert!((score_of(&ranked, "C").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_most_recent_view_dominates() {
        let source = lists(vec![("A", vec![("X", 0.9)]), ("B", vec![("Y", 0.9)])]);
        let ranked = HistoryAggregator::default().aggregate(&source, &["A", "B"]);

        let order: Vec<&str> = ranked.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(order, vec!["Y", "X"]);
        assert!((score_of(&ranked, "X").unwrap() - 0.45).abs() < 1e-12);
    }

    #[test]
    fn test_viewed_ids_excluded() {
        let source = lists(vec![("A", vec![("B", 0.9), ("C", 0.5)]), ("B", vec![("A", 0.9)])]);
        let ranked = HistoryAggregator::default().aggregate(&source, &["A", "B"]);

        assert!(score_of(&ranked, "A").is_none());
        assert!(score_of(&ranked, "B").is_none());
        assert!(score_of(&ranked, "C").is_some());
    }

    #[test]
    fn test_unknown_ids_skipped() {
        let source = lists(vec![("A", vec![("C", 0.4)])]);
        let ranked = HistoryAggregator::default().aggregate(&source, &["A", "ghost"]);

        // A sits one step behind the unknown most recent view
        assert!((score_of(&ranked, "C").unwrap() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_empty_history() {
        let source = lists(vec![("A", vec![("C", 0.4)])]);
        let viewed: [&str; 0] = [];
        assert!(HistoryAggregator::default().aggregate(&source, &viewed).is_empty());
    }

    #[test]
    fn test_limit_and_tie_break() {
        let peers: Vec<(String, f64)> = (0..15).map(|i| (format!("p{i:02}"), 0.5)).collect();
        let borrowed: Vec<(&str, f64)> = peers.iter().map(|(id, s)| (id.as_str(), *s)).collect();
        let source = lists(vec![("A", borrowed)]);

        let ranked = HistoryAggregator::new(10).aggregate(&source, &["A"]);
        assert_eq!(ranked.len(), 10);
        assert_eq!(ranked[0].id.as_str(), "p00");
        assert_eq!(ranked[9].id.as_str(), "p09");
    }

    #[test]
    fn test_repeated_views_accumulate() {
        let source = lists(vec![("A", vec![("C", 0.6)])]);
        let ranked = HistoryAggregator::default().aggregate(&source, &["A", "A"]);
        // 0.6 × 1 + 0.6 × 0.5
        assert!((score_of(&ranked, "C").unwrap() - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_accepts_owned_ids() {
        let source = lists(vec![("A", vec![("C", 0.4)])]);
        let viewed = vec![PropertyId::from("A")];
        assert_eq!(HistoryAggregator::default().aggregate(&source, &viewed).len(), 1);
    }
}
