//! Top-k ranking shared by the full-build and incremental paths.
//!
//! Every ordering of neighbours goes through [`rank_order`]: higher score
//! first, then lower id. Both paths therefore agree exactly on which peers
//! make the cut and in what order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use hearth_core::{Neighbour, PropertyId};

/// `Less` when `a` ranks ahead of `b`.
pub fn rank_order(a: &Neighbour, b: &Neighbour) -> Ordering {
    rank_parts(a.score, &a.id, b.score, &b.id)
}

/// Whether a `(score, id)` candidate ranks ahead of `other`.
pub fn ranks_ahead(score: f64, id: &PropertyId, other: &Neighbour) -> bool {
    rank_parts(score, id, other.score, &other.id) == Ordering::Less
}

fn rank_parts(a_score: f64, a_id: &PropertyId, b_score: f64, b_id: &PropertyId) -> Ordering {
    b_score.total_cmp(&a_score).then_with(|| a_id.cmp(b_id))
}

/// Heap entry ordered by [`rank_order`], so the heap root is the worst
/// candidate kept so far.
#[derive(Debug)]
struct Ranked(Neighbour);

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        rank_order(&self.0, &other.0) == Ordering::Equal
    }
}

impl Eq for Ranked {}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        rank_order(&self.0, &other.0)
    }
}

/// Bounded collector of the `k` best neighbours.
#[derive(Debug)]
pub struct TopK {
    k: usize,
    heap: BinaryHeap<Ranked>,
}

impl TopK {
    /// An empty collector; the heap grows as candidates are kept.
    #[must_use]
    pub fn new(k: usize) -> Self {
        Self {
            k,
            heap: BinaryHeap::new(),
        }
    }

    /// A collector sized for at most `pool_len` candidates.
    #[must_use]
    pub fn for_pool(k: usize, pool_len: usize) -> Self {
        Self {
            k,
            heap: BinaryHeap::with_capacity(k.min(pool_len).saturating_add(1)),
        }
    }

    /// Offer a candidate; once full, the worst entry is evicted.
    pub fn push(&mut self, candidate: Neighbour) {
        if self.admits(candidate.score, &candidate.id) {
            self.insert(candidate);
        }
    }

    /// Like [`TopK::push`], but only clones the id when the candidate is kept.
    pub fn offer(&mut self, id: &PropertyId, score: f64) {
        if self.admits(score, id) {
            self.insert(Neighbour::new(id.clone(), score));
        }
    }

    fn admits(&self, score: f64, id: &PropertyId) -> bool {
        if self.k == 0 {
            return false;
        }
        if self.heap.len() < self.k {
            return true;
        }
        self.heap
            .peek()
            .map_or(true, |worst| ranks_ahead(score, id, &worst.0))
    }

    fn insert(&mut self, candidate: Neighbour) {
        self.heap.push(Ranked(candidate));
        if self.heap.len() > self.k {
            self.heap.pop();
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// The kept neighbours, best first.
    pub fn into_sorted_vec(self) -> Vec<Neighbour> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|ranked| ranked.0)
            .collect()
    }
}

/// Merge `candidate` into an already ranked list and cut it back to `k`.
///
/// The lists are short, so append, sort, truncate is fine here.
pub fn rank_into(list: &mut Vec<Neighbour>, candidate: Neighbour, k: usize) {
    list.push(candidate);
    list.sort_by(rank_order);
    list.truncate(k);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[Neighbour]) -> Vec<&str> {
        list.iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn test_rank_order_score_then_id() {
        let high = Neighbour::new("z", 0.9);
        let low = Neighbour::new("a", 0.1);
        assert_eq!(rank_order(&high, &low), Ordering::Less);

        let tie_a = Neighbour::new("a", 0.5);
        let tie_b = Neighbour::new("b", 0.5);
        assert_eq!(rank_order(&tie_a, &tie_b), Ordering::Less);
    }

    #[test]
    fn test_top_k_keeps_best() {
        let mut top = TopK::new(2);
        top.push(Neighbour::new("a", 0.1));
        top.push(Neighbour::new("b", 0.9));
        top.push(Neighbour::new("c", 0.5));
        top.push(Neighbour::new("d", -0.3));

        assert_eq!(top.len(), 2);
        assert_eq!(ids(&top.into_sorted_vec()), vec!["b", "c"]);
    }

    #[test]
    fn test_top_k_tie_break_by_id() {
        let mut top = TopK::new(2);
        for id in ["d", "b", "c", "a"] {
            top.push(Neighbour::new(id, 0.5));
        }
        assert_eq!(ids(&top.into_sorted_vec()), vec!["a", "b"]);
    }

    #[test]
    fn test_top_k_under_capacity() {
        let mut top = TopK::new(5);
        top.push(Neighbour::new("x", 0.2));
        assert!(!top.is_empty());
        assert_eq!(ids(&top.into_sorted_vec()), vec!["x"]);
    }

    #[test]
    fn test_offer_matches_push() {
        let scores = [("a", 0.4), ("b", 0.2), ("c", 0.4), ("d", 0.8)];
        let mut pushed = TopK::new(2);
        let mut offered = TopK::new(2);
        for (id, score) in scores {
            pushed.push(Neighbour::new(id, score));
            offered.offer(&PropertyId::from(id), score);
        }
        assert_eq!(pushed.into_sorted_vec(), offered.into_sorted_vec());
    }

    #[test]
    fn test_top_k_zero_capacity() {
        let mut top = TopK::new(0);
        top.push(Neighbour::new("x", 0.2));
        assert!(top.is_empty());
    }

    #[test]
    fn test_top_k_unbounded_k() {
        let mut top = TopK::for_pool(usize::MAX, 3);
        for (id, score) in [("a", 0.1), ("b", 0.3), ("c", 0.2)] {
            top.push(Neighbour::new(id, score));
        }
        assert_eq!(ids(&top.into_sorted_vec()), vec!["b", "c", "a"]);

        let mut lazy = TopK::new(usize::MAX);
        lazy.push(Neighbour::new("x", 0.5));
        assert_eq!(lazy.len(), 1);
    }

    #[test]
    fn test_rank_into_matches_top_k() {
        let candidates = [
            Neighbour::new("a", 0.3),
            Neighbour::new("b", 0.7),
            Neighbour::new("c", 0.7),
            Neighbour::new("d", 0.1),
            Neighbour::new("e", 0.9),
        ];

        let mut top = TopK::new(3);
        let mut list = Vec::new();
        for candidate in &candidates {
            top.push(candidate.clone());
            rank_into(&mut list, candidate.clone(), 3);
        }

        assert_eq!(top.into_sorted_vec(), list);
        assert_eq!(ids(&list), vec!["e", "b", "c"]);
    }
}
