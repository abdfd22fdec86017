use ahash::AHashSet;
use rayon::prelude::*;
use sha2::{Digest, Sha256};

use crate::plan::Plan;

impl Plan {
    /// SHA-256 digest of the plan's `(node id, district)` pairs in id order.
    /// Plans with the same label assignment share a fingerprint regardless of node order.
    pub fn fingerprint(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        for (id, district) in self.assignments() {
            hasher.update(id.to_le_bytes());
            hasher.update(district.to_le_bytes());
        }
        hasher.finalize().into()
    }

    /// Hex-encoded fingerprint.
    pub fn fingerprint_hex(&self) -> String { hex::encode(self.fingerprint()) }
}

/// Collapse plans with identical label assignments, keeping first occurrences in input order.
pub fn dedup(plans: Vec<Plan>) -> Vec<Plan> {
    let fingerprints = plans.par_iter().map(Plan::fingerprint).collect::<Vec<_>>();

    let mut seen = AHashSet::with_capacity(plans.len());
    plans.into_iter().zip(fingerprints)
        .filter_map(|(plan, key)| seen.insert(key).then_some(plan))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::graph::Graph;

    fn make_graph() -> Arc<Graph> {
        Arc::new(Graph::grid(2, 2, vec![1; 4]).unwrap())
    }

    #[test]
    fn dedup_keeps_first_occurrences_in_order() {
        let graph = make_graph();
        let a = Plan::new(graph.clone(), vec![1, 1, 2, 2]).unwrap();
        let b = Plan::new(graph.clone(), vec![1, 2, 1, 2]).unwrap();

        let distinct = dedup(vec![a.clone(), b.clone(), a.clone(), b.clone(), a.clone()]);
        assert_eq!(distinct, vec![a, b]);
    }

    #[test]
    fn dedup_is_idempotent() {
        let graph = make_graph();
        let plans = vec![
            Plan::new(graph.clone(), vec![1, 1, 2, 2]).unwrap(),
            Plan::new(graph.clone(), vec![1, 1, 2, 2]).unwrap(),
            Plan::new(graph.clone(), vec![2, 1, 2, 1]).unwrap(),
        ];

        let once = dedup(plans);
        let twice = dedup(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once.len(), 2);
    }

    #[test]
    fn fingerprint_ignores_node_order() {
        // Same labeling over a graph whose nodes are stored in reverse order.
        let forward = Graph::new(vec![1, 2, 3], &[vec![1], vec![0, 2], vec![1]], vec![5, 5, 5]).unwrap();
        let reverse = Graph::new(vec![3, 2, 1], &[vec![1], vec![0, 2], vec![1]], vec![5, 5, 5]).unwrap();

        let a = Plan::new(forward, vec![1, 1, 2]).unwrap();
        let b = Plan::new(reverse, vec![2, 1, 1]).unwrap();

        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint_hex().len(), 64);
        assert_eq!(dedup(vec![a.clone(), b]), vec![a]);
    }

    #[test]
    fn different_labelings_have_different_fingerprints() {
        let graph = make_graph();
        let a = Plan::new(graph.clone(), vec![1, 1, 2, 2]).unwrap();
        assert_ne!(a.fingerprint(), a.with_move(1, 2).fingerprint());
    }
}
