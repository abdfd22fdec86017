mod contiguity;
mod population;

use rayon::prelude::*;

use crate::{config::FilterConfig, plan::Plan};

pub use contiguity::reject_islands;
pub use population::reject_by_pop;

/// Plans sorted into admissible and rejected sets.
#[derive(Clone, Debug, Default)]
pub struct Filtered {
    /// Contiguous, apportioned plans in input order.
    pub clean: Vec<Plan>,
    /// Contiguity failures (in input order) followed by population failures (in input order).
    pub rejected: Vec<Plan>,
    /// How many of `rejected` failed the contiguity pass.
    pub islands: usize,
    /// How many of `rejected` failed the population pass.
    pub malapportioned: usize,
}

/// Run the contiguity pass, then the population pass over its survivors.
pub fn filter(plans: Vec<Plan>, config: &FilterConfig) -> Filtered {
    let (contiguous, mut rejected) = reject_islands(plans);
    let (clean, malapportioned) = reject_by_pop(contiguous, config);

    let islands = rejected.len();
    let num_malapportioned = malapportioned.len();
    rejected.extend(malapportioned);

    Filtered { clean, rejected, islands, malapportioned: num_malapportioned }
}

/// Evaluate `keep` on every plan in parallel, then split in input order.
pub(crate) fn split_by<F>(plans: Vec<Plan>, keep: F) -> (Vec<Plan>, Vec<Plan>)
where
    F: Fn(&Plan) -> bool + Sync,
{
    let flags = plans.par_iter().map(&keep).collect::<Vec<_>>();

    let mut kept = Vec::with_capacity(plans.len());
    let mut rejected = Vec::new();
    for (plan, ok) in plans.into_iter().zip(flags) {
        if ok { kept.push(plan) } else { rejected.push(plan) }
    }
    (kept, rejected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::{PopulationTarget, Tolerance}, graph::Graph};

    #[test]
    fn rejected_lists_islands_before_malapportioned() {
        // 1x4 path with populations 10, 10, 10, 10.
        let graph = std::sync::Arc::new(Graph::grid(1, 4, vec![10; 4]).unwrap());
        let make = |districts: Vec<u32>| Plan::new(graph.clone(), districts).unwrap();

        let skewed = make(vec![1, 2, 2, 2]);      // contiguous, 10 / 30
        let island = make(vec![1, 2, 1, 2]);      // district 1 split
        let balanced = make(vec![1, 1, 2, 2]);    // contiguous, 20 / 20
        let config = FilterConfig { target: PopulationTarget::Mean, tolerance: Tolerance::Relative(0.05) };

        let filtered = filter(vec![skewed.clone(), island.clone(), balanced.clone()], &config);

        assert_eq!(filtered.clean, vec![balanced]);
        assert_eq!(filtered.rejected, vec![island, skewed]);
        assert_eq!(filtered.islands, 1);
        assert_eq!(filtered.malapportioned, 1);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let filtered = filter(Vec::new(), &FilterConfig::default());
        assert!(filtered.clean.is_empty() && filtered.rejected.is_empty());
    }
}
