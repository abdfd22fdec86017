use rand::Rng;
use smallvec::SmallVec;

use crate::{config::DistrictWindow, error::{Result, SamplerError}, plan::Plan};

/// A boundary node and the neighboring nodes it could absorb into its own district.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proposal {
    pub source: usize,
    pub candidates: SmallVec<[usize; 8]>,
    /// Number of source draws spent finding this proposal (at least 1).
    pub attempts: usize,
}

impl Proposal {
    /// Pick one candidate uniformly at random (the sole candidate when there is only one).
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        match self.candidates.as_slice() {
            [only] => *only,
            all => all[rng.random_range(0..all.len())],
        }
    }
}

/// Draws single-node swap proposals at district boundaries, restricted to
/// districts whose member count lies inside a size window.
#[derive(Clone, Copy, Debug)]
pub struct ProposalGenerator {
    window: DistrictWindow,
    max_attempts: usize,
}

impl ProposalGenerator {
    pub fn new(window: DistrictWindow, max_attempts: usize) -> Self {
        assert!(max_attempts > 0, "max_attempts must be at least 1");
        Self { window, max_attempts }
    }

    #[inline] pub fn window(&self) -> DistrictWindow { self.window }

    /// Fail unless at least one district currently satisfies the size window.
    pub fn check_window(&self, plan: &Plan) -> Result<()> {
        let sizes = plan.district_sizes();
        if sizes.iter().skip(1).any(|&size| self.window.contains(size)) { return Ok(()) }

        Err(SamplerError::config(format!(
            "no node satisfies district-size window [{}, {}]", self.window.min, self.window.max
        )))
    }

    /// Neighbors of `source` in a different district whose own district lies inside the window.
    pub fn candidates(&self, plan: &Plan, sizes: &[usize], source: usize) -> SmallVec<[usize; 8]> {
        let part = plan.district(source);
        plan.graph().edges(source)
            .filter(|&v| plan.district(v) != part)
            .filter(|&v| self.window.contains(sizes[plan.district(v) as usize]))
            .collect()
    }

    /// Draw a source node uniformly among nodes whose district lies inside the window,
    /// redrawing until it has at least one candidate. A plan with no such source
    /// exhausts the retry budget like any other dead end.
    pub fn propose<R: Rng + ?Sized>(&self, plan: &Plan, rng: &mut R) -> Result<Proposal> {
        let sizes = plan.district_sizes();
        let mut last_source = None;
        for attempt in 1..=self.max_attempts {
            let source = rng.random_range(0..plan.graph().node_count());
            if !self.window.contains(sizes[plan.district(source) as usize]) { continue }
            last_source = Some(source);

            let candidates = self.candidates(plan, &sizes, source);
            if !candidates.is_empty() {
                return Ok(Proposal { source, candidates, attempts: attempt })
            }
        }

        Err(SamplerError::RetryExhausted {
            attempts: self.max_attempts,
            last_source: last_source.map(|node| plan.graph().id(node)),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::graph::Graph;

    /// 6x6 grid split into six 2x3 blocks, uniform population.
    fn make_grid_plan() -> Plan {
        let graph = Graph::grid(6, 6, vec![25; 36]).unwrap();
        let districts = (0..36).map(|node| {
            let (r, c) = (node / 6, node % 6);
            (r / 2 * 2 + c / 3 + 1) as u32
        }).collect();
        Plan::new(graph, districts).unwrap()
    }

    #[test]
    fn proposals_cross_district_boundaries() {
        let plan = make_grid_plan();
        let generator = ProposalGenerator::new(DistrictWindow::default(), 1000);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let proposal = generator.propose(&plan, &mut rng).unwrap();
            assert!(!proposal.candidates.is_empty());
            assert!(proposal.attempts >= 1);
            for &v in &proposal.candidates {
                assert_ne!(plan.district(v), plan.district(proposal.source));
                assert!(plan.graph().edges(proposal.source).any(|u| u == v));
            }
        }
    }

    #[test]
    fn candidates_exclude_districts_outside_window() {
        // District 2 grows to 8 nodes and district 1 shrinks to 4, so neither can take part.
        let plan = make_grid_plan().with_move(2, 2).with_move(8, 2);
        let sizes = plan.district_sizes();
        assert_eq!(sizes[2], 8);

        let generator = ProposalGenerator::new(DistrictWindow::default(), 1000);
        // Node 1 (district 1) borders node 2, which now belongs to district 2.
        assert!(generator.candidates(&plan, &sizes, 1).iter().all(|&v| plan.district(v) != 2));

        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let proposal = generator.propose(&plan, &mut rng).unwrap();
            assert_ne!(plan.district(proposal.source), 2);
            assert!(proposal.candidates.iter().all(|&v| plan.district(v) != 2));
        }
    }

    #[test]
    fn unsatisfiable_window_is_a_configuration_error() {
        let plan = make_grid_plan();
        let generator = ProposalGenerator::new(DistrictWindow { min: 10, max: 12 }, 1000);

        let err = generator.check_window(&plan).unwrap_err();
        assert_eq!(err, SamplerError::config("no node satisfies district-size window [10, 12]"));
    }

    #[test]
    fn proposing_outside_the_window_exhausts_retries() {
        let plan = make_grid_plan();
        let generator = ProposalGenerator::new(DistrictWindow { min: 10, max: 12 }, 50);
        let mut rng = StdRng::seed_from_u64(1);

        let err = generator.propose(&plan, &mut rng).unwrap_err();
        assert_eq!(err, SamplerError::RetryExhausted { attempts: 50, last_source: None });
    }

    #[test]
    fn no_boundary_exhausts_retries() {
        // A single district has no boundary to swap across.
        let graph = Arc::new(Graph::grid(2, 3, vec![1; 6]).unwrap());
        let plan = Plan::new(graph, vec![1; 6]).unwrap();
        let generator = ProposalGenerator::new(DistrictWindow { min: 1, max: 6 }, 25);
        let mut rng = StdRng::seed_from_u64(3);

        match generator.propose(&plan, &mut rng).unwrap_err() {
            SamplerError::RetryExhausted { attempts, last_source } => {
                assert_eq!(attempts, 25);
                assert!(last_source.is_some());
            }
            err => panic!("unexpected error: {err}"),
        }
    }

    #[test]
    fn pick_returns_member_of_candidates() {
        let mut rng = StdRng::seed_from_u64(5);
        let single = Proposal { source: 0, candidates: SmallVec::from_slice(&[4]), attempts: 1 };
        assert_eq!(single.pick(&mut rng), 4);

        let many = Proposal { source: 0, candidates: SmallVec::from_slice(&[1, 2, 3]), attempts: 1 };
        for _ in 0..20 { assert!([1, 2, 3].contains(&many.pick(&mut rng))) }
    }
}
