use rand::Rng;

use crate::plan::Plan;

/// Metropolis-Hastings ratio for moving `proposal` into the district of `source`.
///
/// The target term is the population ratio and the proposal densities are
/// inverse degrees, so `alpha = min(1, (pop(p) / pop(s)) * (deg(s) / deg(p)))`.
pub fn metropolis_hastings_ratio(plan: &Plan, source: usize, proposal: usize) -> f64 {
    let graph = plan.graph();
    let score_source = graph.population(source) as f64;
    let score_prop = graph.population(proposal) as f64;
    let q_source = 1.0 / graph.degree(source) as f64;
    let q_prop = 1.0 / graph.degree(proposal) as f64;

    ((score_prop / score_source) * (q_prop / q_source)).min(1.0)
}

/// Outcome of one acceptance test.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decision {
    pub alpha: f64,
    pub beta: f64,
    pub accepted: bool,
}

/// Damped Metropolis-Hastings test: accept iff `alpha > beta` with `beta ~ U[floor, 1)`.
///
/// A floor of 0 gives the textbook test. The default floor of 0.5 makes
/// every move with `alpha <= 0.5` impossible and damps the rest.
#[derive(Clone, Copy, Debug)]
pub struct AcceptanceRule {
    threshold_floor: f64,
}

impl Default for AcceptanceRule {
    fn default() -> Self { Self { threshold_floor: 0.5 } }
}

impl AcceptanceRule {
    pub fn new(threshold_floor: f64) -> Self {
        assert!((0.0..1.0).contains(&threshold_floor), "threshold_floor must be in [0, 1)");
        Self { threshold_floor }
    }

    #[inline] pub fn threshold_floor(&self) -> f64 { self.threshold_floor }

    /// Run the test and report the ratio and threshold that decided it.
    pub fn evaluate<R: Rng + ?Sized>(&self, plan: &Plan, source: usize, proposal: usize, rng: &mut R) -> Decision {
        let alpha = metropolis_hastings_ratio(plan, source, proposal);
        let beta = rng.random_range(self.threshold_floor..1.0);
        Decision { alpha, beta, accepted: alpha > beta }
    }

    /// Decide whether to accept moving `proposal` into the district of `source`.
    #[inline]
    pub fn decide<R: Rng + ?Sized>(&self, plan: &Plan, source: usize, proposal: usize, rng: &mut R) -> bool {
        self.evaluate(plan, source, proposal, rng).accepted
    }
}
