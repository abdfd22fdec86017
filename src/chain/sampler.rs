use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, info, warn};

use crate::{
    chain::{AcceptanceRule, ProposalGenerator},
    config::{SamplerConfig, StallPolicy},
    error::{Result, SamplerError},
    plan::Plan,
};

/// Where the chain sits within one iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChainState {
    AwaitingProposal,
    Testing,
    Accepted,
    Stalled,
}

/// Counters accumulated over the lifetime of a sampler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChainStats {
    pub iterations: usize,
    pub accepted: usize,
    pub stalled: usize,
    /// Total source draws spent across all proposals.
    pub attempts: usize,
}

/// A single Metropolis-Hastings chain over districting plans.
///
/// The sampler owns its working plan and random stream, so independent
/// chains never share state.
#[derive(Debug)]
pub struct Sampler<R: Rng = StdRng> {
    current: Plan,
    rng: R,
    proposals: ProposalGenerator,
    acceptance: AcceptanceRule,
    stall_policy: StallPolicy,
    log_every: usize,
    state: ChainState,
    stats: ChainStats,
}

impl Sampler<StdRng> {
    /// Build a sampler seeded from `config.seed`, or from OS entropy when unset.
    pub fn new(initial: Plan, config: &SamplerConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(initial, config, rng)
    }
}

impl<R: Rng> Sampler<R> {
    /// Build a sampler drawing from the given random stream.
    /// Fails if the settings are invalid or no district satisfies the size window.
    pub fn with_rng(initial: Plan, config: &SamplerConfig, rng: R) -> Result<Self> {
        config.validate().map_err(|err| SamplerError::config(err.to_string()))?;

        let proposals = ProposalGenerator::new(config.window, config.max_attempts);
        proposals.check_window(&initial)?;

        Ok(Self {
            current: initial,
            rng,
            proposals,
            acceptance: AcceptanceRule::new(config.threshold_floor),
            stall_policy: config.stall_policy,
            log_every: config.log_every,
            state: ChainState::AwaitingProposal,
            stats: ChainStats::default(),
        })
    }

    /// Get the current working plan.
    #[inline] pub fn current(&self) -> &Plan { &self.current }

    /// Get the state reached by the most recent step.
    #[inline] pub fn state(&self) -> ChainState { self.state }

    /// Get the counters accumulated so far.
    #[inline] pub fn stats(&self) -> ChainStats { self.stats }

    /// Consume the sampler, returning its working plan.
    #[inline] pub fn into_plan(self) -> Plan { self.current }

    /// Perform one iteration. Returns the plan to append to the history, if any:
    /// the new plan on acceptance, or a repeat of the current one when stalls are recorded.
    pub fn step(&mut self) -> Result<Option<Plan>> {
        self.state = ChainState::AwaitingProposal;
        let proposal = match self.proposals.propose(&self.current, &mut self.rng) {
            Ok(proposal) => proposal,
            Err(err) => {
                if let SamplerError::RetryExhausted { attempts, last_source } = &err {
                    warn!(iteration = self.stats.iterations, attempts, ?last_source, "proposal retries exhausted");
                }
                return Err(err)
            }
        };
        self.stats.attempts += proposal.attempts;

        let target = proposal.pick(&mut self.rng);

        self.state = ChainState::Testing;
        let decision = self.acceptance.evaluate(&self.current, proposal.source, target, &mut self.rng);
        self.stats.iterations += 1;

        let district = self.current.district(proposal.source);
        if decision.accepted {
            self.state = ChainState::Accepted;
            self.stats.accepted += 1;
            debug!(
                source = self.current.graph().id(proposal.source),
                node = self.current.graph().id(target),
                from = self.current.district(target),
                to = district,
                alpha = decision.alpha,
                beta = decision.beta,
                "accepted move"
            );

            self.current = self.current.with_move(target, district);
            Ok(Some(self.current.clone()))
        } else {
            self.state = ChainState::Stalled;
            self.stats.stalled += 1;
            debug!(
                source = self.current.graph().id(proposal.source),
                node = self.current.graph().id(target),
                alpha = decision.alpha,
                beta = decision.beta,
                "stalled"
            );

            Ok(match self.stall_policy {
                StallPolicy::Skip => None,
                StallPolicy::Repeat => Some(self.current.clone()),
            })
        }
    }

    /// Run the chain for `iterations` steps, returning the plan history with the
    /// starting plan first. Any retry exhaustion aborts the whole run.
    pub fn run(&mut self, iterations: usize) -> Result<Vec<Plan>> {
        let mut plans = vec![self.current.clone()];

        for i in 1..=iterations {
            if let Some(plan) = self.step()? { plans.push(plan) }

            if i % self.log_every == 0 {
                info!(
                    iteration = i,
                    accepted = self.stats.accepted,
                    stalled = self.stats.stalled,
                    acceptance_rate = self.stats.accepted as f64 / self.stats.iterations as f64,
                    "chain progress"
                );
            }
        }

        info!(
            iterations,
            plans = plans.len(),
            accepted = self.stats.accepted,
            stalled = self.stats.stalled,
            "chain finished"
        );
        Ok(plans)
    }
}

/// Run one seeded (or entropy-seeded) chain from `initial` for `iterations` steps.
pub fn run_chain(initial: Plan, iterations: usize, config: &SamplerConfig) -> Result<Vec<Plan>> {
    Sampler::new(initial, config)?.run(iterations)
}
