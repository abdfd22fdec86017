mod acceptance;
mod proposal;
mod sampler;

pub use acceptance::{AcceptanceRule, Decision, metropolis_hastings_ratio};
pub use proposal::{Proposal, ProposalGenerator};
pub use sampler::{ChainState, ChainStats, Sampler, run_chain};
