#![doc = "districtwalk: Metropolis-Hastings sampling of districting plans on a fixed adjacency graph"]
mod chain;
mod config;
mod dedup;
mod error;
mod filter;
mod graph;
mod plan;
mod report;

pub mod init;

#[doc(inline)]
pub use graph::Graph;

#[doc(inline)]
pub use plan::{Plan, plans_from_json, plans_to_json, read_plans_from_json_file, write_plans_to_json_file};

#[doc(inline)]
pub use chain::{
    AcceptanceRule, ChainState, ChainStats, Decision, Proposal, ProposalGenerator, Sampler,
    metropolis_hastings_ratio, run_chain,
};

#[doc(inline)]
pub use filter::{Filtered, filter, reject_by_pop, reject_islands};

#[doc(inline)]
pub use dedup::dedup;

#[doc(inline)]
pub use report::{ChainReport, PlanSummary};

#[doc(inline)]
pub use config::{Config, DistrictWindow, FilterConfig, PopulationTarget, SamplerConfig, StallPolicy, Tolerance};

#[doc(inline)]
pub use error::{Result, SamplerError};
