use std::path::Path;

use anyhow::{Context, Result, bail};
use districtwalk::{ChainReport, Sampler, StallPolicy, write_plans_to_json_file};
use tracing::info;

use crate::commands::load_inputs;

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::SampleArgs) -> Result<()> {
    // Assert output path is not stdout
    if args.output == Path::new("-") { bail!("stdout is not supported."); }
    if args.output.exists() && !args.force {
        bail!("{} already exists (use --force to overwrite)", args.output.display());
    }

    let (plan, mut config) = load_inputs(&args.input)?;
    if args.seed.is_some() { config.sampler.seed = args.seed }
    if args.record_stalls { config.sampler.stall_policy = StallPolicy::Repeat }

    info!(
        graph = plan.graph().name().unwrap_or("<unnamed>"),
        nodes = plan.graph().node_count(),
        districts = plan.num_districts(),
        iterations = args.iterations,
        "starting chain"
    );

    let mut sampler = Sampler::new(plan, &config.sampler)?;
    let plans = sampler.run(args.iterations)
        .with_context(|| format!("chain aborted after {} iterations", sampler.stats().iterations))?;

    write_plans_to_json_file(&plans, &args.output)?;
    println!("Wrote {} plans -> {}", plans.len(), args.output.display());

    let stats = sampler.stats();
    println!("{} accepted, {} stalled, {} proposal draws", stats.accepted, stats.stalled, stats.attempts);

    let (report, _, _) = ChainReport::build(plans, &config.filter);
    println!("{report}");

    Ok(())
}
