use anyhow::Result;
use districtwalk::{ChainReport, read_plans_from_json_file};

use crate::commands::load_inputs;

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::ReportArgs) -> Result<()> {
    let (plan, config) = load_inputs(&args.input)?;
    let plans = read_plans_from_json_file(&args.plans, plan.graph_handle())?;

    let (report, distinct, _) = ChainReport::build(plans, &config.filter);
    println!("{report}");

    if let Some(max_std_dev) = args.near_balanced {
        for (index, (plan, summary)) in distinct.iter().zip(&report.summaries).enumerate() {
            if summary.is_near_balanced(max_std_dev) {
                println!(
                    "Plan {} districts have population: {:?} (std dev: {:.1}) [{}]",
                    index + 1, summary.populations, summary.std_dev, &plan.fingerprint_hex()[..12]
                );
            }
        }
    }

    Ok(())
}
