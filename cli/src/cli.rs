use std::path::PathBuf;

/// Districting-plan sampler CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "districtwalk", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Run one chain and write its plan history (forbids stdout)
    Sample(SampleArgs),

    /// Filter, deduplicate and summarize a plan history
    Report(ReportArgs),
}

/// Options shared by every command that loads a graph and configuration.
#[derive(clap::Args, Debug)]
pub struct InputArgs {
    /// Input graph file (JSON), defaults to the built-in Toylandia grid
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub graph: Option<PathBuf>,

    /// Configuration file (JSON); missing fields take their defaults
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Population tolerance as a fraction of the target, overrides the config file
    #[arg(long)]
    pub tolerance: Option<f64>,
}

#[derive(clap::Args, Debug)]
pub struct SampleArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Number of chain iterations
    #[arg(short = 'n', long, default_value_t = 1000)]
    pub iterations: usize,

    /// Random seed, overrides the config file
    #[arg(long)]
    pub seed: Option<u64>,

    /// Record a repeat of the current plan on every rejected step
    #[arg(long)]
    pub record_stalls: bool,

    /// Output plan log (must be a file path; "-" is rejected)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: PathBuf,

    /// Overwrite if the file exists
    #[arg(long)]
    pub force: bool,
}

#[derive(clap::Args, Debug)]
pub struct ReportArgs {
    /// Input plan log (JSON), as written by `sample`
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub plans: PathBuf,

    #[command(flatten)]
    pub input: InputArgs,

    /// Only list plans whose district populations have 0 < std. dev. <= this value
    #[arg(long)]
    pub near_balanced: Option<f64>,
}
