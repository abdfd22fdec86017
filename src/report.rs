use std::fmt;

use crate::{config::FilterConfig, dedup::dedup, filter::{Filtered, filter}, plan::Plan};

/// Per-district population figures for one plan.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanSummary {
    /// Population of districts `1..=k`, in label order.
    pub populations: Vec<u64>,
    pub mean: f64,
    /// Population standard deviation of the district populations.
    pub std_dev: f64,
    /// Largest absolute difference from `mean`.
    pub max_deviation: f64,
}

impl PlanSummary {
    pub fn new(plan: &Plan) -> Self {
        let populations = plan.district_populations().into_iter().skip(1).collect::<Vec<_>>();
        let n = populations.len() as f64;
        let mean = populations.iter().sum::<u64>() as f64 / n;
        let variance = populations.iter().map(|&p| (p as f64 - mean).powi(2)).sum::<f64>() / n;
        let max_deviation = populations.iter().map(|&p| (p as f64 - mean).abs()).fold(0.0, f64::max);

        Self { populations, mean, std_dev: variance.sqrt(), max_deviation }
    }

    /// Whether the plan is unequal but only slightly so: `0 < std_dev <= max_std_dev`.
    pub fn is_near_balanced(&self, max_std_dev: f64) -> bool {
        self.std_dev > 0.0 && self.std_dev <= max_std_dev
    }
}

/// Outcome of filtering and deduplicating a chain's plan history.
#[derive(Clone, Debug, Default)]
pub struct ChainReport {
    pub raw: usize,
    pub clean: usize,
    pub rejected: usize,
    pub islands: usize,
    pub malapportioned: usize,
    pub distinct: usize,
    /// Summaries of the distinct clean plans, in chain order.
    pub summaries: Vec<PlanSummary>,
}

impl ChainReport {
    /// Filter `plans`, deduplicate the clean ones, and summarize what is left.
    /// Returns the report alongside the distinct clean plans and the filter output.
    pub fn build(plans: Vec<Plan>, config: &FilterConfig) -> (Self, Vec<Plan>, Filtered) {
        let raw = plans.len();
        let filtered = filter(plans, config);
        let distinct = dedup(filtered.clean.clone());

        let report = Self {
            raw,
            clean: filtered.clean.len(),
            rejected: filtered.rejected.len(),
            islands: filtered.islands,
            malapportioned: filtered.malapportioned,
            distinct: distinct.len(),
            summaries: distinct.iter().map(PlanSummary::new).collect(),
        };
        (report, distinct, filtered)
    }
}

impl fmt::Display for ChainReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, summary) in self.summaries.iter().enumerate() {
            writeln!(f, "Plan {}", index + 1)?;
            writeln!(f, "---------------------")?;
            for (district, population) in summary.populations.iter().enumerate() {
                writeln!(f, "District {}: total population - {}", district + 1, population)?;
            }
            writeln!(f, "Std. dev.: {:.1}", summary.std_dev)?;
            writeln!(f, "---------------------")?;
        }

        writeln!(f, "{} raw plans", self.raw)?;
        writeln!(f, "Kept {} clean plans ({} distinct)", self.clean, self.distinct)?;
        write!(
            f,
            "Rejected {} non-contiguous or malapportioned plans ({} non-contiguous, {} malapportioned)",
            self.rejected, self.islands, self.malapportioned
        )
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{config::{PopulationTarget, Tolerance}, graph::Graph};

    #[test]
    fn summary_statistics() {
        let graph = Graph::new(
            vec![1, 2, 3, 4],
            &[vec![1], vec![0, 2], vec![1, 3], vec![2]],
            vec![10, 20, 30, 40],
        ).unwrap();
        let plan = Plan::new(graph, vec![1, 1, 1, 2]).unwrap();
        let summary = PlanSummary::new(&plan);

        assert_eq!(summary.populations, vec![60, 40]);
        assert_eq!(summary.mean, 50.0);
        assert_eq!(summary.std_dev, 10.0);
        assert_eq!(summary.max_deviation, 10.0);
        assert!(summary.is_near_balanced(10.0));
        assert!(!summary.is_near_balanced(5.0));
    }

    #[test]
    fn perfectly_equal_plan_is_not_near_balanced() {
        let plan = Plan::new(Graph::grid(1, 4, vec![5; 4]).unwrap(), vec![1, 1, 2, 2]).unwrap();
        assert!(!PlanSummary::new(&plan).is_near_balanced(5.0));
    }

    #[test]
    fn report_counts_and_text() {
        let graph = Arc::new(Graph::grid(1, 4, vec![10; 4]).unwrap());
        let balanced = Plan::new(graph.clone(), vec![1, 1, 2, 2]).unwrap();
        let island = Plan::new(graph.clone(), vec![1, 2, 1, 2]).unwrap();
        let skewed = Plan::new(graph.clone(), vec![1, 2, 2, 2]).unwrap();
        let config = FilterConfig { target: PopulationTarget::Mean, tolerance: Tolerance::Relative(0.05) };

        let (report, distinct, filtered) = ChainReport::build(
            vec![balanced.clone(), island, balanced.clone(), skewed],
            &config,
        );

        assert_eq!((report.raw, report.clean, report.rejected, report.distinct), (4, 2, 2, 1));
        assert_eq!((report.islands, report.malapportioned), (1, 1));
        assert_eq!(distinct, vec![balanced]);
        assert_eq!(filtered.clean.len(), 2);

        let text = report.to_string();
        assert!(text.contains("District 1: total population - 20"));
        assert!(text.contains("4 raw plans"));
        assert!(text.contains("Kept 2 clean plans (1 distinct)"));
        assert!(text.ends_with("(1 non-contiguous, 1 malapportioned)"));
    }
}
