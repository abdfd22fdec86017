use crate::{
    config::{FilterConfig, PopulationTarget},
    filter::split_by,
    plan::Plan,
};

impl Plan {
    /// The per-district population this plan is measured against.
    pub fn population_target(&self, target: PopulationTarget) -> f64 {
        match target {
            PopulationTarget::Mean => self.total_population() as f64 / self.num_districts() as f64,
            PopulationTarget::Fixed(ideal) => ideal,
        }
    }

    /// Largest absolute difference between a district's population and the target.
    pub fn max_population_deviation(&self, target: PopulationTarget) -> f64 {
        let target = self.population_target(target);
        self.district_populations().iter().skip(1)
            .map(|&population| (population as f64 - target).abs())
            .fold(0.0, f64::max)
    }

    /// Check if every district lies within tolerance of the target population.
    pub fn is_apportioned(&self, config: &FilterConfig) -> bool {
        let allowed = config.tolerance.allowed(self.population_target(config.target));
        self.max_population_deviation(config.target) <= allowed
    }
}

/// Split plans into apportioned and malapportioned ones. Both outputs keep input order.
pub fn reject_by_pop(plans: Vec<Plan>, config: &FilterConfig) -> (Vec<Plan>, Vec<Plan>) {
    split_by(plans, |plan| plan.is_apportioned(config))
}
