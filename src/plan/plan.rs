use std::{collections::BTreeMap, sync::Arc};

use crate::{error::{Result, SamplerError}, graph::Graph};

/// A districting plan: one district label per node of a shared, immutable graph.
///
/// Cloning a plan copies only the label vector; adjacency and populations are
/// shared by every plan built on the same graph.
#[derive(Clone, Debug)]
pub struct Plan {
    graph: Arc<Graph>,
    num_districts: u32, // number of districts at chain start (labels 1..=num_districts)
    districts: Vec<u32>,
}

impl Plan {
    /// Create a plan from per-node labels. Labels must be dense positive integers `1..=k`.
    pub fn new(graph: impl Into<Arc<Graph>>, districts: Vec<u32>) -> Result<Self> {
        let graph: Arc<Graph> = graph.into();
        let num_districts = districts.iter().copied().max().unwrap_or(0);
        let plan = Self::with_num_districts(graph, num_districts, districts)?;

        let sizes = plan.district_sizes();
        if let Some(label) = (1..=num_districts).find(|&label| sizes[label as usize] == 0) {
            return Err(SamplerError::config(format!(
                "district labels must be dense in [1, {num_districts}], but district {label} is empty"
            )))
        }

        Ok(plan)
    }

    /// Create a plan with an explicit district count. Districts may be empty,
    /// as they can become during a chain.
    pub fn with_num_districts(graph: impl Into<Arc<Graph>>, num_districts: u32, districts: Vec<u32>) -> Result<Self> {
        let graph: Arc<Graph> = graph.into();
        if districts.len() != graph.node_count() {
            return Err(SamplerError::config(format!(
                "districts.len() ({}) must equal number of nodes ({})", districts.len(), graph.node_count()
            )))
        }
        if num_districts == 0 { return Err(SamplerError::config("plan must have at least one district")) }
        if let Some(node) = districts.iter().position(|&d| d == 0 || d > num_districts) {
            return Err(SamplerError::config(format!(
                "node {} has district label {} outside [1, {num_districts}]", graph.id(node), districts[node]
            )))
        }

        Ok(Self { graph, num_districts, districts })
    }

    /// Rebuild a plan from an id -> district mapping. Every node must be assigned.
    pub fn from_assignments(
        graph: impl Into<Arc<Graph>>,
        num_districts: u32,
        assignments: impl IntoIterator<Item = (u32, u32)>,
    ) -> Result<Self> {
        let graph: Arc<Graph> = graph.into();
        let mut districts = vec![0; graph.node_count()];
        for (id, district) in assignments {
            let node = graph.index_of(id)
                .ok_or_else(|| SamplerError::config(format!("unknown node id {id}")))?;
            districts[node] = district;
        }
        if let Some(node) = districts.iter().position(|&d| d == 0) {
            return Err(SamplerError::config(format!("node {} has no district assignment", graph.id(node))))
        }

        Self::with_num_districts(graph, num_districts, districts)
    }

    /// Get a reference to the underlying graph.
    #[inline] pub fn graph(&self) -> &Graph { &self.graph }

    /// Get a shared handle to the underlying graph.
    #[inline] pub fn graph_handle(&self) -> Arc<Graph> { Arc::clone(&self.graph) }

    /// Get the number of districts (labels run from 1 to this value).
    #[inline] pub fn num_districts(&self) -> u32 { self.num_districts }

    /// Get the district label of a given node.
    #[inline] pub fn district(&self, node: usize) -> u32 { self.districts[node] }

    /// Get the district labels of all nodes, by index.
    #[inline] pub fn districts(&self) -> &[u32] { &self.districts }

    /// Collect the nodes assigned to a given district.
    pub fn district_nodes(&self, district: u32) -> Vec<usize> {
        self.districts.iter().enumerate()
            .filter_map(|(node, &d)| (d == district).then_some(node))
            .collect()
    }

    /// Number of nodes in each district (index 0 is unused and always 0).
    pub fn district_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.num_districts as usize + 1];
        self.districts.iter().for_each(|&d| sizes[d as usize] += 1);
        sizes
    }

    /// Total population of a given district.
    pub fn district_population(&self, district: u32) -> u64 {
        self.districts.iter().enumerate()
            .filter(|&(_, &d)| d == district)
            .map(|(node, _)| self.graph.population(node) as u64)
            .sum()
    }

    /// Total population of each district (index 0 is unused and always 0).
    pub fn district_populations(&self) -> Vec<u64> {
        let mut totals = vec![0; self.num_districts as usize + 1];
        for (node, &d) in self.districts.iter().enumerate() {
            totals[d as usize] += self.graph.population(node) as u64;
        }
        totals
    }

    /// Total population summed over all districts.
    pub fn total_population(&self) -> u64 {
        self.district_populations().iter().sum()
    }

    /// Get the id -> district mapping, ordered by id.
    pub fn assignments(&self) -> BTreeMap<u32, u32> {
        self.districts.iter().enumerate()
            .map(|(node, &d)| (self.graph.id(node), d))
            .collect()
    }

    /// Return a copy of this plan with `node` relabeled to `district`.
    pub fn with_move(&self, node: usize, district: u32) -> Plan {
        assert!(node < self.districts.len(), "node {} out of range", node);
        assert!(district >= 1 && district <= self.num_districts, "district {} out of range [1, {}]", district, self.num_districts);

        let mut next = self.clone();
        next.districts[node] = district;
        next
    }
}

impl PartialEq for Plan {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.graph, &other.graph) { return self.districts == other.districts }
        self.districts.len() == other.districts.len() && self.assignments() == other.assignments()
    }
}

impl Eq for Plan {}
