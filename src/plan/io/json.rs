use std::{collections::BTreeMap, fs::File, io::{BufReader, BufWriter, Write}, path::Path, sync::Arc};

use ahash::AHashMap;
use anyhow::{Context, Result, bail, ensure};
use serde::{Deserialize, Serialize};

use crate::{graph::Graph, plan::Plan};

/// On-disk description of a graph together with its initial plan.
#[derive(Debug, Serialize, Deserialize)]
struct GraphRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    nodes: Vec<NodeRecord>,
    edges: Vec<[u32; 2]>,
}

#[derive(Debug, Serialize, Deserialize)]
struct NodeRecord {
    id: u32,
    population: u32,
    district: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    position: Option<[f64; 2]>,
}

/// On-disk log of a plan sequence.
#[derive(Debug, Serialize, Deserialize)]
struct PlanLog {
    num_districts: u32,
    plans: Vec<PlanRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PlanRecord {
    districts: BTreeMap<u32, u32>,
    populations: BTreeMap<u32, u32>,
}

impl Plan {
    /// Load a graph and its initial plan from a JSON graph file.
    pub fn read_from_graph_json(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to read graph file: {}", path.display()))?;
        let record: GraphRecord = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse graph file: {}", path.display()))?;
        Self::from_graph_record(record)
    }

    /// Load a graph and its initial plan from JSON text.
    pub fn from_graph_json(json: &str) -> Result<Self> {
        Self::from_graph_record(serde_json::from_str(json).context("Failed to parse graph JSON")?)
    }

    /// Write this plan's graph, with this plan as the initial labeling, to a JSON graph file.
    pub fn write_to_graph_json(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create graph file: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &self.to_graph_record())?;
        writer.flush()?;
        Ok(())
    }

    /// Serialize this plan's graph, with this plan as the initial labeling, to JSON text.
    pub fn to_graph_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_graph_record())?)
    }

    fn from_graph_record(record: GraphRecord) -> Result<Self> {
        let index = record.nodes.iter().enumerate()
            .map(|(i, node)| (node.id, i as u32))
            .collect::<AHashMap<_, _>>();

        let mut adjacency = vec![Vec::new(); record.nodes.len()];
        for &[a, b] in &record.edges {
            let (Some(&u), Some(&v)) = (index.get(&a), index.get(&b)) else {
                bail!("edge [{a}, {b}] references an unknown node id");
            };
            adjacency[u as usize].push(v);
            adjacency[v as usize].push(u);
        }

        let ids = record.nodes.iter().map(|n| n.id).collect();
        let populations = record.nodes.iter().map(|n| n.population).collect();
        let mut graph = Graph::new(ids, &adjacency, populations)?;

        if record.nodes.iter().all(|n| n.position.is_some()) && !record.nodes.is_empty() {
            graph = graph.with_positions(
                record.nodes.iter().filter_map(|n| n.position.map(|[x, y]| (x, y))).collect()
            )?;
        }
        if let Some(name) = record.name { graph = graph.with_name(name) }

        Ok(Plan::new(graph, record.nodes.iter().map(|n| n.district).collect())?)
    }

    fn to_graph_record(&self) -> GraphRecord {
        let graph = self.graph();
        GraphRecord {
            name: graph.name().map(str::to_string),
            nodes: (0..graph.node_count()).map(|node| NodeRecord {
                id: graph.id(node),
                population: graph.population(node),
                district: self.district(node),
                position: graph.position(node).map(|(x, y)| [x, y]),
            }).collect(),
            edges: (0..graph.node_count())
                .flat_map(move |u| graph.edges(u).filter(move |&v| u < v).map(move |v| [graph.id(u), graph.id(v)]))
                .collect(),
        }
    }
}

/// Write a plan sequence to a JSON plan log at `path`.
pub fn write_plans_to_json_file(plans: &[Plan], path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create plan log: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, &to_plan_log(plans)?)?;
    writer.flush()?;
    Ok(())
}

/// Read a plan sequence from a JSON plan log at `path`, attaching each plan to `graph`.
pub fn read_plans_from_json_file(path: &Path, graph: Arc<Graph>) -> Result<Vec<Plan>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to read plan log: {}", path.display()))?;
    let log: PlanLog = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse plan log: {}", path.display()))?;
    from_plan_log(log, graph)
}

/// Serialize a plan sequence to JSON plan log text.
pub fn plans_to_json(plans: &[Plan]) -> Result<String> {
    Ok(serde_json::to_string(&to_plan_log(plans)?)?)
}

/// Parse a plan sequence from JSON plan log text, attaching each plan to `graph`.
pub fn plans_from_json(json: &str, graph: Arc<Graph>) -> Result<Vec<Plan>> {
    from_plan_log(serde_json::from_str(json).context("Failed to parse plan log JSON")?, graph)
}

fn to_plan_log(plans: &[Plan]) -> Result<PlanLog> {
    let num_districts = plans.first().map_or(0, Plan::num_districts);
    ensure!(
        plans.iter().all(|p| p.num_districts() == num_districts),
        "all plans in a log must share the same district count"
    );

    Ok(PlanLog {
        num_districts,
        plans: plans.iter().map(|plan| PlanRecord {
            districts: plan.assignments(),
            populations: (0..plan.graph().node_count())
                .map(|node| (plan.graph().id(node), plan.graph().population(node)))
                .collect(),
        }).collect(),
    })
}

fn from_plan_log(log: PlanLog, graph: Arc<Graph>) -> Result<Vec<Plan>> {
    log.plans.into_iter().enumerate().map(|(i, record)| {
        for (&id, &population) in &record.populations {
            let node = graph.index_of(id)
                .with_context(|| format!("plan {i} references unknown node id {id}"))?;
            ensure!(
                graph.population(node) == population,
                "plan {i} records population {population} for node {id}, but the graph has {}",
                graph.population(node)
            );
        }
        Plan::from_assignments(Arc::clone(&graph), log.num_districts, record.districts)
            .with_context(|| format!("plan {i} is not a valid plan for this graph"))
    }).collect()
}
