use std::collections::VecDeque;

use ahash::AHashMap;

use crate::error::{Result, SamplerError};

/// An unweighted, undirected adjacency graph in compressed sparse row format,
/// carrying a population for each node.
///
/// Topology and populations are fixed once built; only plans (district labels)
/// change over the course of a chain.
#[derive(Debug, Clone)]
pub struct Graph {
    size: usize,
    offsets: Vec<u32>,
    edges: Vec<u32>,
    populations: Vec<u32>,
    ids: Vec<u32>,
    index: AHashMap<u32, usize>,
    positions: Option<Vec<(f64, f64)>>,
    name: Option<String>,
}

impl Graph {
    /// Construct a graph from external node ids, adjacency lists (by node index) and populations.
    pub fn new(ids: Vec<u32>, edges: &[Vec<u32>], populations: Vec<u32>) -> Result<Self> {
        let size = ids.len();
        if size == 0 { return Err(SamplerError::config("graph has no nodes")) }
        if edges.len() != size {
            return Err(SamplerError::config(format!("edges.len() ({}) must equal number of nodes ({size})", edges.len())))
        }
        if populations.len() != size {
            return Err(SamplerError::config(format!("populations.len() ({}) must equal number of nodes ({size})", populations.len())))
        }

        let mut index = AHashMap::with_capacity(size);
        for (i, &id) in ids.iter().enumerate() {
            if index.insert(id, i).is_some() {
                return Err(SamplerError::config(format!("duplicate node id {id}")))
            }
        }

        if let Some(i) = populations.iter().position(|&p| p == 0) {
            return Err(SamplerError::config(format!("node {} has non-positive population", ids[i])))
        }

        // Drop repeated neighbors, keeping first-seen order.
        let mut adjacency = Vec::with_capacity(size);
        for (u, neighbors) in edges.iter().enumerate() {
            let mut list: Vec<u32> = Vec::with_capacity(neighbors.len());
            for &v in neighbors {
                if v as usize >= size {
                    return Err(SamplerError::config(format!("node {} has neighbor index {v} out of range", ids[u])))
                }
                if v as usize == u {
                    return Err(SamplerError::config(format!("node {} is adjacent to itself", ids[u])))
                }
                if !list.contains(&v) { list.push(v) }
            }
            adjacency.push(list);
        }

        for (u, neighbors) in adjacency.iter().enumerate() {
            for &v in neighbors {
                if !adjacency[v as usize].contains(&(u as u32)) {
                    return Err(SamplerError::config(format!(
                        "edge {} -> {} has no reverse edge", ids[u], ids[v as usize]
                    )))
                }
            }
        }

        Ok(Self {
            size,
            offsets: std::iter::once(0u32).chain(
                adjacency.iter()
                    .map(|v| v.len() as u32)
                    .scan(0u32, |acc, len| {*acc += len; Some(*acc)})
            ).collect::<Vec<u32>>(),
            edges: adjacency.into_iter().flatten().collect(),
            populations,
            ids,
            index,
            positions: None,
            name: None,
        })
    }

    /// Build a rook-adjacent `rows` x `cols` lattice with row-major ids starting at 1.
    /// Positions are set to `(row, col)`.
    pub fn grid(rows: usize, cols: usize, populations: Vec<u32>) -> Result<Self> {
        let ids = (1..=(rows * cols) as u32).collect::<Vec<_>>();
        let edges = (0..rows * cols).map(|node| {
            let (r, c) = (node / cols, node % cols);
            let mut neighbors = Vec::with_capacity(4);
            if r > 0 { neighbors.push((node - cols) as u32) }
            if r + 1 < rows { neighbors.push((node + cols) as u32) }
            if c > 0 { neighbors.push((node - 1) as u32) }
            if c + 1 < cols { neighbors.push((node + 1) as u32) }
            neighbors
        }).collect::<Vec<_>>();

        let positions = (0..rows * cols)
            .map(|node| ((node / cols) as f64, (node % cols) as f64))
            .collect();

        Self::new(ids, &edges, populations)?.with_positions(positions)
    }

    /// Attach display positions (one per node). Not used by the sampler itself.
    pub fn with_positions(mut self, positions: Vec<(f64, f64)>) -> Result<Self> {
        if positions.len() != self.size {
            return Err(SamplerError::config(format!("positions.len() ({}) must equal number of nodes ({})", positions.len(), self.size)))
        }
        self.positions = Some(positions);
        Ok(self)
    }

    /// Attach a place name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Get the number of nodes in the graph.
    #[inline] pub fn node_count(&self) -> usize { self.size }

    /// Get the number of directed edge entries (twice the number of undirected edges).
    #[inline] pub fn edge_count(&self) -> usize { self.edges.len() }

    /// Get the range of edges for a given node.
    #[inline]
    fn range(&self, node: usize) -> std::ops::Range<usize> {
        self.offsets[node] as usize .. self.offsets[node + 1] as usize
    }

    /// Get the degree (number of neighbors) of a given node.
    #[inline] pub fn degree(&self, node: usize) -> usize { self.range(node).len() }

    /// Get an iterator over the neighbors of a given node.
    #[inline]
    pub fn edges(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.range(node).map(move |v| self.edges[v] as usize)
    }

    /// Get the population of a given node.
    #[inline] pub fn population(&self, node: usize) -> u32 { self.populations[node] }

    /// Get the populations of all nodes, by index.
    #[inline] pub fn populations(&self) -> &[u32] { &self.populations }

    /// Get the total population of the graph.
    pub fn total_population(&self) -> u64 {
        self.populations.iter().map(|&p| p as u64).sum()
    }

    /// Get the external id of a given node.
    #[inline] pub fn id(&self, node: usize) -> u32 { self.ids[node] }

    /// Get the external ids of all nodes, by index.
    #[inline] pub fn ids(&self) -> &[u32] { &self.ids }

    /// Look up the index of a node by external id.
    #[inline] pub fn index_of(&self, id: u32) -> Option<usize> { self.index.get(&id).copied() }

    /// Get the display position of a given node, if positions were attached.
    #[inline]
    pub fn position(&self, node: usize) -> Option<(f64, f64)> {
        self.positions.as_ref().map(|p| p[node])
    }

    /// Get the place name, if any.
    #[inline] pub fn name(&self) -> Option<&str> { self.name.as_deref() }

    /// Check whether the whole graph forms a single connected component.
    pub fn is_connected(&self) -> bool {
        let mut visited = vec![false; self.size];
        let mut queue = VecDeque::from([0]);
        visited[0] = true;
        let mut seen = 1;
        while let Some(u) = queue.pop_front() {
            for v in self.edges(u) {
                if !visited[v] {
                    visited[v] = true;
                    seen += 1;
                    queue.push_back(v);
                }
            }
        }
        seen == self.size
    }
}
