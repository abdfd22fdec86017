use std::collections::VecDeque;

use crate::{filter::split_by, plan::Plan};

impl Plan {
    /// Find all connected components (as node lists) inside district `district`.
    pub fn find_components(&self, district: u32) -> Vec<Vec<usize>> {
        let graph = self.graph();
        let mut components = Vec::new();

        let mut visited = vec![false; graph.node_count()];
        for u in (0..graph.node_count()).filter(|&u| self.district(u) == district) {
            if !visited[u] {
                visited[u] = true;
                let mut component = Vec::new();
                let mut queue = VecDeque::from([u]);
                while let Some(v) = queue.pop_front() {
                    component.push(v);
                    for w in graph.edges(v) {
                        if self.district(w) == district && !visited[w] {
                            visited[w] = true;
                            queue.push_back(w);
                        }
                    }
                }
                components.push(component);
            }
        }
        components
    }

    /// Check if every district `1..=num_districts` is non-empty and forms a single connected component.
    pub fn is_contiguous(&self) -> bool {
        (1..=self.num_districts()).all(|district| self.find_components(district).len() == 1)
    }
}

/// Split plans into those whose districts are all contiguous and those with an island
/// (or an empty district). Both outputs keep input order.
pub fn reject_islands(plans: Vec<Plan>) -> (Vec<Plan>, Vec<Plan>) {
    split_by(plans, Plan::is_contiguous)
}
