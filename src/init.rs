use crate::{error::Result, graph::Graph, plan::Plan};

/// Populations of the 36 Toylandia blocks, by id (row-major from the top-left corner).
const TOYLANDIA_POPULATIONS: [u32; 36] = [
    24, 26, 23, 27, 23, 25,
    23, 26, 28, 24, 27, 24,
    21, 26, 28, 19, 21, 26,
    23, 24, 28, 25, 29, 30,
    27, 26, 26, 18, 22, 26,
    23, 24, 24, 28, 31, 25,
];

/// Starting districts of the Toylandia blocks, by id.
const TOYLANDIA_DISTRICTS: [u32; 36] = [
    1, 1, 1, 2, 2, 2,
    1, 1, 1, 2, 2, 2,
    4, 4, 4, 3, 3, 3,
    4, 4, 4, 3, 3, 3,
    5, 5, 5, 6, 6, 6,
    5, 5, 5, 6, 6, 6,
];

/// The 6x6 "Toylandia" grid: 36 blocks, 900 people, six 2x3 districts of 150 each.
pub fn toylandia() -> Result<Plan> {
    let graph = Graph::grid(6, 6, TOYLANDIA_POPULATIONS.to_vec())?.with_name("Toylandia");
    Plan::new(graph, TOYLANDIA_DISTRICTS.to_vec())
}

/// A `rows` x `cols` grid with the same population on every node, split into
/// rectangular `block_rows` x `block_cols` districts numbered row-major from 1.
pub fn block_grid(rows: usize, cols: usize, block_rows: usize, block_cols: usize, population: u32) -> Result<Plan> {
    assert!(block_rows > 0 && block_cols > 0, "district blocks must be non-empty");
    let graph = Graph::grid(rows, cols, vec![population; rows * cols])?;
    let blocks_per_row = cols.div_ceil(block_cols);
    let districts = (0..rows * cols)
        .map(|node| {
            let (r, c) = (node / cols, node % cols);
            ((r / block_rows) * blocks_per_row + c / block_cols + 1) as u32
        })
        .collect();
    Plan::new(graph, districts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toylandia_is_balanced() {
        let plan = toylandia().unwrap();

        assert_eq!(plan.graph().name(), Some("Toylandia"));
        assert_eq!(plan.graph().node_count(), 36);
        assert_eq!(plan.num_districts(), 6);
        assert_eq!(plan.total_population(), 900);
        assert_eq!(plan.district_populations(), vec![0, 150, 150, 150, 150, 150, 150]);
        assert_eq!(plan.district_nodes(4).iter().map(|&n| plan.graph().id(n)).collect::<Vec<_>>(), vec![13, 14, 15, 19, 20, 21]);
        assert!(plan.is_contiguous());
    }

    #[test]
    fn block_grid_layout() {
        let plan = block_grid(6, 6, 2, 3, 25).unwrap();

        assert_eq!(plan.num_districts(), 6);
        assert_eq!(plan.district_sizes(), vec![0, 6, 6, 6, 6, 6, 6]);
        assert_eq!(plan.total_population(), 900);
        assert_eq!(plan.district(5), 2);
        assert_eq!(plan.district(12), 3);
        assert!(plan.is_contiguous());
    }
}
