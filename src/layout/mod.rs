mod layered;
mod tree;

pub use layered::assign_positions;
pub use tree::file_tree_graph;

/// Primary axis of the layered layout: ranks grow downward or rightward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    TopToBottom,
    LeftToRight,
}

#[derive(Debug, Clone, Copy)]
pub struct LayoutOptions {
    pub direction: Direction,
    /// Gap between adjacent nodes within a rank.
    pub node_sep: f64,
    /// Gap between consecutive ranks.
    pub rank_sep: f64,
    pub margin_x: f64,
    pub margin_y: f64,
}

/// Fixed footprint assumed for every dependency-graph node. Spacing math
/// uses this regardless of rendered size.
pub const NODE_WIDTH: f64 = 200.0;
pub const NODE_HEIGHT: f64 = 80.0;

/// Footprints for the file-tree view.
pub const DIR_NODE_SIZE: (f64, f64) = (160.0, 50.0);
pub const FILE_NODE_SIZE: (f64, f64) = (180.0, 45.0);

/// Spacing for the dependency graph.
pub fn dependency_options(direction: Direction) -> LayoutOptions {
    LayoutOptions {
        direction,
        node_sep: 100.0,
        rank_sep: 150.0,
        margin_x: 50.0,
        margin_y: 50.0,
    }
}

/// Tighter spacing for the file-tree view, laid out left to right.
pub fn tree_options() -> LayoutOptions {
    LayoutOptions {
        direction: Direction::LeftToRight,
        node_sep: 20.0,
        rank_sep: 60.0,
        margin_x: 40.0,
        margin_y: 40.0,
    }
}
