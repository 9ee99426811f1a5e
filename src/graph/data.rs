use crate::model::{NodePayload, Position};
use serde::{Deserialize, Serialize};

/// A renderable graph: positioned nodes, styled edges, and the warnings
/// accumulated while producing them. This is what gets cached and output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasGraph {
    pub nodes: Vec<CanvasNode>,
    pub edges: Vec<CanvasEdge>,
    pub warnings: Vec<String>,
    pub metadata: GraphMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasNode {
    #[serde(flatten)]
    pub payload: NodePayload,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub has_default_import: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphMetadata {
    pub owner: String,
    pub repo: String,
    pub sha: String,
    pub node_count: usize,
    pub edge_count: usize,
}

impl CanvasGraph {
    /// Nodes that failed to parse, for the summary report.
    pub fn parse_failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.nodes.iter().filter_map(|node| match &node.payload {
            NodePayload::File(file) => file
                .parse_error
                .as_deref()
                .map(|error| (file.path.as_str(), error)),
            _ => None,
        })
    }
}
