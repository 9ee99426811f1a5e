use crate::graph::{CanvasEdge, CanvasGraph, CanvasNode, GraphMetadata};
use crate::model::{FileNode, NodePayload, ParsedFile, Position};
use crate::resolver::{Resolution, resolve};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};

/// Rendering hint carried on each dependency edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeStyle {
    pub has_default_import: bool,
}

/// The file dependency graph: one node per parsed file (including failed
/// parses), one edge per resolved import, deduplicated by ordered pair.
pub struct DependencyGraph {
    graph: DiGraph<FileNode, EdgeStyle>,
    node_indices: HashMap<String, NodeIndex>,
    warnings: Vec<String>,
}

impl DependencyGraph {
    /// Build the graph from parse results in fetch order. Failed parses
    /// still get a node and never abort the build; unresolved local imports
    /// are recorded as warnings; external packages are dropped silently.
    pub fn build(files: &[ParsedFile], alias_prefix: &str) -> Self {
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();
        let mut warnings = Vec::new();

        for file in files {
            if node_indices.contains_key(&file.path) {
                continue;
            }
            let idx = graph.add_node(FileNode::from_parsed(file));
            node_indices.insert(file.path.clone(), idx);
        }

        let known_paths: HashSet<String> = node_indices.keys().cloned().collect();
        let mut seen_edges: HashSet<(NodeIndex, NodeIndex)> = HashSet::new();

        for file in files {
            let Some(source) = file.source() else {
                continue;
            };
            let Some(&from_idx) = node_indices.get(&file.path) else {
                continue;
            };

            for import in &source.imports {
                match resolve(&file.path, &import.source, &known_paths, alias_prefix) {
                    Resolution::Resolved(target) => {
                        let Some(&to_idx) = node_indices.get(&target) else {
                            continue;
                        };
                        if seen_edges.insert((from_idx, to_idx)) {
                            graph.add_edge(
                                from_idx,
                                to_idx,
                                EdgeStyle {
                                    has_default_import: import.has_default_import(),
                                },
                            );
                        }
                    }
                    Resolution::External => {}
                    Resolution::Unresolved => {
                        warnings.push(format!(
                            "{}: unresolved import \"{}\"",
                            file.path, import.source
                        ));
                    }
                }
            }
        }

        Self {
            graph,
            node_indices,
            warnings,
        }
    }

    pub fn graph(&self) -> &DiGraph<FileNode, EdgeStyle> {
        &self.graph
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn contains(&self, path: &str) -> bool {
        self.node_indices.contains_key(path)
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        match (self.node_indices.get(from), self.node_indices.get(to)) {
            (Some(&a), Some(&b)) => self.graph.find_edge(a, b).is_some(),
            _ => false,
        }
    }

    /// Assemble the renderable graph, attaching positions by node index.
    pub fn into_canvas(self, positions: Vec<Position>, metadata: GraphMetadata) -> CanvasGraph {
        let mut warnings = self.warnings;
        let graph = self.graph;

        let nodes: Vec<CanvasNode> = graph
            .node_indices()
            .map(|idx| CanvasNode {
                payload: NodePayload::File(graph[idx].clone()),
                position: positions.get(idx.index()).copied().unwrap_or_default(),
            })
            .collect();

        let edges: Vec<CanvasEdge> = graph
            .edge_references()
            .map(|edge| {
                let source = graph[edge.source()].path.clone();
                let target = graph[edge.target()].path.clone();
                CanvasEdge {
                    id: format!("{}->{}", source, target),
                    source,
                    target,
                    has_default_import: edge.weight().has_default_import,
                }
            })
            .collect();

        warnings.shrink_to_fit();
        CanvasGraph {
            nodes,
            edges,
            warnings,
            metadata,
        }
    }
}
