//! File-tree view: the directory hierarchy as a strict tree graph, laid
//! out with the same layered algorithm as the dependency graph.

use super::{DIR_NODE_SIZE, FILE_NODE_SIZE, assign_positions, tree_options};
use crate::github::RepoFile;
use crate::graph::{CanvasEdge, CanvasGraph, CanvasNode, GraphMetadata};
use crate::model::{DirectoryNode, FileNode, Language, NodePayload};
use petgraph::graph::DiGraph;
use petgraph::visit::EdgeRef;

struct TreeNode {
    name: String,
    path: String,
    is_dir: bool,
    children: Vec<TreeNode>,
}

/// Build the directory hierarchy for a repository's file list and lay it
/// out left to right.
pub fn file_tree_graph(files: &[RepoFile], metadata: GraphMetadata) -> CanvasGraph {
    let root = build_hierarchy(files);

    let mut graph: DiGraph<NodePayload, ()> = DiGraph::new();
    let mut stack: Vec<(&TreeNode, Option<petgraph::graph::NodeIndex>, usize)> =
        root.children.iter().rev().map(|c| (c, None, 0)).collect();

    while let Some((node, parent, depth)) = stack.pop() {
        let payload = if node.is_dir {
            NodePayload::Directory(DirectoryNode {
                path: node.path.clone(),
                label: node.name.clone(),
                depth,
                file_count: count_files(node),
            })
        } else {
            NodePayload::File(FileNode {
                path: node.path.clone(),
                label: node.name.clone(),
                language: Language::from_path(&node.path),
                import_count: 0,
                export_count: 0,
                parse_error: None,
                functions: Vec::new(),
                classes: Vec::new(),
            })
        };

        let idx = graph.add_node(payload);
        if let Some(parent_idx) = parent {
            graph.add_edge(parent_idx, idx, ());
        }
        for child in node.children.iter().rev() {
            stack.push((child, Some(idx), depth + 1));
        }
    }

    let sizes: Vec<(f64, f64)> = graph
        .node_weights()
        .map(|payload| match payload {
            NodePayload::Directory(_) => DIR_NODE_SIZE,
            _ => FILE_NODE_SIZE,
        })
        .collect();

    let positions = assign_positions(&graph, &sizes, &tree_options());

    let nodes: Vec<CanvasNode> = graph
        .node_indices()
        .map(|idx| CanvasNode {
            payload: graph[idx].clone(),
            position: positions[idx.index()],
        })
        .collect();

    let edges: Vec<CanvasEdge> = graph
        .edge_references()
        .map(|edge| {
            let source = graph[edge.source()].id();
            let target = graph[edge.target()].id();
            CanvasEdge {
                id: format!("{}-{}", source, target),
                source,
                target,
                has_default_import: false,
            }
        })
        .collect();

    let metadata = GraphMetadata {
        node_count: nodes.len(),
        edge_count: edges.len(),
        ..metadata
    };

    CanvasGraph {
        nodes,
        edges,
        warnings: Vec::new(),
        metadata,
    }
}

fn build_hierarchy(files: &[RepoFile]) -> TreeNode {
    let mut root = TreeNode {
        name: "root".to_string(),
        path: String::new(),
        is_dir: true,
        children: Vec::new(),
    };

    for file in files {
        let parts: Vec<&str> = file.path.split('/').filter(|p| !p.is_empty()).collect();
        let mut current = &mut root;

        for (i, part) in parts.iter().enumerate() {
            let is_last = i == parts.len() - 1;
            let current_path = parts[..=i].join("/");

            let existing = current.children.iter().position(|c| c.name == *part);
            let child_index = match existing {
                Some(index) => index,
                None => {
                    current.children.push(TreeNode {
                        name: part.to_string(),
                        path: current_path,
                        is_dir: !is_last,
                        children: Vec::new(),
                    });
                    current.children.len() - 1
                }
            };
            current = &mut current.children[child_index];
        }
    }

    sort_children(&mut root);
    root
}

/// Directories first, then alphabetical within each level.
fn sort_children(node: &mut TreeNode) {
    node.children.sort_by(|a, b| {
        b.is_dir.cmp(&a.is_dir).then_with(|| a.name.cmp(&b.name))
    });
    for child in &mut node.children {
        sort_children(child);
    }
}

fn count_files(node: &TreeNode) -> usize {
    if !node.is_dir {
        return 1;
    }
    node.children.iter().map(count_files).sum()
}
