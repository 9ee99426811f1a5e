//! Layered graph drawing: rank assignment, barycenter ordering, and
//! coordinate assignment from fixed node footprints.

use super::{Direction, LayoutOptions};
use crate::model::Position;
use petgraph::graph::DiGraph;
use petgraph::visit::EdgeRef;
use std::cmp::Ordering;
use std::collections::VecDeque;

/// Barycenter sweep count. Two down/up rounds settle small graphs; more
/// iterations stopped improving the test corpus.
const ORDERING_SWEEPS: usize = 4;

/// Assign a top-left corner position to every node.
///
/// `sizes` holds one (width, height) footprint per node, indexed like the
/// graph's node indices. Ranks follow edge direction; cycles are tolerated
/// by reversing back edges during ranking. Deterministic for identical
/// inputs.
pub fn assign_positions<N, E>(
    graph: &DiGraph<N, E>,
    sizes: &[(f64, f64)],
    opts: &LayoutOptions,
) -> Vec<Position> {
    let n = graph.node_count();
    if n == 0 {
        return Vec::new();
    }
    debug_assert_eq!(n, sizes.len());

    let edges: Vec<(usize, usize)> = graph
        .edge_references()
        .map(|e| (e.source().index(), e.target().index()))
        .collect();

    let acyclic = break_cycles(n, &edges);
    let ranks = assign_ranks(n, &acyclic);
    let order = order_ranks(n, &acyclic, &ranks);
    place(&order, sizes, opts)
}

/// Reverse back edges found by a depth-first walk so ranking sees a DAG.
/// Self-loops are dropped; they carry no layering information.
fn break_cycles(n: usize, edges: &[(usize, usize)]) -> Vec<(usize, usize)> {
    const UNVISITED: u8 = 0;
    const ON_STACK: u8 = 1;
    const DONE: u8 = 2;

    let mut adjacency = vec![Vec::new(); n];
    for &(u, v) in edges {
        if u != v {
            adjacency[u].push(v);
        }
    }

    let mut state = vec![UNVISITED; n];
    let mut acyclic = Vec::with_capacity(edges.len());

    fn visit(
        u: usize,
        adjacency: &[Vec<usize>],
        state: &mut [u8],
        acyclic: &mut Vec<(usize, usize)>,
    ) {
        state[u] = ON_STACK;
        for &v in &adjacency[u] {
            match state[v] {
                ON_STACK => acyclic.push((v, u)),
                UNVISITED => {
                    acyclic.push((u, v));
                    visit(v, adjacency, state, acyclic);
                }
                _ => acyclic.push((u, v)),
            }
        }
        state[u] = DONE;
    }

    for u in 0..n {
        if state[u] == UNVISITED {
            visit(u, &adjacency, &mut state, &mut acyclic);
        }
    }

    acyclic
}

/// Longest-path ranking over the acyclic edge set (Kahn's algorithm):
/// every edge ends at a strictly greater rank.
fn assign_ranks(n: usize, edges: &[(usize, usize)]) -> Vec<usize> {
    let mut adjacency = vec![Vec::new(); n];
    let mut in_degree = vec![0usize; n];
    for &(u, v) in edges {
        adjacency[u].push(v);
        in_degree[v] += 1;
    }

    let mut ranks = vec![0usize; n];
    let mut queue: VecDeque<usize> = (0..n).filter(|&u| in_degree[u] == 0).collect();

    while let Some(u) = queue.pop_front() {
        for &v in &adjacency[u] {
            if ranks[v] < ranks[u] + 1 {
                ranks[v] = ranks[u] + 1;
            }
            in_degree[v] -= 1;
            if in_degree[v] == 0 {
                queue.push_back(v);
            }
        }
    }

    ranks
}

/// Order nodes within each rank to reduce edge crossings: alternating
/// downward and upward barycenter sweeps, stable-sorted so ties keep their
/// previous order.
fn order_ranks(n: usize, edges: &[(usize, usize)], ranks: &[usize]) -> Vec<Vec<usize>> {
    let rank_count = ranks.iter().copied().max().unwrap_or(0) + 1;
    let mut order: Vec<Vec<usize>> = vec![Vec::new(); rank_count];
    for u in 0..n {
        order[ranks[u]].push(u);
    }

    let mut predecessors = vec![Vec::new(); n];
    let mut successors = vec![Vec::new(); n];
    for &(u, v) in edges {
        successors[u].push(v);
        predecessors[v].push(u);
    }

    let mut position = vec![0usize; n];
    let update_positions = |order: &[Vec<usize>], position: &mut [usize]| {
        for rank in order {
            for (i, &u) in rank.iter().enumerate() {
                position[u] = i;
            }
        }
    };
    update_positions(&order, &mut position);

    for sweep in 0..ORDERING_SWEEPS {
        let downward = sweep % 2 == 0;
        let neighbor_lists = if downward { &predecessors } else { &successors };

        let range: Vec<usize> = if downward {
            (1..rank_count).collect()
        } else {
            (0..rank_count.saturating_sub(1)).rev().collect()
        };

        for r in range {
            let mut keyed: Vec<(f64, usize)> = order[r]
                .iter()
                .map(|&u| {
                    let neighbors = &neighbor_lists[u];
                    let key = if neighbors.is_empty() {
                        position[u] as f64
                    } else {
                        neighbors.iter().map(|&v| position[v] as f64).sum::<f64>()
                            / neighbors.len() as f64
                    };
                    (key, u)
                })
                .collect();
            keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
            order[r] = keyed.into_iter().map(|(_, u)| u).collect();
            for (i, &u) in order[r].iter().enumerate() {
                position[u] = i;
            }
        }
    }

    order
}

/// Convert the rank ordering into coordinates. Ranks advance along the
/// primary axis; nodes spread along the secondary axis, each rank centered
/// against the widest one. Centers are converted back to top-left corners
/// against each node's footprint.
fn place(order: &[Vec<usize>], sizes: &[(f64, f64)], opts: &LayoutOptions) -> Vec<Position> {
    let horizontal = opts.direction == Direction::LeftToRight;

    // Breadth is the extent along the secondary axis, thickness along the
    // primary one.
    let breadth = |u: usize| if horizontal { sizes[u].1 } else { sizes[u].0 };
    let thickness = |u: usize| if horizontal { sizes[u].0 } else { sizes[u].1 };

    let rank_breadth = |rank: &[usize]| -> f64 {
        if rank.is_empty() {
            return 0.0;
        }
        let total: f64 = rank.iter().map(|&u| breadth(u)).sum();
        total + opts.node_sep * (rank.len() - 1) as f64
    };

    let max_breadth = order.iter().map(|r| rank_breadth(r)).fold(0.0, f64::max);

    let (margin_primary, margin_secondary) = if horizontal {
        (opts.margin_x, opts.margin_y)
    } else {
        (opts.margin_y, opts.margin_x)
    };

    let mut centers = vec![(0.0f64, 0.0f64); sizes.len()];
    let mut primary_offset = margin_primary;

    for rank in order {
        if rank.is_empty() {
            continue;
        }
        let rank_thickness = rank.iter().map(|&u| thickness(u)).fold(0.0, f64::max);
        let mut secondary_offset = margin_secondary + (max_breadth - rank_breadth(rank)) / 2.0;

        for &u in rank {
            let center_secondary = secondary_offset + breadth(u) / 2.0;
            let center_primary = primary_offset + rank_thickness / 2.0;
            centers[u] = if horizontal {
                (center_primary, center_secondary)
            } else {
                (center_secondary, center_primary)
            };
            secondary_offset += breadth(u) + opts.node_sep;
        }

        primary_offset += rank_thickness + opts.rank_sep;
    }

    centers
        .iter()
        .zip(sizes)
        .map(|(&(cx, cy), &(w, h))| Position {
            x: cx - w / 2.0,
            y: cy - h / 2.0,
        })
        .collect()
}
