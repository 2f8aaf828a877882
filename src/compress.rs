//! Exact odd cycle transversals computed in process by iterative compression.
//!
//! Elements (vertices or edges) are added one at a time while a minimum transversal `C` of the
//! graph seen so far is kept. If the new element creates an odd cycle, `C` plus the new element
//! is a transversal that is one too large, and the compression step searches all ways the
//! optimum can interact with it:
//!
//! - Vertices: every `c` in `C` is either deleted or put on side `A` or `B`. The rest of the graph
//!   is bipartite with a fixed two-coloring; each of its vertices adjacent to `A` must end up on
//!   side `B` and vice versa, which asks its component to keep or flip its coloring. A minimum
//!   vertex separator between the "flip" and "keep" vertices completes the transversal.
//! - Edges: every edge of `C` is cut off its endpoints by two pendant terminals whose classes fix
//!   whether the edge stays properly colored. A minimum edge cut between the two classes gives
//!   the edges to remove, a cut pendant edge standing for the edge of `C` itself.
//!
//! The best candidate over all assignments is an optimal transversal of the current graph.

use crate::flow::{FlowNet, INFINITE};
use crate::graph::OccGraph;
use crate::model::Variant;
use crate::solution::Solution;
use fxhash::FxHashSet;
use tracing::debug;

/// Search options of the in-process solver.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub struct CompressOptions {
    /// Discard an assignment of the vertex transversal to sides as soon as two adjacent vertices
    /// share a side, instead of checking complete assignments.
    pub prune_colorings: bool,
}

/// Result of an in-process solve.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Compressed {
    pub solution: Solution,
    /// Augmenting paths found over all flow computations.
    pub augmentations: u64,
}

/// Computes a minimum odd cycle transversal of `graph` for `variant`.
pub fn solve(graph: &OccGraph, variant: Variant, options: CompressOptions) -> Compressed {
    let (selected, augmentations) = match variant {
        Variant::Vertex => vertex_transversal(graph, options),
        Variant::Edge => edge_transversal(graph),
    };
    debug!(size = selected.len(), augmentations, ?variant, "iterative compression done");
    Compressed {
        solution: Solution::from_selected(selected),
        augmentations,
    }
}

fn membership(n: usize, set: &[usize]) -> Vec<bool> {
    let mut member = vec![false; n];
    for x in set {
        member[*x] = true;
    }
    member
}

fn vertex_transversal(graph: &OccGraph, options: CompressOptions) -> (Vec<usize>, u64) {
    let n = graph.num_vertices();
    let mut occ: Vec<usize> = Vec::new();
    let mut augmentations = 0;
    for v in 0..n {
        let in_occ = membership(n, &occ);
        let still_bipartite = graph
            .two_coloring_filtered(|_, (a, b)| a <= v && b <= v && !in_occ[a] && !in_occ[b])
            .is_some();
        if still_bipartite {
            continue
        }
        occ.push(v);
        let best = {
            let mut step = VertexCompression::new(graph, v + 1, &occ, options);
            step.branch(0, 0);
            augmentations += step.augmentations;
            step.best
        };
        occ = best;
    }
    (occ, augmentations)
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum Side {
    Deleted,
    A,
    B,
}

/// One compression step of the vertex variant.
struct VertexCompression<'a> {
    graph: &'a OccGraph,
    /// Vertices `0..active` make up the current graph.
    active: usize,
    occ: &'a [usize],
    in_occ: Vec<bool>,
    /// Two-coloring of the current graph without `occ`.
    color: Vec<bool>,
    /// For each position in `occ`, the positions of its neighbors in `occ`.
    occ_adj: Vec<Vec<usize>>,
    /// For each position in `occ`, its neighbors outside of `occ`.
    attached: Vec<Vec<usize>>,
    /// Edges of the current graph without `occ`.
    inner: Vec<(usize, usize)>,
    options: CompressOptions,
    sides: Vec<Side>,
    best: Vec<usize>,
    augmentations: u64,
}

impl<'a> VertexCompression<'a> {

    fn new(graph: &'a OccGraph, active: usize, occ: &'a [usize], options: CompressOptions) -> Self {
        let n = graph.num_vertices();
        let in_occ = membership(n, occ);
        let mut position = vec![None; n];
        for (pos, v) in occ.iter().enumerate() {
            position[*v] = Some(pos);
        }
        let mut occ_adj = vec![Vec::new(); occ.len()];
        let mut attached = vec![Vec::new(); occ.len()];
        let mut inner = Vec::new();
        for &(u, v) in graph.edges() {
            if u >= active || v >= active {
                continue
            }
            match (position[u], position[v]) {
                (Some(pu), Some(pv)) => {
                    occ_adj[pu].push(pv);
                    occ_adj[pv].push(pu);
                },
                (Some(pu), None) => attached[pu].push(v),
                (None, Some(pv)) => attached[pv].push(u),
                (None, None) => inner.push((u, v)),
            }
        }
        let color = graph
            .two_coloring_filtered(|_, (u, v)| u < active && v < active && !in_occ[u] && !in_occ[v])
            .unwrap_or_else(|| vec![false; n]);
        VertexCompression {
            graph,
            active,
            occ,
            in_occ,
            color,
            occ_adj,
            attached,
            inner,
            options,
            sides: vec![Side::Deleted; occ.len()],
            best: occ.to_vec(),
            augmentations: 0,
        }
    }

    /// Checks if putting `occ[pos]` on `side` clashes with an earlier position.
    fn conflicts(&self, pos: usize, side: Side) -> bool {
        self.occ_adj[pos].iter().any(|&q| q == pos || (q < pos && self.sides[q] == side))
    }

    /// Assigns a side to every position from `pos` on; `deleted` positions are deleted so far.
    fn branch(&mut self, pos: usize, deleted: usize) {
        if deleted >= self.best.len() {
            return
        }
        if pos == self.occ.len() {
            self.evaluate(deleted);
            return
        }
        // Swapping A and B yields the same cut, so the first kept vertex goes to A.
        let first_kept = self.sides[..pos].iter().all(|side| *side == Side::Deleted);
        for side in [Side::Deleted, Side::A, Side::B] {
            if side == Side::B && first_kept {
                continue
            }
            if side != Side::Deleted && self.options.prune_colorings && self.conflicts(pos, side) {
                continue
            }
            self.sides[pos] = side;
            self.branch(pos + 1, deleted + (side == Side::Deleted) as usize);
        }
    }

    /// Completes the current assignment with a minimum vertex separator.
    fn evaluate(&mut self, deleted: usize) {
        if !self.options.prune_colorings {
            let clash = (0..self.occ.len())
                .any(|pos| self.sides[pos] != Side::Deleted && self.conflicts(pos, self.sides[pos]));
            if clash {
                return
            }
        }
        // Vertex `w` is split into `2w -> 2w+1`.
        let n = self.graph.num_vertices();
        let (s, t) = (2 * n, 2 * n + 1);
        let mut net = FlowNet::new(2 * n + 2);
        for w in 0..self.active {
            if !self.in_occ[w] {
                net.add_arc(2 * w, 2 * w + 1, 1, Some(w));
            }
        }
        for &(u, v) in &self.inner {
            net.add_arc(2 * u + 1, 2 * v, INFINITE, None);
            net.add_arc(2 * v + 1, 2 * u, INFINITE, None);
        }
        for (pos, side) in self.sides.iter().enumerate() {
            let wanted = match side {
                Side::Deleted => continue,
                // Neighbors of A belong to B, which is color `true`.
                Side::A => true,
                Side::B => false,
            };
            for &w in &self.attached[pos] {
                if self.color[w] != wanted {
                    net.add_arc(s, 2 * w, INFINITE, None);
                } else {
                    net.add_arc(2 * w + 1, t, INFINITE, None);
                }
            }
        }
        let limit = (self.best.len() - deleted) as u32;
        let flow = net.max_flow(s, t, limit);
        self.augmentations += net.augmentations();
        if flow < limit {
            let mut next: Vec<usize> = self.occ.iter()
                .zip(&self.sides)
                .filter(|(_, side)| **side == Side::Deleted)
                .map(|(v, _)| *v)
                .collect();
            next.extend(net.cut_labels(s));
            self.best = next;
        }
    }
}

fn edge_transversal(graph: &OccGraph) -> (Vec<usize>, u64) {
    let m = graph.num_edges();
    let mut occ: Vec<usize> = Vec::new();
    let mut augmentations = 0;
    for e in 0..m {
        let in_occ = membership(m, &occ);
        if graph.two_coloring_filtered(|i, _| i <= e && !in_occ[i]).is_some() {
            continue
        }
        occ.push(e);
        occ = compress_edges(graph, e + 1, &occ, &mut augmentations);
    }
    (occ, augmentations)
}

/// One compression step of the edge variant over the edges `0..active`.
fn compress_edges(graph: &OccGraph, active: usize, occ: &[usize], augmentations: &mut u64)
    -> Vec<usize> {
    let n = graph.num_vertices();
    let edges = graph.edges();
    let in_occ = membership(graph.num_edges(), occ);
    let color = match graph.two_coloring_filtered(|i, _| i < active && !in_occ[i]) {
        Some(color) => color,
        None => return occ.to_vec(),
    };
    let k = occ.len();
    let mut best = occ.to_vec();
    // Pendant terminals of `occ[p]` are `n + 2p` and `n + 2p + 1`.
    let (s, t) = (n + 2 * k, n + 2 * k + 1);
    // Flipping every class yields the same cut, so the class of the first pendant is fixed.
    for code in 0..1u64 << (k - 1) {
        let mut net = FlowNet::new(n + 2 * k + 2);
        for i in (0..active).filter(|i| !in_occ[*i]) {
            let (u, v) = edges[i];
            net.add_edge(u, v, 1, Some(i));
        }
        for (p, &e) in occ.iter().enumerate() {
            let (u, v) = edges[e];
            let (pu, pv) = (n + 2 * p, n + 2 * p + 1);
            net.add_edge(pu, u, 1, Some(e));
            net.add_edge(pv, v, 1, Some(e));
            let class_u = p > 0 && (code >> (p - 1)) & 1 == 1;
            let class_v = class_u ^ (color[u] == color[v]);
            for (pendant, class) in [(pu, class_u), (pv, class_v)] {
                if class {
                    net.add_arc(pendant, t, INFINITE, None);
                } else {
                    net.add_arc(s, pendant, INFINITE, None);
                }
            }
        }
        let limit = best.len() as u32;
        let flow = net.max_flow(s, t, limit);
        *augmentations += net.augmentations();
        if flow < limit {
            let cut: FxHashSet<usize> = net.cut_labels(s).into_iter().collect();
            best = cut.into_iter().collect();
        }
    }
    best
}
