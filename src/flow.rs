//! Flow network for small integral capacities. Augmenting paths are shortest paths in the
//! residual network, found by breadth first search.
//!
//! Arcs are created in pairs: arc `a` and its partner `a ^ 1` point in opposite directions, so
//! pushing flow over one arc frees the same amount of residual capacity on the other.

use std::collections::VecDeque;

/// Capacity of an arc that must never be part of a minimum cut.
pub const INFINITE: u32 = u32::MAX / 4;

/// Directed network with integral capacities and a residual capacity per arc.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct FlowNet {
    /// Outgoing arcs of every node.
    out: Vec<Vec<usize>>,
    from: Vec<usize>,
    to: Vec<usize>,
    capacity: Vec<u32>,
    residual: Vec<u32>,
    /// Caller supplied label of each arc pair, reported when the pair is cut.
    label: Vec<Option<usize>>,
    /// Number of augmenting paths found so far.
    augmentations: u64,
}

impl FlowNet {

    /// Creates a network with `nodes` nodes and no arcs.
    pub fn new(nodes: usize) -> Self {
        FlowNet {
            out: vec![Vec::new(); nodes],
            ..Default::default()
        }
    }

    /// Returns the number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.out.len()
    }

    fn push_pair(&mut self, u: usize, v: usize, forward: u32, backward: u32, label: Option<usize>) {
        for (from, to, cap) in [(u, v, forward), (v, u, backward)] {
            self.out[from].push(self.to.len());
            self.from.push(from);
            self.to.push(to);
            self.capacity.push(cap);
            self.residual.push(cap);
        }
        self.label.push(label);
    }

    /// Adds an arc `u -> v` with capacity `cap`.
    pub fn add_arc(&mut self, u: usize, v: usize, cap: u32, label: Option<usize>) {
        self.push_pair(u, v, cap, 0, label);
    }

    /// Adds an undirected edge `{u, v}` with capacity `cap` in both directions.
    pub fn add_edge(&mut self, u: usize, v: usize, cap: u32, label: Option<usize>) {
        self.push_pair(u, v, cap, cap, label);
    }

    /// Returns the number of augmenting paths found so far.
    pub fn augmentations(&self) -> u64 {
        self.augmentations
    }

    /// Searches a shortest augmenting path from `s` to `t`. Returns for every node the arc it was
    /// reached by, if `t` was reached.
    fn bfs(&self, s: usize, t: usize) -> Option<Vec<Option<usize>>> {
        let mut pred: Vec<Option<usize>> = vec![None; self.num_nodes()];
        let mut visited = vec![false; self.num_nodes()];
        let mut queue: VecDeque<_> = vec![s].into();
        visited[s] = true;
        while let Some(k) = queue.pop_front() {
            for &arc in &self.out[k] {
                let next = self.to[arc];
                if visited[next] || self.residual[arc] == 0 {
                    continue
                }
                visited[next] = true;
                pred[next] = Some(arc);
                if next == t {
                    return Some(pred)
                }
                queue.push_back(next);
            }
        }
        None
    }

    /// Pushes flow from `s` to `t` until the flow value reaches `limit` or no augmenting path is
    /// left. Returns the flow value.
    pub fn max_flow(&mut self, s: usize, t: usize, limit: u32) -> u32 {
        let mut flow = 0;
        while flow < limit {
            let pred = match self.bfs(s, t) {
                Some(pred) => pred,
                None => break,
            };
            let mut path = Vec::new();
            let mut node = t;
            while let Some(arc) = pred[node] {
                path.push(arc);
                node = self.from[arc];
            }
            let bottleneck = path.iter()
                .map(|arc| self.residual[*arc])
                .min()
                .unwrap_or(0)
                .min(limit - flow);
            for arc in path {
                self.residual[arc] -= bottleneck;
                self.residual[arc ^ 1] += bottleneck;
            }
            flow += bottleneck;
            self.augmentations += 1;
        }
        flow
    }

    /// Returns which nodes are reachable from `s` in the residual network.
    pub fn source_side(&self, s: usize) -> Vec<bool> {
        let mut reached = vec![false; self.num_nodes()];
        let mut queue = vec![s];
        reached[s] = true;
        while let Some(next) = queue.pop() {
            for &arc in &self.out[next] {
                if self.residual[arc] > 0 && !reached[self.to[arc]] {
                    reached[self.to[arc]] = true;
                    queue.push(self.to[arc]);
                }
            }
        }
        reached
    }

    /// Returns the labels of all arcs leaving the source side of a maximum flow from `s`.
    pub fn cut_labels(&self, s: usize) -> Vec<usize> {
        let reached = self.source_side(s);
        (0..self.to.len())
            .filter(|arc| self.capacity[*arc] > 0
                && reached[self.from[*arc]]
                && !reached[self.to[*arc]])
            .filter_map(|arc| self.label[arc / 2])
            .collect()
    }
}
