//! Implementation of the input graph: a table of vertex names and the edge list in input order,
//! together with an independent bipartiteness check used to verify transversals.

use crate::cust_error::ImportError;
use crate::model::Variant;
use fxhash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;
use std::io::BufRead;
use tracing::{debug, warn};

/// Insertion ordered table mapping vertex names to dense ids `0..n`.
#[derive(Debug, Default, Eq, PartialEq, Clone)]
pub struct NameTable {
    names: Vec<String>,
    ids: FxHashMap<String, usize>,
}

impl NameTable {

    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of `name`, assigning the next unused id if `name` was not seen before.
    pub fn intern(&mut self, name: &str) -> usize {
        if let Some(id) = self.ids.get(name) {
            return *id
        }
        let id = self.names.len();
        self.names.push(name.to_owned());
        self.ids.insert(name.to_owned(), id);
        id
    }

    /// Returns the id of `name` or `None` if `name` is unknown.
    pub fn id(&self, name: &str) -> Option<usize> {
        self.ids.get(name).copied()
    }

    /// Returns the name of vertex `id`.
    pub fn name(&self, id: usize) -> &str {
        &self.names[id]
    }

    /// Returns the number of names, which is also the next unused id.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Checks if no name was interned yet.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// An undirected multigraph as read from an edge list. Immutable once read.
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct OccGraph {
    vertices: NameTable,
    /// Edges in input order. Edge-variant indices refer to positions in this list.
    edges: Vec<(usize, usize)>,
}

// Static functions
impl OccGraph {

    /// Creates a graph from an already filled name table and edges over its ids.
    pub fn new(vertices: NameTable, edges: Vec<(usize, usize)>) -> Self {
        OccGraph { vertices, edges }
    }

    /// Returns the number of vertices `n`.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of edges `m`, duplicates included.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Returns the edge list in input order.
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Returns the display name of vertex `v`.
    pub fn name(&self, v: usize) -> &str {
        self.vertices.name(v)
    }

    /// Returns the table of vertex names.
    pub fn vertices(&self) -> &NameTable {
        &self.vertices
    }

    /// Checks if `self` is bipartite.
    pub fn is_bipartite(&self) -> bool {
        self.is_bipartite_filtered(|_, _| true)
    }

    /// Checks if `self` without the vertices in `removed` is bipartite.
    pub fn is_bipartite_without_vertices(&self, removed: &FxHashSet<usize>) -> bool {
        self.is_bipartite_filtered(|_, (u, v)| !removed.contains(&u) && !removed.contains(&v))
    }

    /// Checks if `self` without the edges at the positions in `removed` is bipartite.
    pub fn is_bipartite_without_edges(&self, removed: &FxHashSet<usize>) -> bool {
        self.is_bipartite_filtered(|i, _| !removed.contains(&i))
    }

    /// Checks if `selected` is an odd cycle transversal of `self` for the given `variant`.
    pub fn is_transversal(&self, variant: Variant, selected: &FxHashSet<usize>) -> bool {
        match variant {
            Variant::Vertex => self.is_bipartite_without_vertices(selected),
            Variant::Edge => self.is_bipartite_without_edges(selected),
        }
    }

    fn is_bipartite_filtered<F>(&self, keep: F) -> bool
        where F: Fn(usize, (usize, usize)) -> bool {
        self.two_coloring_filtered(keep).is_some()
    }

    /// Two-colors the subgraph of all edges accepted by `keep` by breadth first search.
    /// Returns the color of every vertex, or `None` if that subgraph is not bipartite.
    pub fn two_coloring_filtered<F>(&self, keep: F) -> Option<Vec<bool>>
        where F: Fn(usize, (usize, usize)) -> bool {
        let n = self.num_vertices();
        let mut adj_list: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (i, &(u, v)) in self.edges.iter().enumerate() {
            if !keep(i, (u, v)) {
                continue
            }
            if u == v {
                return None
            }
            adj_list[u].push(v);
            adj_list[v].push(u);
        }
        let mut color: Vec<Option<bool>> = vec![None; n];
        let mut queue = VecDeque::new();
        for start in 0..n {
            if color[start].is_some() {
                continue
            }
            color[start] = Some(false);
            queue.push_back(start);
            while let Some(next) = queue.pop_front() {
                let c = color[next];
                for &neigh in &adj_list[next] {
                    match color[neigh] {
                        None => {
                            color[neigh] = c.map(|c| !c);
                            queue.push_back(neigh);
                        },
                        Some(other) if Some(other) == c => return None,
                        Some(_) => {},
                    }
                }
            }
        }
        Some(color.into_iter().map(|c| c.unwrap_or(false)).collect())
    }
}

impl OccGraph {

    /// Reads an edge list and creates an `OccGraph`.
    ///
    /// Every non-empty line that is not a comment names the two endpoints of one edge. Lines
    /// starting with `#` are comments, but a `# Graph Name` comment opens a header block that is
    /// skipped up to and including the next `# Edges` line.
    pub fn read_edge_list<R: BufRead>(input: R) -> Result<Self, ImportError> {
        let mut vertices = NameTable::new();
        let mut edges = Vec::new();
        let mut seen: FxHashSet<(usize, usize)> = FxHashSet::default();
        let mut in_header = false;
        for (line_num, line) in input.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if in_header {
                if comment_content(trimmed) == Some("Edges") || trimmed == "Edges" {
                    in_header = false;
                }
                continue
            }
            if trimmed.is_empty() {
                continue
            }
            if let Some(content) = comment_content(trimmed) {
                if content == "Graph Name" {
                    in_header = true;
                }
                continue
            }
            // <src> <trg>
            let mut s = trimmed.split_whitespace();
            let (src, trg) = match (s.next(), s.next(), s.next()) {
                (Some(src), Some(trg), None) => (src, trg),
                _ => return Err(ImportError::MalformedLine {
                    line: line_num + 1,
                    content: line.clone(),
                }),
            };
            let u = vertices.intern(src);
            let v = vertices.intern(trg);
            if u == v {
                warn!(line = line_num + 1, vertex = src, "self loop");
            } else if !seen.insert((u.min(v), u.max(v))) {
                warn!(line = line_num + 1, src, trg, "duplicate edge");
            }
            edges.push((u, v));
        }
        debug!(n = vertices.len(), m = edges.len(), "read graph");
        Ok(OccGraph::new(vertices, edges))
    }
}

/// Returns the text of a comment line after the leading `#`, or `None` for other lines.
fn comment_content(line: &str) -> Option<&str> {
    line.strip_prefix('#').map(|rest| rest.trim())
}
