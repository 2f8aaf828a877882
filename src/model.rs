//! Reduction of odd cycle transversal to a 0/1 integer linear program in GNU MathProg.
//!
//! Every vertex `v` gets a binary color `p[v]`, and every removable element `x` gets a binary flag
//! `occ[x]`. For each edge `i = (u,v)` the fudge term `F_i` is `occ[u] + occ[v]` when vertices are
//! removed and `occ[i]` when edges are removed. The two constraints
//!
//! ```text
//! p[u] + p[v] + F_i >= 1
//! p[u] + p[v] - F_i <= 1
//! ```
//!
//! force `p[u] != p[v]` unless `F_i > 0`, so minimizing `sum(occ)` yields a minimum odd cycle
//! transversal.

use crate::graph::OccGraph;
use std::fmt;

/// Which kind of element is removed to make the graph bipartite.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum Variant {
    #[default]
    Vertex,
    Edge,
}

/// The model of a graph, ready to be rendered as a MathProg document.
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct Model {
    variant: Variant,
    n: usize,
    /// First endpoint of each edge, by edge index.
    v1: Vec<usize>,
    /// Second endpoint of each edge, by edge index.
    v2: Vec<usize>,
}

impl Model {

    /// Encodes `graph` for `variant`.
    pub fn encode(graph: &OccGraph, variant: Variant) -> Self {
        let (v1, v2) = graph.edges().iter().copied().unzip();
        Model {
            variant,
            n: graph.num_vertices(),
            v1,
            v2,
        }
    }

    /// Returns which kind of element the `occ` variables stand for.
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Returns the number of `p` variables.
    pub fn num_vertices(&self) -> usize {
        self.n
    }

    /// Returns the number of edges, each giving one `neq1` and one `neq2` row.
    pub fn num_edges(&self) -> usize {
        self.v1.len()
    }

    /// Returns the number of `occ` variables.
    pub fn num_indicators(&self) -> usize {
        match self.variant {
            Variant::Vertex => self.n,
            Variant::Edge => self.num_edges(),
        }
    }

    /// Returns the value of the fudge term of edge `i` under `occ`.
    fn fudge(&self, i: usize, occ: &[bool]) -> i64 {
        match self.variant {
            Variant::Vertex => occ[self.v1[i]] as i64 + occ[self.v2[i]] as i64,
            Variant::Edge => occ[i] as i64,
        }
    }

    /// Checks if the assignment `p`, `occ` satisfies every constraint of `self`.
    pub fn is_satisfied(&self, p: &[bool], occ: &[bool]) -> bool {
        if p.len() != self.n || occ.len() != self.num_indicators() {
            return false
        }
        (0..self.num_edges()).all(|i| {
            let colors = p[self.v1[i]] as i64 + p[self.v2[i]] as i64;
            let fudge = self.fudge(i, occ);
            colors + fudge >= 1 && colors - fudge <= 1
        })
    }

    /// Renders the MathProg document.
    pub fn to_document(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (occ_range, plus, minus) = match self.variant {
            Variant::Vertex => (
                "0..n-1",
                "+ occ[v1[i]] + occ[v2[i]]",
                "- occ[v1[i]] - occ[v2[i]]",
            ),
            Variant::Edge => ("0..m-1", "+ occ[i]", "- occ[i]"),
        };
        writeln!(f, "param n >= 0 integer;")?;
        writeln!(f, "param m >= 0 integer;")?;
        writeln!(f)?;
        writeln!(f, "param v1{{0..m-1}}, integer, >= 0, < n;")?;
        writeln!(f, "param v2{{0..m-1}}, integer, >= 0, < n;")?;
        writeln!(f)?;
        writeln!(f, "var p{{0..n-1}} binary;")?;
        writeln!(f, "var occ{{{}}} binary;", occ_range)?;
        writeln!(f)?;
        writeln!(f, "minimize obj: sum{{i in {}}} occ[i];", occ_range)?;
        writeln!(f)?;
        writeln!(f, "s.t. neq1{{i in 0..m-1}}: p[v1[i]] + p[v2[i]] {} >= 1;", plus)?;
        writeln!(f, "s.t. neq2{{i in 0..m-1}}: p[v1[i]] + p[v2[i]] {} <= 1;", minus)?;
        writeln!(f)?;
        writeln!(f, "data;")?;
        writeln!(f)?;
        writeln!(f, "param n := {};", self.n)?;
        writeln!(f, "param m := {};", self.num_edges())?;
        for (name, ends) in [("v1", &self.v1), ("v2", &self.v2)] {
            writeln!(f)?;
            writeln!(f, "param {} :=", name)?;
            for (i, v) in ends.iter().enumerate() {
                writeln!(f, "\t{:2} {:2}", i, v)?;
            }
            writeln!(f, ";")?;
        }
        writeln!(f)?;
        writeln!(f, "end;")
    }
}
