//! Rendering of the final result and the process exit code.

use crate::graph::OccGraph;
use crate::model::Variant;
use crate::solution::Solution;
use std::io::{self, Write};
use std::time::Duration;

/// Size column of the statistics line when the solver failed.
pub const FAILED_MARKER: &str = "-";

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum OutputMode {
    /// One selected element per line.
    #[default]
    Full,
    /// Only the size of the transversal.
    Count,
    /// `n m size cpu-seconds` on a single line, followed by the number of augmenting paths when
    /// the transversal was computed in process.
    Statistics,
}

/// The outcome of a run, borrowed from the pieces that produced it.
#[derive(Debug, Clone)]
pub struct Report<'a> {
    pub graph: &'a OccGraph,
    pub variant: Variant,
    pub solution: &'a Solution,
    /// `false` if the solver failed, in which case `solution` may be partial.
    pub succeeded: bool,
    pub cpu_time: Duration,
    /// Augmenting paths of the in-process solver, `None` for an external solver.
    pub augmentations: Option<u64>,
}

impl Report<'_> {

    /// Writes `self` in `mode` to `out`.
    pub fn write<W: Write>(&self, mode: OutputMode, mut out: W) -> Result<(), io::Error> {
        match mode {
            OutputMode::Full => {
                for elem in self.solution.selected() {
                    match self.variant {
                        Variant::Vertex => writeln!(out, "{}", self.graph.name(elem))?,
                        Variant::Edge => {
                            let (u, v) = self.graph.edges()[elem];
                            writeln!(out, "{} {}", self.graph.name(u), self.graph.name(v))?
                        },
                    }
                }
            },
            OutputMode::Count => writeln!(out, "{}", self.solution.len())?,
            OutputMode::Statistics => {
                let size = if self.succeeded {
                    self.solution.len().to_string()
                } else {
                    FAILED_MARKER.to_owned()
                };
                write!(out, "{:5} {:6} {:>5} {:10.2}",
                       self.graph.num_vertices(),
                       self.graph.num_edges(),
                       size,
                       self.cpu_time.as_secs_f64())?;
                if let Some(augmentations) = self.augmentations {
                    write!(out, " {:16}", augmentations)?;
                }
                writeln!(out)?
            },
        }
        out.flush()
    }

    /// Returns the process exit code: `0` on success, `1` if the solver failed.
    pub fn exit_code(&self) -> i32 {
        if self.succeeded { 0 } else { 1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn render(report: &Report, mode: OutputMode) -> String {
        let mut out = Vec::new();
        report.write(mode, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn triangle() -> OccGraph {
        OccGraph::read_edge_list(Cursor::new("x y\ny z\nz x\n")).unwrap()
    }

    #[test]
    fn vertex_full_and_count_test() {
        let graph = triangle();
        let solution = Solution::parse("4 occ[0] * 0 0 1\n5 occ[1] * 1 0 1\n6 occ[2] * 0 0 1\n", 3)
            .unwrap();
        let report = Report {
            graph: &graph,
            variant: Variant::Vertex,
            solution: &solution,
            succeeded: true,
            cpu_time: Duration::from_millis(1250),
            augmentations: None,
        };
        assert_eq!(render(&report, OutputMode::Full), "y\n");
        assert_eq!(render(&report, OutputMode::Count), "1\n");
        assert_eq!(render(&report, OutputMode::Statistics), "    3      3     1       1.25\n");
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn edge_full_test() {
        let graph = triangle();
        let solution = Solution::parse("occ[2] * 1 0 1\nocc[0] * 1 0 1\n", 3).unwrap();
        let report = Report {
            graph: &graph,
            variant: Variant::Edge,
            solution: &solution,
            succeeded: true,
            cpu_time: Duration::ZERO,
            augmentations: None,
        };
        assert_eq!(render(&report, OutputMode::Full), "x y\nz x\n");
        assert_eq!(render(&report, OutputMode::Count), "2\n");
    }

    #[test]
    fn empty_solution_test() {
        let graph = OccGraph::read_edge_list(Cursor::new("1 2\n2 3\n3 4\n4 1\n")).unwrap();
        let solution = Solution::parse("Status: INTEGER OPTIMAL\n", 4).unwrap();
        let report = Report {
            graph: &graph,
            variant: Variant::Vertex,
            solution: &solution,
            succeeded: true,
            cpu_time: Duration::ZERO,
            augmentations: None,
        };
        assert_eq!(render(&report, OutputMode::Full), "");
        assert_eq!(render(&report, OutputMode::Count), "0\n");
    }

    #[test]
    fn failed_statistics_test() {
        let graph = triangle();
        let solution = Solution::default();
        let report = Report {
            graph: &graph,
            variant: Variant::Vertex,
            solution: &solution,
            succeeded: false,
            cpu_time: Duration::ZERO,
            augmentations: None,
        };
        assert_eq!(render(&report, OutputMode::Statistics), "    3      3     -       0.00\n");
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn augmentations_column_test() {
        let graph = triangle();
        let solution = Solution::from_selected([0]);
        let report = Report {
            graph: &graph,
            variant: Variant::Vertex,
            solution: &solution,
            succeeded: true,
            cpu_time: Duration::from_millis(30),
            augmentations: Some(42),
        };
        assert_eq!(render(&report, OutputMode::Statistics),
                   "    3      3     1       0.03               42\n");
        assert_eq!(render(&report, OutputMode::Count), "1\n");
    }
}
