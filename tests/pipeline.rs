//! Runs the whole read, encode, solve, decode and report pipeline.

use std::io::Cursor;

use occ_lp::{
    graph::OccGraph,
    model::{Model, Variant},
    report::{OutputMode, Report},
    solution::Solution,
    compress::{self, CompressOptions},
    solver::{self, SolverConfig},
};

/// Runs the pipeline on `input` and returns the rendered output and the exit code.
fn pipeline(input: &str, variant: Variant, mode: OutputMode, config: &SolverConfig) -> (String, i32) {
    let graph = OccGraph::read_edge_list(Cursor::new(input)).unwrap();
    let model = Model::encode(&graph, variant);
    let run = solver::run_to_completion(config, &model.to_document()).unwrap();
    let solution = Solution::parse(&run.report, model.num_indicators()).unwrap();
    let succeeded = run.succeeded() && solution.is_optimal();
    if succeeded {
        assert!(graph.is_transversal(variant, &solution.to_set()));
    }
    let report = Report {
        graph: &graph,
        variant,
        solution: &solution,
        succeeded,
        cpu_time: run.cpu_time,
        augmentations: None,
    };
    let mut out = Vec::new();
    report.write(mode, &mut out).unwrap();
    (String::from_utf8(out).unwrap(), report.exit_code())
}

#[cfg(unix)]
fn fake_solver(script: &str) -> SolverConfig {
    SolverConfig {
        program: "/bin/sh".to_owned(),
        args: vec!["-c".to_owned(), format!("cat >/dev/null; {}", script)],
    }
}

#[cfg(unix)]
#[test]
fn canned_report_test() {
    let config = fake_solver("printf 'Status:     INTEGER OPTIMAL\\n     4 occ[0]       *              0             0             1\\n     5 occ[1]       *              0             0             1\\n     6 occ[2]       *              1             0             1\\n'");
    let (out, code) = pipeline("1 2\n2 3\n3 1\n", Variant::Vertex, OutputMode::Full, &config);
    assert_eq!(out, "3\n");
    assert_eq!(code, 0);
}

#[cfg(unix)]
#[test]
fn failed_solver_statistics_test() {
    let config = fake_solver("exit 1");
    let (out, code) = pipeline("1 2\n2 3\n3 1\n", Variant::Vertex, OutputMode::Statistics, &config);
    let fields: Vec<&str> = out.split_whitespace().collect();
    assert_eq!(fields.len(), 4);
    assert_eq!(&fields[..3], &["3", "3", "-"]);
    assert_eq!(code, 1);
}

#[cfg(unix)]
#[test]
fn non_optimal_status_test() {
    let config = fake_solver("echo 'Status:     INTEGER UNDEFINED'");
    let (out, code) = pipeline("1 2\n2 3\n3 1\n", Variant::Vertex, OutputMode::Count, &config);
    assert_eq!(out, "0\n");
    assert_eq!(code, 1);
}

#[test]
#[ignore = "requires glpsol"]
fn glpsol_triangle_test() {
    let config = SolverConfig::default();
    let (out, code) = pipeline("1 2\n2 3\n3 1\n", Variant::Vertex, OutputMode::Full, &config);
    assert_eq!(code, 0);
    assert_eq!(out.lines().count(), 1);
    assert!(["1", "2", "3"].contains(&out.trim()));
    let (out, _) = pipeline("1 2\n2 3\n3 1\n", Variant::Vertex, OutputMode::Count, &config);
    assert_eq!(out, "1\n");
    let (out, _) = pipeline("1 2\n2 3\n3 1\n", Variant::Edge, OutputMode::Count, &config);
    assert_eq!(out, "1\n");
}

#[test]
#[ignore = "requires glpsol"]
fn glpsol_square_test() {
    let config = SolverConfig::default();
    let input = "1 2\n2 3\n3 4\n4 1\n";
    for variant in [Variant::Vertex, Variant::Edge] {
        let (out, code) = pipeline(input, variant, OutputMode::Full, &config);
        assert_eq!(code, 0);
        assert_eq!(out, "");
        let (out, _) = pipeline(input, variant, OutputMode::Count, &config);
        assert_eq!(out, "0\n");
    }
}

#[test]
#[ignore = "requires glpsol"]
fn glpsol_two_pentagons_test() {
    let config = SolverConfig::default();
    let input = "a b\nb c\nc d\nd e\ne a\nf g\ng h\nh i\ni j\nj f\na f\n";
    let (out, code) = pipeline(input, Variant::Vertex, OutputMode::Count, &config);
    assert_eq!(code, 0);
    assert_eq!(out, "2\n");
    let (out, _) = pipeline(input, Variant::Edge, OutputMode::Count, &config);
    assert_eq!(out, "2\n");
}

#[test]
fn native_two_pentagons_test() {
    let input = "a b\nb c\nc d\nd e\ne a\nf g\ng h\nh i\ni j\nj f\na f\n";
    let graph = OccGraph::read_edge_list(Cursor::new(input)).unwrap();
    for variant in [Variant::Vertex, Variant::Edge] {
        for prune_colorings in [false, true] {
            let native = compress::solve(&graph, variant, CompressOptions { prune_colorings });
            assert_eq!(native.solution.len(), 2);
            assert!(graph.is_transversal(variant, &native.solution.to_set()));
            let report = Report {
                graph: &graph,
                variant,
                solution: &native.solution,
                succeeded: true,
                cpu_time: solver::cpu_time(),
                augmentations: Some(native.augmentations),
            };
            let mut out = Vec::new();
            report.write(OutputMode::Statistics, &mut out).unwrap();
            let line = String::from_utf8(out).unwrap();
            let fields: Vec<&str> = line.split_whitespace().collect();
            assert_eq!(fields.len(), 5);
            assert_eq!(&fields[..3], &["10", "11", "2"]);
            assert_eq!(fields[4], native.augmentations.to_string());
        }
    }
}
