//! Binary that reads an edge list from standard in, computes a minimum odd cycle transversal with
//! an external MILP solver and writes the result to standard out.

use clap::Parser;
use std::error;
use std::io::{self, Write};
use std::process;
use tracing::{error, info, warn};

use occ_lp::{
    compress::{self, CompressOptions},
    cust_error::ProcessingError,
    graph::OccGraph,
    model::{Model, Variant},
    report::{OutputMode, Report},
    solution::Solution,
    solver::{self, SolverConfig},
};

/// Calculate a minimum odd cycle transversal.
///
/// Reads one edge per line ("<u> <v>") from standard input and removes the fewest vertices (or
/// edges with -e) that make the graph bipartite, by solving an integer program with glpsol or,
/// with --native, by iterative compression in process.
#[derive(Parser)]
#[command(name = "occ")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Print only the size of the transversal
    #[arg(short = 'c')]
    count: bool,

    /// Print only statistics (implies -c)
    #[arg(short = 's')]
    stats: bool,

    /// Remove edges instead of vertices
    #[arg(short = 'e')]
    edges: bool,

    /// Print the MathProg model and exit without solving
    #[arg(short = 'm')]
    dump_model: bool,

    /// Solve in process by iterative compression instead of running the solver
    #[arg(long)]
    native: bool,

    /// Prune side assignments with adjacent vertices on one side early (vertex variant of --native)
    #[arg(short = 'b', requires = "native")]
    prune_colorings: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Solver executable, invoked like glpsol
    #[arg(long, env = "OCC_SOLVER", default_value = "glpsol")]
    solver: String,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        if self.stats {
            OutputMode::Statistics
        } else if self.count {
            OutputMode::Count
        } else {
            OutputMode::Full
        }
    }

    fn variant(&self) -> Variant {
        if self.edges { Variant::Edge } else { Variant::Vertex }
    }
}

fn run(cli: &Cli) -> Result<i32, Box<dyn error::Error>> {
    let stdin = io::stdin();
    let stdin = stdin.lock();
    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    let graph = OccGraph::read_edge_list(stdin)?;
    let variant = cli.variant();
    let model = Model::encode(&graph, variant);
    if cli.dump_model {
        write!(stdout, "{}", model)?;
        stdout.flush()?;
        return Ok(0)
    }

    let (solution, succeeded, cpu_time, augmentations) = if cli.native {
        let options = CompressOptions { prune_colorings: cli.prune_colorings };
        let native = compress::solve(&graph, variant, options);
        (native.solution, true, solver::cpu_time(), Some(native.augmentations))
    } else {
        let config = SolverConfig::with_program(cli.solver.as_str());
        let run = solver::run_to_completion(&config, &model.to_document())?;
        let solution = Solution::parse(&run.report, model.num_indicators())?;
        if !run.succeeded() {
            warn!(status = %run.status, signal = ?run.signal(), "solver failed");
        } else if !solution.is_optimal() {
            warn!(status = ?solution.status(), "solver did not reach the optimum");
        }
        let succeeded = run.succeeded() && solution.is_optimal();
        (solution, succeeded, run.cpu_time, None)
    };

    // Validate
    if succeeded && !graph.is_transversal(variant, &solution.to_set()) {
        return Err(Box::new(ProcessingError::InvalidSolution(
            "graph is not bipartite after removing the selected elements".to_owned())))
    }
    info!(size = solution.len(), ?variant, "transversal found");

    let report = Report {
        graph: &graph,
        variant,
        solution: &solution,
        succeeded,
        cpu_time,
        augmentations,
    };
    report.write(cli.output_mode(), &mut stdout)?;
    Ok(report.exit_code())
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    match run(&cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    }
}
