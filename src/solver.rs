//! Drives an external MILP solver over its standard input and output.
//!
//! The model is written to the solver on the calling thread while a second thread drains the
//! solver's output, so neither side can block on a full pipe.

use crate::cust_error::SolverError;
use std::io::{self, Read, Write};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// How to invoke the solver. The program must read a MathProg document from standard input and
/// write its solution report to standard output.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SolverConfig {
    pub program: String,
    pub args: Vec<String>,
}

impl SolverConfig {

    /// Returns the default `glpsol` argument list with its progress display suppressed.
    pub fn glpsol_args() -> Vec<String> {
        ["--math", "/dev/stdin", "--display", "/dev/null", "--output", "/dev/stdout"]
            .iter()
            .map(|arg| arg.to_string())
            .collect()
    }

    /// Invokes `program` with the `glpsol` argument list.
    pub fn with_program(program: impl Into<String>) -> Self {
        SolverConfig {
            program: program.into(),
            args: Self::glpsol_args(),
        }
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::with_program("glpsol")
    }
}

/// A finished solver process.
#[derive(Debug, Clone)]
pub struct SolverRun {
    /// Everything the solver wrote to its standard output.
    pub report: String,
    pub status: ExitStatus,
    /// CPU time, user plus system, of this process and its waited-for children.
    pub cpu_time: Duration,
}

impl SolverRun {

    /// Returns `true` if the solver exited normally with status zero.
    pub fn succeeded(&self) -> bool {
        self.status.success()
    }

    /// Returns the signal that killed the solver, if any.
    pub fn signal(&self) -> Option<i32> {
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            self.status.signal()
        }
        #[cfg(not(unix))]
        {
            None
        }
    }
}

/// Runs the solver of `config` on `document` and blocks until it has terminated.
///
/// Only a failure to start the solver or to use its pipes is an error. A solver that exits with a
/// non-zero status or is killed still yields a `SolverRun` holding whatever it printed.
pub fn run_to_completion(config: &SolverConfig, document: &str) -> Result<SolverRun, SolverError> {
    debug!(program = %config.program, args = ?config.args, bytes = document.len(), "spawning solver");
    let mut child = Command::new(&config.program)
        .args(&config.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|source| SolverError::Spawn {
            program: config.program.clone(),
            source,
        })?;

    let drain = child.stdout.take().map(|mut stdout| {
        thread::spawn(move || -> io::Result<Vec<u8>> {
            let mut buf = Vec::new();
            stdout.read_to_end(&mut buf)?;
            Ok(buf)
        })
    });

    // Dropping stdin closes the pipe and signals end of input.
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(document.as_bytes()).and_then(|_| stdin.flush()),
        None => Ok(()),
    };
    let write_error = match written {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            warn!("solver closed its input before reading the whole model");
            None
        },
        Err(e) => Some(e),
        Ok(()) => None,
    };

    let output = drain.map(|handle| handle.join());
    let status = child.wait()?;
    let cpu_time = cpu_time();
    debug!(%status, ?cpu_time, "solver terminated");

    let report = match output {
        Some(Ok(Ok(bytes))) => String::from_utf8_lossy(&bytes).into_owned(),
        Some(Ok(Err(e))) => return Err(e.into()),
        Some(Err(_)) => return Err(SolverError::DrainPanicked),
        None => String::new(),
    };
    if let Some(e) = write_error {
        return Err(e.into())
    }
    Ok(SolverRun {
        report,
        status,
        cpu_time,
    })
}

/// Returns the CPU time, user plus system, of this process and all of its terminated,
/// waited-for children.
#[cfg(unix)]
pub fn cpu_time() -> Duration {
    use nix::sys::resource::{getrusage, UsageWho};
    use nix::sys::time::TimeVal;

    fn duration(tv: TimeVal) -> Duration {
        Duration::from_secs(tv.tv_sec().max(0) as u64)
            + Duration::from_micros(tv.tv_usec().max(0) as u64)
    }
    [UsageWho::RUSAGE_SELF, UsageWho::RUSAGE_CHILDREN]
        .into_iter()
        .filter_map(|who| getrusage(who).ok())
        .map(|usage| duration(usage.user_time()) + duration(usage.system_time()))
        .sum()
}

#[cfg(not(unix))]
pub fn cpu_time() -> Duration {
    Duration::ZERO
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn shell(script: &str) -> SolverConfig {
        SolverConfig {
            program: "/bin/sh".to_owned(),
            args: vec!["-c".to_owned(), script.to_owned()],
        }
    }

    #[test]
    fn spawn_error_test() {
        let config = SolverConfig::with_program("/nonexistent/occ-solver");
        match run_to_completion(&config, "end;\n") {
            Err(SolverError::Spawn { program, .. }) => assert_eq!(program, "/nonexistent/occ-solver"),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn echo_large_document_test() {
        // Far larger than any pipe buffer: only works if output is drained while writing.
        let document: String = (0..200_000).map(|i| format!("line {}\n", i)).collect();
        let run = run_to_completion(&shell("cat"), &document).unwrap();
        assert!(run.succeeded());
        assert_eq!(run.report, document);
    }

    #[test]
    fn failing_solver_test() {
        let run = run_to_completion(
            &shell("cat >/dev/null; echo '     1 occ[0]       *              1             0             1'; exit 3"),
            "data;\nend;\n",
        ).unwrap();
        assert!(!run.succeeded());
        assert_eq!(run.status.code(), Some(3));
        assert!(run.report.contains("occ[0]"));
    }

    #[test]
    fn killed_solver_test() {
        let run = run_to_completion(&shell("kill -9 $$"), "end;\n").unwrap();
        assert!(!run.succeeded());
        assert_eq!(run.signal(), Some(9));
    }

    #[test]
    fn cpu_time_counts_children_test() {
        let before = cpu_time();
        let run = run_to_completion(&shell("i=0; while [ $i -lt 20000 ]; do i=$((i+1)); done"), "")
            .unwrap();
        assert!(run.succeeded());
        assert!(run.cpu_time >= before);
        assert!(run.cpu_time > Duration::ZERO);
    }

    #[test]
    fn solver_ignoring_input_test() {
        let document = "x".repeat(1 << 20);
        let run = run_to_completion(&shell("echo done"), &document).unwrap();
        assert!(run.succeeded());
        assert_eq!(run.report, "done\n");
    }
}
