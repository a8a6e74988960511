//! Solving oracle boundary
//!
//! The solver itself is an external collaborator. This module defines the
//! contract (`SolvingOracle`) and two adapters:
//! - `CommandOracle` runs an external solver program
//! - `OfflineOracle` is used when no solver is configured
//!
//! Both check reachability first, so an unreachable position is reported
//! as `Unsolvable` with a specific reason instead of a solver crash.

use std::process::{Child, Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use crate::DEFAULT_SOLVER_TIMEOUT_MS;
use crate::core::facelets::verify_reachable;
use crate::types::{CanonicalCubeString, OracleError};

/// How often a running solver is checked for exit
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Computes a move sequence for a syntactically valid cube
pub trait SolvingOracle: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Solve `cube`, returning a space-separated move sequence
    fn solve(&self, cube: &CanonicalCubeString) -> Result<String, OracleError>;
}

/// External solver program.
///
/// Invoked as `<program> <args...> <cube>`. Stdout is the move sequence;
/// a non-zero exit status means the solver rejected the cube. A solver still
/// running at the deadline is killed and reaped before `solve` returns.
#[derive(Debug, Clone)]
pub struct CommandOracle {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandOracle {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: Duration::from_millis(DEFAULT_SOLVER_TIMEOUT_MS),
        }
    }

    /// Kill the solver if it runs longer than `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Parse a whitespace-separated command line (`"kociemba --quiet"`)
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let program = parts.next()?;
        Some(Self::new(program).with_args(parts))
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl SolvingOracle for CommandOracle {
    fn name(&self) -> &str {
        &self.program
    }

    fn solve(&self, cube: &CanonicalCubeString) -> Result<String, OracleError> {
        verify_reachable(cube)?;

        debug!("Running solver {} for {}", self.program, cube);
        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(cube.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                warn!("Solver {} could not be started: {}", self.program, e);
                OracleError::Unavailable(format!("could not start solver: {}", e))
            })?;

        let output = self.wait_with_deadline(child)?;

        if !output.status.success() {
            // Killed by a signal: the solver crashed, the cube is not at fault
            if output.status.code().is_none() {
                warn!("Solver {} terminated by signal ({})", self.program, output.status);
                return Err(OracleError::Unavailable(format!(
                    "solver terminated abnormally ({})",
                    output.status
                )));
            }
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let reason = if stderr.is_empty() {
                format!("solver exited with {}", output.status)
            } else {
                stderr
            };
            return Err(OracleError::Unsolvable(reason));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl CommandOracle {
    /// Wait for `child` to exit, killing it once the deadline passes
    fn wait_with_deadline(&self, mut child: Child) -> Result<Output, OracleError> {
        let deadline = Instant::now() + self.timeout;
        loop {
            match child.try_wait() {
                Ok(Some(_)) => break,
                Ok(None) if Instant::now() >= deadline => {
                    kill_and_reap(&mut child);
                    warn!("Solver {} killed after {:?}", self.program, self.timeout);
                    return Err(OracleError::Unavailable(format!(
                        "solver timed out after {}ms",
                        self.timeout.as_millis()
                    )));
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    kill_and_reap(&mut child);
                    return Err(OracleError::Unavailable(format!("lost track of solver: {}", e)));
                }
            }
        }

        child
            .wait_with_output()
            .map_err(|e| OracleError::Unavailable(format!("could not read solver output: {}", e)))
    }
}

fn kill_and_reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Stand-in when no solver is configured: validates, then reports unavailable
#[derive(Debug, Default)]
pub struct OfflineOracle;

impl SolvingOracle for OfflineOracle {
    fn name(&self) -> &str {
        "offline"
    }

    fn solve(&self, cube: &CanonicalCubeString) -> Result<String, OracleError> {
        verify_reachable(cube)?;
        Err(OracleError::Unavailable("no solver configured".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CubeStateCodec;

    const AFTER_U: &str = "UUUUUUUUUBBBRRRRRRRRRFFFFFFDDDDDDDDDFFFLLLLLLLLLBBBBBB";

    #[test]
    fn test_command_line_parsing() {
        let oracle = CommandOracle::from_command_line("solver --fast  -q").unwrap();
        assert_eq!(oracle.program(), "solver");
        assert_eq!(oracle.args, vec!["--fast", "-q"]);
        assert!(CommandOracle::from_command_line("   ").is_none());
    }

    #[test]
    fn test_offline_oracle_reports_unavailable() {
        let cube = CubeStateCodec::new().validate(AFTER_U).unwrap();
        assert!(matches!(OfflineOracle.solve(&cube), Err(OracleError::Unavailable(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_hung_solver_is_killed_at_deadline() {
        let marker = std::env::temp_dir().join(format!("speedlog-hung-solver-{}", std::process::id()));
        let _ = std::fs::remove_file(&marker);
        let script = format!("sleep 1; touch {}", marker.display());

        let cube = CubeStateCodec::new().validate(AFTER_U).unwrap();
        let oracle = CommandOracle::new("sh")
            .with_args(["-c", script.as_str(), "solver"])
            .with_timeout(Duration::from_millis(100));

        let started = Instant::now();
        let result = oracle.solve(&cube);
        assert!(started.elapsed() < Duration::from_millis(900));
        assert_eq!(
            result,
            Err(OracleError::Unavailable("solver timed out after 100ms".to_string()))
        );

        // A surviving solver would have created the marker by now
        thread::sleep(Duration::from_millis(1500));
        assert!(!marker.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_solver_exit_codes() {
        let cube = CubeStateCodec::new().validate(AFTER_U).unwrap();

        let answers = CommandOracle::new("sh").with_args(["-c", "echo \"U'\"", "solver"]);
        assert_eq!(answers.solve(&cube), Ok("U'".to_string()));

        let rejects = CommandOracle::new("sh").with_args(["-c", "echo 'Error 3' >&2; exit 1", "solver"]);
        assert_eq!(rejects.solve(&cube), Err(OracleError::Unsolvable("Error 3".to_string())));

        let crashes = CommandOracle::new("sh").with_args(["-c", "kill -9 $$", "solver"]);
        assert!(matches!(crashes.solve(&cube), Err(OracleError::Unavailable(_))));
    }

    #[test]
    fn test_missing_program_is_unavailable() {
        let cube = CubeStateCodec::new().validate(AFTER_U).unwrap();
        let oracle = CommandOracle::new("/nonexistent/speedlog-solver");
        assert!(matches!(oracle.solve(&cube), Err(OracleError::Unavailable(_))));
    }
}
