//! End-to-end solve flow
//!
//! codec → already-solved short-circuit → oracle (bounded by a timeout on a
//! blocking worker) → move-sequence check. Every collaborator failure comes
//! back as an `OracleError`; nothing from the oracle propagates raw.

use std::sync::Arc;
use std::time::Duration;
use serde::Serialize;
use tracing::warn;
use crate::core::codec::CubeStateCodec;
use crate::core::oracle::SolvingOracle;
use crate::core::scramble::{format_moves, parse_moves};
use crate::types::{CanonicalCubeString, FaceLayout, OracleError, SolveError, ValidationError};

/// Cube as supplied by the caller
#[derive(Debug, Clone)]
pub enum SolveRequest {
    /// Raw 54-symbol string
    Facelets(String),
    /// Color-keyed faces
    Layout(FaceLayout),
}

impl SolveRequest {
    /// Run the request through the codec
    pub fn canonicalize(&self, codec: &CubeStateCodec) -> Result<CanonicalCubeString, ValidationError> {
        match self {
            SolveRequest::Facelets(raw) => codec.validate(raw),
            SolveRequest::Layout(layout) => codec.encode(layout),
        }
    }
}

/// A solution from the oracle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SolveOutcome {
    pub solution: String,
    pub move_count: usize,
}

/// Solve a cube through `oracle`, giving up after `timeout`
pub async fn solve(
    request: &SolveRequest,
    codec: &CubeStateCodec,
    oracle: Arc<dyn SolvingOracle>,
    timeout: Duration,
) -> Result<SolveOutcome, SolveError> {
    let cube = request.canonicalize(codec)?;

    // An empty solution would be ambiguous with a solver failure
    if cube.is_solved() {
        return Err(OracleError::AlreadySolved.into());
    }

    let raw = call_oracle(oracle, cube, timeout).await?;
    Ok(check_solution(&raw)?)
}

/// Run the oracle on a blocking worker under `timeout`
async fn call_oracle(
    oracle: Arc<dyn SolvingOracle>,
    cube: CanonicalCubeString,
    timeout: Duration,
) -> Result<String, OracleError> {
    let name = oracle.name().to_string();
    let task = tokio::task::spawn_blocking(move || oracle.solve(&cube));

    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => {
            warn!("Solver {} failed: {}", name, join_error);
            let reason = if join_error.is_panic() {
                "solver crashed"
            } else {
                "solver task was cancelled"
            };
            Err(OracleError::Unavailable(reason.to_string()))
        }
        Err(_) => {
            warn!("Solver {} timed out after {:?}", name, timeout);
            Err(OracleError::Unavailable(format!(
                "solver timed out after {}ms",
                timeout.as_millis()
            )))
        }
    }
}

/// Parse the oracle's answer into a normalised move sequence
fn check_solution(raw: &str) -> Result<SolveOutcome, OracleError> {
    let moves = parse_moves(raw)
        .map_err(|e| OracleError::Malformed(format!("solver returned {}", e)))?;
    if moves.is_empty() {
        return Err(OracleError::Malformed("solver returned an empty move sequence".to_string()));
    }
    Ok(SolveOutcome {
        solution: format_moves(&moves),
        move_count: moves.len(),
    })
}

// =============================================================================
// TESTS
// =============================================================================
