//! speedlog: speedcube solve log, rolling statistics and cube-state validation
//!
//! Data flows one way: a caller appends a `SolveRecord` to a user's `SolveLog`
//! (or deletes one), and every read re-derives a `StatisticsSnapshot` from the
//! current log. Cube strings go through `CubeStateCodec` before any solver sees them.

pub mod core;
pub mod types;

// =============================================================================
// SOLVE LOG
// =============================================================================

/// Maximum solves kept per user; older solves are evicted first
pub const MAX_SOLVES_PER_USER: usize = 1000;

/// Seconds added to the effective time of a +2 solve
pub const PLUS_TWO_PENALTY_SECS: f64 = 2.0;

// =============================================================================
// STATISTICS
// =============================================================================

/// Rolling window sizes reported in every snapshot
pub const WINDOW_SIZES: [usize; 6] = [3, 5, 12, 50, 100, 1000];

/// Windows at or above this size drop the best and worst time (aoN);
/// smaller windows are plain means (moN)
pub const TRIM_THRESHOLD: usize = 5;

/// Sub-N second targets tracked in the snapshot
pub const TARGET_THRESHOLDS: [u32; 3] = [10, 15, 20];

// =============================================================================
// CUBE
// =============================================================================

/// Stickers on a 3x3x3 cube
pub const CUBE_STICKERS: usize = 54;

/// Stickers per face
pub const FACE_STICKERS: usize = 9;

/// Default scramble length in moves
pub const DEFAULT_SCRAMBLE_LENGTH: usize = 20;

/// Longest scramble the API will generate
pub const MAX_SCRAMBLE_LENGTH: usize = 100;

/// Default boundary timeout for the solving oracle (milliseconds)
pub const DEFAULT_SOLVER_TIMEOUT_MS: u64 = 5000;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "0.1.0";
