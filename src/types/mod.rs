//! Core types for speedlog

mod error;
mod cube;
mod record;
mod stats;

pub use error::{ValidationError, IndexError, OracleError, SolveError, MoveParseError};
pub use cube::{Face, Color, FaceLayout, CanonicalCubeString, Move, Turn, FACE_ORDER};
pub use record::{SolveRecord, SolveSubmission};
pub use stats::{StatValue, WindowAverage, TargetProgress, StatisticsSnapshot, window_label};
