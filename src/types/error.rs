//! Error taxonomy
//!
//! Validation and index errors are client mistakes and always recoverable.
//! Oracle errors come from the solving collaborator and keep their outcomes
//! apart so callers can tell "fix your stickers" from "already solved".

use thiserror::Error;

/// A cube string, face layout or solve submission was rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("cube string must be {expected} symbols, got {found}")]
    Length { expected: usize, found: usize },

    #[error("symbol '{symbol}' at position {position} is not a face symbol (URFDLB)")]
    Alphabet { symbol: char, position: usize },

    #[error("symbol '{symbol}' appears {count} times, expected 9")]
    ColorCount { symbol: char, count: usize },

    #[error("unknown color '{color}'")]
    UnknownColor { color: String },

    #[error("missing face '{face}'")]
    MissingFace { face: String },

    #[error("face '{face}' given more than once")]
    DuplicateFace { face: String },

    #[error("face '{face}' has {found} stickers, expected 9")]
    StickerCount { face: String, found: usize },

    #[error("elapsed time cannot be negative ({value})")]
    NegativeTime { value: f64 },

    #[error("elapsed time must be a finite number")]
    NonFiniteTime,
}

impl ValidationError {
    /// Machine-readable kind (for API bodies and logging)
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Length { .. } => "length",
            Self::Alphabet { .. } => "alphabet",
            Self::ColorCount { .. } => "color_count",
            Self::UnknownColor { .. } => "unknown_color",
            Self::MissingFace { .. } => "missing_face",
            Self::DuplicateFace { .. } => "duplicate_face",
            Self::StickerCount { .. } => "sticker_count",
            Self::NegativeTime { .. } => "negative_time",
            Self::NonFiniteTime => "non_finite_time",
        }
    }
}

/// A positional operation on a solve log was rejected; the log is unchanged
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("index {index} out of range for {len} solves")]
    OutOfRange { index: usize, len: usize },

    #[error("solve at index {index} is no longer solve #{expected_id}")]
    Stale { index: usize, expected_id: u64 },

    #[error("index {index} listed more than once")]
    Duplicate { index: usize },
}

/// Outcome of the solving oracle other than a move sequence
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    #[error("malformed cube: {0}")]
    Malformed(String),

    #[error("cube is not solvable: {0}")]
    Unsolvable(String),

    #[error("cube is already solved")]
    AlreadySolved,

    #[error("solver unavailable: {0}")]
    Unavailable(String),
}

impl OracleError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "malformed",
            Self::Unsolvable(_) => "unsolvable",
            Self::AlreadySolved => "already_solved",
            Self::Unavailable(_) => "unavailable",
        }
    }

    /// What the user should do about it
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "The cube description is malformed. Check that every face has 9 stickers.",
            Self::Unsolvable(_) => "This position cannot be reached on a real cube. Check that all colors are placed correctly.",
            Self::AlreadySolved => "The cube is already solved.",
            Self::Unavailable(_) => "The solver is unavailable right now. Try again later.",
        }
    }
}

/// Failure of the end-to-end solve flow
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

/// A move token did not match `<face>[' | 2]`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid move token '{0}'")]
pub struct MoveParseError(pub String);
