//! Scramble generator and move-sequence parsing
//!
//! Scrambles are random face turns with one constraint: no two consecutive
//! moves turn the same face. Nothing stronger (opposite-face cancellation,
//! optimality) is claimed.

use lazy_static::lazy_static;
use regex::Regex;
use crate::DEFAULT_SCRAMBLE_LENGTH;
use crate::types::{Face, Move, MoveParseError, Turn, FACE_ORDER};

lazy_static! {
    // One move token: face letter, optional ' or 2
    static ref RE_MOVE: Regex = Regex::new(r"^([URFDLB])(['2]?)$").unwrap();
}

const TURNS: [Turn; 3] = [Turn::Clockwise, Turn::CounterClockwise, Turn::Double];

/// Random scramble source; deterministic when seeded
#[derive(Debug)]
pub struct ScrambleGenerator {
    rng: fastrand::Rng,
}

impl Default for ScrambleGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrambleGenerator {
    pub fn new() -> Self {
        Self { rng: fastrand::Rng::new() }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self { rng: fastrand::Rng::with_seed(seed) }
    }

    /// Generate `length` moves
    pub fn generate_moves(&mut self, length: usize) -> Vec<Move> {
        let mut moves = Vec::with_capacity(length);
        let mut last_face: Option<Face> = None;

        for _ in 0..length {
            // Resample only the face until it differs from the previous one
            let mut face = FACE_ORDER[self.rng.usize(..FACE_ORDER.len())];
            while Some(face) == last_face {
                face = FACE_ORDER[self.rng.usize(..FACE_ORDER.len())];
            }
            let turn = TURNS[self.rng.usize(..TURNS.len())];
            moves.push(Move::new(face, turn));
            last_face = Some(face);
        }

        moves
    }

    /// Generate a space-separated scramble of `length` moves
    pub fn generate(&mut self, length: usize) -> String {
        format_moves(&self.generate_moves(length))
    }

    /// Generate a scramble of the default length (20)
    pub fn generate_default(&mut self) -> String {
        self.generate(DEFAULT_SCRAMBLE_LENGTH)
    }
}

/// Parse a whitespace-separated move sequence
pub fn parse_moves(text: &str) -> Result<Vec<Move>, MoveParseError> {
    text.split_whitespace().map(parse_move).collect()
}

fn parse_move(token: &str) -> Result<Move, MoveParseError> {
    let caps = RE_MOVE
        .captures(token)
        .ok_or_else(|| MoveParseError(token.to_string()))?;

    let face = caps
        .get(1)
        .and_then(|m| m.as_str().chars().next())
        .and_then(Face::from_symbol)
        .ok_or_else(|| MoveParseError(token.to_string()))?;

    let turn = match caps.get(2).map(|m| m.as_str()) {
        Some("'") => Turn::CounterClockwise,
        Some("2") => Turn::Double,
        _ => Turn::Clockwise,
    };

    Ok(Move::new(face, turn))
}

pub fn format_moves(moves: &[Move]) -> String {
    moves
        .iter()
        .map(Move::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

// =============================================================================
// TESTS
// =============================================================================
