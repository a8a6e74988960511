//! Integration tests for Slice 3 - Scramble generation
//!
//! Tests scramble shape, the no-repeat-face rule and move parsing

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use speedlog::core::{format_moves, parse_moves, ScrambleGenerator};
use speedlog::types::{Face, Move, Turn};
use speedlog::DEFAULT_SCRAMBLE_LENGTH;

#[test]
fn test_default_scramble_has_twenty_tokens() {
    let scramble = ScrambleGenerator::new().generate_default();
    let tokens: Vec<&str> = scramble.split(' ').collect();
    assert_eq!(tokens.len(), DEFAULT_SCRAMBLE_LENGTH);
    assert!(tokens.iter().all(|t| !t.is_empty()));
}

#[test]
fn test_zero_length_scramble_is_empty() {
    assert_eq!(ScrambleGenerator::new().generate(0), "");
}

#[test]
fn test_seeded_generators_agree() {
    let a = ScrambleGenerator::with_seed(42).generate(25);
    let b = ScrambleGenerator::with_seed(42).generate(25);
    assert_eq!(a, b);
}

#[test]
fn test_parse_round_trips_generated_scramble() {
    let scramble = ScrambleGenerator::with_seed(7).generate(30);
    let moves = parse_moves(&scramble).unwrap();
    assert_eq!(moves.len(), 30);
    assert_eq!(format_moves(&moves), scramble);
}

#[test]
fn test_parse_moves_tokens() {
    let moves = parse_moves("R U' F2").unwrap();
    assert_eq!(
        moves,
        vec![
            Move::new(Face::R, Turn::Clockwise),
            Move::new(Face::U, Turn::CounterClockwise),
            Move::new(Face::F, Turn::Double),
        ]
    );
    assert!(parse_moves("R x").is_err());
    assert!(parse_moves("R2'").is_err());
    assert!(parse_moves("r").is_err());
    assert!(parse_moves("  ").unwrap().is_empty());
}

proptest! {
    #[test]
    fn prop_no_consecutive_same_face(seed in any::<u64>(), length in 0usize..120) {
        let moves = ScrambleGenerator::with_seed(seed).generate_moves(length);
        prop_assert_eq!(moves.len(), length);
        for pair in moves.windows(2) {
            prop_assert_ne!(pair[0].face, pair[1].face);
        }
    }

    #[test]
    fn prop_tokens_match_move_grammar(seed in any::<u64>()) {
        let scramble = ScrambleGenerator::with_seed(seed).generate(20);
        for token in scramble.split(' ') {
            let mut chars = token.chars();
            let face = chars.next().unwrap();
            prop_assert!("URFDLB".contains(face));
            let suffix: String = chars.collect();
            prop_assert!(suffix.is_empty() || suffix == "'" || suffix == "2");
        }
    }
}
