//! Integration tests for Slice 2 - Cube state codec and solve flow
//!
//! Tests validation, layout encoding and the oracle boundary

use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use speedlog::core::{solve, verify_reachable, CubeStateCodec, OfflineOracle, SolveRequest, SolvingOracle};
use speedlog::types::{
    CanonicalCubeString, FaceLayout, OracleError, SolveError, ValidationError, FACE_ORDER,
};

const SOLVED: &str = "UUUUUUUUURRRRRRRRRFFFFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBBB";
/// Solved cube after a single U turn
const AFTER_U: &str = "UUUUUUUUUBBBRRRRRRRRRFFFFFFDDDDDDDDDFFFLLLLLLLLLBBBBBB";

/// Oracle that returns a fixed answer and counts calls
struct FixedOracle {
    answer: Result<String, OracleError>,
    calls: AtomicUsize,
}

impl FixedOracle {
    fn new(answer: Result<&str, OracleError>) -> Arc<Self> {
        Arc::new(Self {
            answer: answer.map(str::to_string),
            calls: AtomicUsize::new(0),
        })
    }
}

impl SolvingOracle for FixedOracle {
    fn name(&self) -> &str {
        "fixed"
    }

    fn solve(&self, _cube: &CanonicalCubeString) -> Result<String, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.clone()
    }
}

struct SlowOracle;

impl SolvingOracle for SlowOracle {
    fn name(&self) -> &str {
        "slow"
    }

    fn solve(&self, _cube: &CanonicalCubeString) -> Result<String, OracleError> {
        std::thread::sleep(Duration::from_millis(500));
        Ok("U'".to_string())
    }
}

struct PanickingOracle;

impl SolvingOracle for PanickingOracle {
    fn name(&self) -> &str {
        "panicking"
    }

    fn solve(&self, _cube: &CanonicalCubeString) -> Result<String, OracleError> {
        panic!("solver blew up")
    }
}

fn swap(cube: &str, a: usize, b: usize) -> String {
    let mut chars: Vec<char> = cube.chars().collect();
    chars.swap(a, b);
    chars.into_iter().collect()
}

fn solved_layout() -> FaceLayout {
    FACE_ORDER
        .iter()
        .map(|face| {
            let name = face.color().name().to_string();
            (name.clone(), vec![name; 9])
        })
        .collect()
}

const TIMEOUT: Duration = Duration::from_secs(2);

// =============================================================================
// CODEC
// =============================================================================

#[test]
fn test_validate_rejects_wrong_length() {
    let codec = CubeStateCodec::new();
    let err = codec.validate(&SOLVED[..53]).unwrap_err();
    assert_eq!(err, ValidationError::Length { expected: 54, found: 53 });
    assert_eq!(err.kind(), "length");
}

#[test]
fn test_validate_rejects_foreign_symbol() {
    let mut cube = SOLVED.to_string();
    cube.replace_range(10..11, "X");
    let err = CubeStateCodec::new().validate(&cube).unwrap_err();
    assert_eq!(err, ValidationError::Alphabet { symbol: 'X', position: 10 });
}

#[test]
fn test_validate_rejects_color_imbalance() {
    // One R sticker repainted U: U appears 10 times, R 8
    let mut cube = SOLVED.to_string();
    cube.replace_range(9..10, "U");
    let err = CubeStateCodec::new().validate(&cube).unwrap_err();
    assert_eq!(err, ValidationError::ColorCount { symbol: 'U', count: 10 });
}

#[test]
fn test_validate_passes_syntactically_valid_but_unreachable() {
    let swapped = swap(SOLVED, 8, 9);
    let cube = CubeStateCodec::new().validate(&swapped).unwrap();
    assert_eq!(cube.as_str(), swapped);
    assert!(verify_reachable(&cube).is_err());
}

#[test]
fn test_encode_layout_in_canonical_order() {
    let codec = CubeStateCodec::new();
    let cube = codec.encode(&solved_layout()).unwrap();
    assert_eq!(cube.as_str(), SOLVED);
    assert!(cube.is_solved());
}

#[test]
fn test_encode_maps_sticker_colors_to_face_symbols() {
    let mut layout = solved_layout();
    // Trade one sticker between the yellow (U) and red (R) faces
    layout.get_mut("yellow").unwrap()[8] = "Red".to_string();
    layout.get_mut("red").unwrap()[0] = " YELLOW ".to_string();

    let cube = CubeStateCodec::new().encode(&layout).unwrap();
    assert_eq!(cube.as_str(), swap(SOLVED, 8, 9));
}

#[test]
fn test_encode_rejects_unknown_and_missing() {
    let codec = CubeStateCodec::new();

    let mut layout = solved_layout();
    layout.get_mut("blue").unwrap()[4] = "purple".to_string();
    assert_eq!(
        codec.encode(&layout).unwrap_err(),
        ValidationError::UnknownColor { color: "purple".to_string() }
    );

    let mut layout = solved_layout();
    layout.remove("green");
    assert_eq!(
        codec.encode(&layout).unwrap_err(),
        ValidationError::MissingFace { face: "green".to_string() }
    );
}

// =============================================================================
// SOLVE FLOW
// =============================================================================

#[tokio::test]
async fn test_solved_cube_short_circuits() {
    let oracle = FixedOracle::new(Ok("R"));
    let result = solve(
        &SolveRequest::Facelets(SOLVED.to_string()),
        &CubeStateCodec::new(),
        oracle.clone(),
        TIMEOUT,
    )
    .await;

    assert_eq!(result, Err(SolveError::Oracle(OracleError::AlreadySolved)));
    assert_eq!(oracle.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_scrambled_cube_returns_solution() {
    let oracle = FixedOracle::new(Ok(" U'\n"));
    let outcome = solve(
        &SolveRequest::Facelets(AFTER_U.to_string()),
        &CubeStateCodec::new(),
        oracle.clone(),
        TIMEOUT,
    )
    .await
    .unwrap();

    assert_eq!(outcome.solution, "U'");
    assert_eq!(outcome.move_count, 1);
    assert_eq!(oracle.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_invalid_cube_never_reaches_oracle() {
    let oracle = FixedOracle::new(Ok("R"));
    let result = solve(
        &SolveRequest::Facelets("UUU".to_string()),
        &CubeStateCodec::new(),
        oracle.clone(),
        TIMEOUT,
    )
    .await;

    assert!(matches!(result, Err(SolveError::Validation(ValidationError::Length { .. }))));
    assert_eq!(oracle.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_swapped_stickers_are_unsolvable() {
    let result = solve(
        &SolveRequest::Facelets(swap(SOLVED, 8, 9)),
        &CubeStateCodec::new(),
        Arc::new(OfflineOracle),
        TIMEOUT,
    )
    .await;

    assert!(matches!(result, Err(SolveError::Oracle(OracleError::Unsolvable(_)))));
}

#[tokio::test]
async fn test_oracle_garbage_is_malformed() {
    let oracle = FixedOracle::new(Ok("Error: no solution"));
    let result = solve(
        &SolveRequest::Facelets(AFTER_U.to_string()),
        &CubeStateCodec::new(),
        oracle,
        TIMEOUT,
    )
    .await;

    assert!(matches!(result, Err(SolveError::Oracle(OracleError::Malformed(_)))));
}

#[tokio::test]
async fn test_oracle_timeout_is_unavailable() {
    let result = solve(
        &SolveRequest::Facelets(AFTER_U.to_string()),
        &CubeStateCodec::new(),
        Arc::new(SlowOracle),
        Duration::from_millis(20),
    )
    .await;

    match result {
        Err(SolveError::Oracle(OracleError::Unavailable(reason))) => {
            assert!(reason.contains("timed out"));
        }
        other => panic!("expected timeout, got {:?}", other),
    }
}

#[tokio::test]
async fn test_oracle_panic_is_unavailable() {
    let result = solve(
        &SolveRequest::Facelets(AFTER_U.to_string()),
        &CubeStateCodec::new(),
        Arc::new(PanickingOracle),
        TIMEOUT,
    )
    .await;

    assert_eq!(
        result,
        Err(SolveError::Oracle(OracleError::Unavailable("solver crashed".to_string())))
    );
}

#[tokio::test]
async fn test_oracle_outcomes_stay_distinct() {
    let codec = CubeStateCodec::new();
    let request = SolveRequest::Facelets(AFTER_U.to_string());

    let unsolvable = FixedOracle::new(Err(OracleError::Unsolvable("parity".to_string())));
    let err = solve(&request, &codec, unsolvable, TIMEOUT).await.unwrap_err();
    match err {
        SolveError::Oracle(e) => assert_eq!(e.kind(), "unsolvable"),
        other => panic!("unexpected {:?}", other),
    }

    let solved = solve(&SolveRequest::Layout(solved_layout()), &codec, Arc::new(OfflineOracle), TIMEOUT)
        .await
        .unwrap_err();
    match solved {
        SolveError::Oracle(e) => assert_eq!(e.kind(), "already_solved"),
        other => panic!("unexpected {:?}", other),
    }
}
