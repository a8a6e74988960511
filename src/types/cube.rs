//! Cube faces, sticker colors, moves and the canonical 54-symbol cube string

use std::collections::BTreeMap;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::{CUBE_STICKERS, FACE_STICKERS};
use crate::types::ValidationError;

/// Face order of the canonical string: Up, Right, Front, Down, Left, Back
pub const FACE_ORDER: [Face; 6] = [Face::U, Face::R, Face::F, Face::D, Face::L, Face::B];

/// A face of the cube, named by its canonical symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Face {
    U,
    R,
    F,
    D,
    L,
    B,
}

impl Face {
    pub fn symbol(&self) -> char {
        match self {
            Face::U => 'U',
            Face::R => 'R',
            Face::F => 'F',
            Face::D => 'D',
            Face::L => 'L',
            Face::B => 'B',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Face> {
        match symbol {
            'U' => Some(Face::U),
            'R' => Some(Face::R),
            'F' => Some(Face::F),
            'D' => Some(Face::D),
            'L' => Some(Face::L),
            'B' => Some(Face::B),
            _ => None,
        }
    }

    /// Position of this face's block in the canonical string
    pub fn index(&self) -> usize {
        match self {
            Face::U => 0,
            Face::R => 1,
            Face::F => 2,
            Face::D => 3,
            Face::L => 4,
            Face::B => 5,
        }
    }

    /// Center color under the standard color scheme
    pub fn color(&self) -> Color {
        match self {
            Face::U => Color::Yellow,
            Face::R => Color::Red,
            Face::F => Color::Blue,
            Face::D => Color::White,
            Face::L => Color::Orange,
            Face::B => Color::Green,
        }
    }
}

impl std::fmt::Display for Face {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Sticker color as entered by a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Yellow,
    Red,
    Blue,
    White,
    Orange,
    Green,
}

impl Color {
    pub fn name(&self) -> &'static str {
        match self {
            Color::Yellow => "yellow",
            Color::Red => "red",
            Color::Blue => "blue",
            Color::White => "white",
            Color::Orange => "orange",
            Color::Green => "green",
        }
    }

    /// Face symbol this color maps to (fixed bijection)
    pub fn face(&self) -> Face {
        match self {
            Color::Yellow => Face::U,
            Color::Red => Face::R,
            Color::Blue => Face::F,
            Color::White => Face::D,
            Color::Orange => Face::L,
            Color::Green => Face::B,
        }
    }
}

impl FromStr for Color {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yellow" => Ok(Color::Yellow),
            "red" => Ok(Color::Red),
            "blue" => Ok(Color::Blue),
            "white" => Ok(Color::White),
            "orange" => Ok(Color::Orange),
            "green" => Ok(Color::Green),
            _ => Err(ValidationError::UnknownColor { color: s.to_string() }),
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Color-keyed face layout: face color -> its 9 sticker colors in reading order
pub type FaceLayout = BTreeMap<String, Vec<String>>;

/// A syntactically valid 54-symbol cube string.
///
/// Only `CubeStateCodec` constructs these, so holding one means length,
/// alphabet and per-symbol counts have been checked. Reachability has not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CanonicalCubeString(String);

impl CanonicalCubeString {
    pub(crate) fn new_unchecked(raw: String) -> Self {
        Self(raw)
    }

    /// The solved state: U×9 R×9 F×9 D×9 L×9 B×9
    pub fn solved() -> Self {
        let raw: String = FACE_ORDER
            .iter()
            .flat_map(|face| std::iter::repeat(face.symbol()).take(FACE_STICKERS))
            .collect();
        debug_assert_eq!(raw.len(), CUBE_STICKERS);
        Self(raw)
    }

    pub fn is_solved(&self) -> bool {
        *self == Self::solved()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Faces of all 54 facelets in canonical order
    pub fn facelets(&self) -> Vec<Face> {
        self.0.chars().filter_map(Face::from_symbol).collect()
    }

    /// The 9 symbols of one face
    pub fn face(&self, face: Face) -> &str {
        let start = face.index() * FACE_STICKERS;
        &self.0[start..start + FACE_STICKERS]
    }
}

impl std::fmt::Display for CanonicalCubeString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for CanonicalCubeString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Turn amount of a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Turn {
    Clockwise,
    CounterClockwise,
    Double,
}

impl Turn {
    pub fn suffix(&self) -> &'static str {
        match self {
            Turn::Clockwise => "",
            Turn::CounterClockwise => "'",
            Turn::Double => "2",
        }
    }
}

/// One face turn, e.g. `R'`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub face: Face,
    pub turn: Turn,
}

impl Move {
    pub fn new(face: Face, turn: Turn) -> Self {
        Self { face, turn }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.face, self.turn.suffix())
    }
}
