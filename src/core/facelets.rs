//! Facelet reachability check
//!
//! Converts a canonical cube string into cubie form (which corner / edge
//! sits where, and how it is twisted) and checks the group invariants a
//! physically reachable cube must satisfy:
//! - centers in place
//! - every corner and edge present exactly once
//! - corner twist sum ≡ 0 (mod 3), edge flip sum ≡ 0 (mod 2)
//! - corner and edge permutation parity equal

use crate::types::{CanonicalCubeString, Face, OracleError};

/// Facelet indices of each corner position, U/D sticker first then clockwise
const CORNER_FACELETS: [[usize; 3]; 8] = [
    [8, 9, 20],   // URF
    [6, 18, 38],  // UFL
    [0, 36, 47],  // ULB
    [2, 45, 11],  // UBR
    [29, 26, 15], // DFR
    [27, 44, 24], // DLF
    [33, 53, 42], // DBL
    [35, 17, 51], // DRB
];

/// Colors of each corner cubie in the same sticker order
const CORNER_COLORS: [[Face; 3]; 8] = [
    [Face::U, Face::R, Face::F],
    [Face::U, Face::F, Face::L],
    [Face::U, Face::L, Face::B],
    [Face::U, Face::B, Face::R],
    [Face::D, Face::F, Face::R],
    [Face::D, Face::L, Face::F],
    [Face::D, Face::B, Face::L],
    [Face::D, Face::R, Face::B],
];

const EDGE_FACELETS: [[usize; 2]; 12] = [
    [5, 10],  // UR
    [7, 19],  // UF
    [3, 37],  // UL
    [1, 46],  // UB
    [32, 16], // DR
    [28, 25], // DF
    [30, 43], // DL
    [34, 52], // DB
    [23, 12], // FR
    [21, 41], // FL
    [50, 39], // BL
    [48, 14], // BR
];

const EDGE_COLORS: [[Face; 2]; 12] = [
    [Face::U, Face::R],
    [Face::U, Face::F],
    [Face::U, Face::L],
    [Face::U, Face::B],
    [Face::D, Face::R],
    [Face::D, Face::F],
    [Face::D, Face::L],
    [Face::D, Face::B],
    [Face::F, Face::R],
    [Face::F, Face::L],
    [Face::B, Face::L],
    [Face::B, Face::R],
];

/// Facelet index of each face's center
const CENTERS: [(usize, Face); 6] = [
    (4, Face::U),
    (13, Face::R),
    (22, Face::F),
    (31, Face::D),
    (40, Face::L),
    (49, Face::B),
];

/// Cube in cubie form: permutation + orientation of corners and edges
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CubieCube {
    pub corner_perm: [usize; 8],
    pub corner_twist: [u8; 8],
    pub edge_perm: [usize; 12],
    pub edge_flip: [u8; 12],
}

impl CubieCube {
    /// Identify every corner and edge from its stickers.
    ///
    /// Fails when a sticker combination matches no real cubie.
    pub fn from_facelets(cube: &CanonicalCubeString) -> Result<Self, String> {
        let f = cube.facelets();

        for (index, face) in CENTERS {
            if f[index] != face {
                return Err(format!("center of face {} shows {}", face, f[index]));
            }
        }

        let mut corner_perm = [0usize; 8];
        let mut corner_twist = [0u8; 8];
        for (pos, facelets) in CORNER_FACELETS.iter().enumerate() {
            let twist = (0..3)
                .find(|&o| matches!(f[facelets[o]], Face::U | Face::D))
                .ok_or_else(|| format!("corner at position {} has no U/D sticker", pos))?;
            let col1 = f[facelets[(twist + 1) % 3]];
            let col2 = f[facelets[(twist + 2) % 3]];
            let cubie = CORNER_COLORS
                .iter()
                .position(|c| c[1] == col1 && c[2] == col2)
                .ok_or_else(|| format!("corner at position {} has impossible colors", pos))?;
            corner_perm[pos] = cubie;
            corner_twist[pos] = twist as u8;
        }

        let mut edge_perm = [0usize; 12];
        let mut edge_flip = [0u8; 12];
        for (pos, facelets) in EDGE_FACELETS.iter().enumerate() {
            let a = f[facelets[0]];
            let b = f[facelets[1]];
            let (cubie, flip) = EDGE_COLORS
                .iter()
                .enumerate()
                .find_map(|(j, c)| {
                    if c[0] == a && c[1] == b {
                        Some((j, 0))
                    } else if c[0] == b && c[1] == a {
                        Some((j, 1))
                    } else {
                        None
                    }
                })
                .ok_or_else(|| format!("edge at position {} has impossible colors", pos))?;
            edge_perm[pos] = cubie;
            edge_flip[pos] = flip;
        }

        Ok(Self {
            corner_perm,
            corner_twist,
            edge_perm,
            edge_flip,
        })
    }

    /// Check the reachability invariants
    pub fn verify(&self) -> Result<(), String> {
        if !is_permutation(&self.corner_perm) {
            return Err("a corner appears more than once".to_string());
        }
        if !is_permutation(&self.edge_perm) {
            return Err("an edge appears more than once".to_string());
        }

        let twist: u32 = self.corner_twist.iter().map(|&t| t as u32).sum();
        if twist % 3 != 0 {
            return Err("a corner is twisted".to_string());
        }

        let flip: u32 = self.edge_flip.iter().map(|&e| e as u32).sum();
        if flip % 2 != 0 {
            return Err("an edge is flipped".to_string());
        }

        if parity(&self.corner_perm) != parity(&self.edge_perm) {
            return Err("two pieces are swapped".to_string());
        }

        Ok(())
    }
}

/// Check that a syntactically valid cube is a reachable position
pub fn verify_reachable(cube: &CanonicalCubeString) -> Result<(), OracleError> {
    CubieCube::from_facelets(cube)
        .and_then(|cubies| cubies.verify())
        .map_err(OracleError::Unsolvable)
}

fn is_permutation(perm: &[usize]) -> bool {
    let mut seen = vec![false; perm.len()];
    for &p in perm {
        if p >= perm.len() || seen[p] {
            return false;
        }
        seen[p] = true;
    }
    true
}

/// Permutation parity (true = odd), by counting inversions
fn parity(perm: &[usize]) -> bool {
    let mut inversions = 0;
    for i in 0..perm.len() {
        for j in i + 1..perm.len() {
            if perm[i] > perm[j] {
                inversions += 1;
            }
        }
    }
    inversions % 2 == 1
}

// =============================================================================
// TESTS
// =============================================================================
