//! CubeStateCodec: syntactic validation and color-layout encoding
//!
//! Both entry points end in `validate`, so every `CanonicalCubeString`
//! has passed the same checks:
//! - exactly 54 symbols
//! - every symbol in URFDLB
//! - every symbol exactly 9 times
//!
//! Whether the permutation is physically reachable is not checked here.

use std::collections::HashMap;
use crate::{CUBE_STICKERS, FACE_STICKERS};
use crate::types::{CanonicalCubeString, Color, Face, FaceLayout, ValidationError, FACE_ORDER};

/// Cube state validator / converter
#[derive(Debug, Default)]
pub struct CubeStateCodec;

impl CubeStateCodec {
    pub fn new() -> Self {
        Self
    }

    /// Validate a raw solver-input string, returning it unchanged on success
    pub fn validate(&self, raw: &str) -> Result<CanonicalCubeString, ValidationError> {
        let found = raw.chars().count();
        if found != CUBE_STICKERS {
            return Err(ValidationError::Length { expected: CUBE_STICKERS, found });
        }

        let mut counts = [0usize; 6];
        for (position, symbol) in raw.chars().enumerate() {
            let face = Face::from_symbol(symbol)
                .ok_or(ValidationError::Alphabet { symbol, position })?;
            counts[face.index()] += 1;
        }

        // Report the first face (canonical order) whose count is off
        for face in FACE_ORDER {
            let count = counts[face.index()];
            if count != FACE_STICKERS {
                return Err(ValidationError::ColorCount { symbol: face.symbol(), count });
            }
        }

        Ok(CanonicalCubeString::new_unchecked(raw.to_string()))
    }

    /// Encode a color-keyed face layout into the canonical string.
    ///
    /// Keys are the face (center) colors; each value is that face's 9 sticker
    /// colors in reading order. Each face appears once (keys compare
    /// case-insensitively). Faces are emitted in URFDLB order.
    pub fn encode(&self, layout: &FaceLayout) -> Result<CanonicalCubeString, ValidationError> {
        let mut faces: HashMap<Face, &Vec<String>> = HashMap::with_capacity(layout.len());
        for (key, stickers) in layout {
            let color: Color = key.parse()?;
            if faces.insert(color.face(), stickers).is_some() {
                return Err(ValidationError::DuplicateFace { face: key.clone() });
            }
        }

        let mut raw = String::with_capacity(CUBE_STICKERS);
        for face in FACE_ORDER {
            let name = face.color().name();
            let stickers = faces
                .get(&face)
                .ok_or_else(|| ValidationError::MissingFace { face: name.to_string() })?;

            if stickers.len() != FACE_STICKERS {
                return Err(ValidationError::StickerCount {
                    face: name.to_string(),
                    found: stickers.len(),
                });
            }

            for sticker in stickers.iter() {
                let color: Color = sticker.parse()?;
                raw.push(color.face().symbol());
            }
        }

        self.validate(&raw)
    }
}

// =============================================================================
// TESTS
// =============================================================================
