//! Cubelet Puzzle Engine
//!
//! Facelet model and move algebra for a 3×3×3 twisty puzzle.
//!
//! # Facelet Model
//!
//! The puzzle surface is 6 faces of 3×3 stickers, 54 facelets in total.
//! Every face is read as seen from outside the puzzle, row 0 on top:
//! - Side faces (F, R, B, L) have U above them
//! - U has B above it, D has F above it
//!
//! World axes are +x toward R, +y toward U, +z toward F.
//!
//! # Move Algebra
//!
//! Each of the 12 moves is a bijection on the 54 facelets: a face rotation
//! plus a 4-cycle of the adjacent edge strips. Counter-clockwise turns are
//! three clockwise turns, so every move and its inverse cancel exactly.
//!
//! # Validity
//!
//! A committed state holds each of the 6 colors exactly 9 times. Moves can
//! only relabel facelets, so they never break this on their own.

mod color;
mod error;
mod facelets;
mod moves;
mod render;
mod scramble;
mod validate;

pub use color::{Color, Face};
pub use error::{Error, Result};
pub use facelets::{rotate_face_clockwise, FaceGrid, FaceletState};
pub use moves::{apply_sequence, invert_sequence, parse_sequence, Direction, Move};
pub use render::{
    cell_for_cubie_position, cubie_colors, cubies, facelet_position, Cubie, CubieKind, CubiePos,
    BOX_SIDES,
};
pub use scramble::{scramble, Scramble, ScrambleConfig};
pub use validate::{check_state, is_valid_state, ColorCounts, InvalidState};

/// Number of faces on the puzzle.
pub const FACES: usize = 6;

/// Edge length of a face in facelets.
pub const FACE_SIZE: usize = 3;

/// Facelets per face.
pub const FACELETS_PER_FACE: usize = FACE_SIZE * FACE_SIZE;

/// Total facelets on the puzzle surface.
pub const TOTAL_FACELETS: usize = 54;

/// Occurrences of each color in any valid state.
pub const STICKERS_PER_COLOR: usize = FACELETS_PER_FACE;

// Compile-time assertion of the 54-facelet surface
const _: () = assert!(FACES * FACELETS_PER_FACE == TOTAL_FACELETS);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facelet_count_invariant() {
        assert_eq!(FACES * FACELETS_PER_FACE, TOTAL_FACELETS);
        assert_eq!(STICKERS_PER_COLOR * Color::ALL.len(), TOTAL_FACELETS);
    }

    #[test]
    fn commutator_undone_by_reverse_sequence() {
        let solved = FaceletState::solved();
        let forward = parse_sequence("R U R' U'").unwrap();
        let scrambled = apply_sequence(solved, &forward);

        assert!(is_valid_state(&scrambled));
        assert_ne!(scrambled, solved);

        let back = parse_sequence("U R U' R'").unwrap();
        assert_eq!(apply_sequence(scrambled, &back), solved);
    }
}
