//! Read-only geometry for the view layer.
//!
//! The view draws 26 cubies on a 3×3×3 grid with each axis in `{-1, 0, 1}`.
//! This module maps a cubie's exposed side to the facelet that colors it.
//! Nothing here mutates puzzle state.
//!
//! | Face     | row   | col   |
//! |----------|-------|-------|
//! | U (y=+1) | z + 1 | x + 1 |
//! | D (y=-1) | 1 - z | x + 1 |
//! | F (z=+1) | 1 - y | x + 1 |
//! | B (z=-1) | 1 - y | 1 - x |
//! | R (x=+1) | 1 - y | 1 - z |
//! | L (x=-1) | 1 - y | z + 1 |

use crate::color::{Color, Face};
use crate::facelets::FaceletState;

/// A cubie's position on the 3×3×3 grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CubiePos {
    pub x: i8,
    pub y: i8,
    pub z: i8,
}

impl CubiePos {
    /// The hidden core cubie.
    pub const CORE: Self = Self { x: 0, y: 0, z: 0 };

    pub const fn new(x: i8, y: i8, z: i8) -> Self {
        Self { x, y, z }
    }

    /// True if every axis is in `{-1, 0, 1}`.
    pub const fn is_on_grid(&self) -> bool {
        matches!(self.x, -1..=1) && matches!(self.y, -1..=1) && matches!(self.z, -1..=1)
    }

    /// All 27 grid positions, x-major.
    pub fn all() -> impl Iterator<Item = Self> {
        (-1..=1).flat_map(|x| (-1..=1).flat_map(move |y| (-1..=1).map(move |z| Self::new(x, y, z))))
    }

    /// Component along a face normal: 1 if the cubie touches that face.
    pub const fn along(&self, face: Face) -> i8 {
        let [nx, ny, nz] = face.normal();
        self.x * nx + self.y * ny + self.z * nz
    }

    const fn as_array(self) -> [i8; 3] {
        [self.x, self.y, self.z]
    }
}

impl std::fmt::Display for CubiePos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Role of a cubie, from how many faces it touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CubieKind {
    Core,
    Center,
    Edge,
    Corner,
}

impl CubieKind {
    pub fn of(pos: CubiePos) -> Self {
        let nonzero = pos.as_array().iter().filter(|&&c| c != 0).count();
        match nonzero {
            0 => Self::Core,
            1 => Self::Center,
            2 => Self::Edge,
            _ => Self::Corner,
        }
    }

    /// Number of visible stickers on a cubie of this kind.
    pub const fn sticker_count(self) -> usize {
        match self {
            Self::Core => 0,
            Self::Center => 1,
            Self::Edge => 2,
            Self::Corner => 3,
        }
    }
}

/// Facelet cell `(row, col)` showing on side `normal` of the cubie at `pos`.
///
/// Returns `None` if `pos` is off the grid or does not touch that face.
pub fn cell_for_cubie_position(pos: CubiePos, normal: Face) -> Option<(usize, usize)> {
    if !pos.is_on_grid() || pos.along(normal) != 1 {
        return None;
    }

    let CubiePos { x, y, z } = pos;
    let (row, col) = match normal {
        Face::U => (z + 1, x + 1),
        Face::D => (1 - z, x + 1),
        Face::F => (1 - y, x + 1),
        Face::B => (1 - y, 1 - x),
        Face::R => (1 - y, 1 - z),
        Face::L => (1 - y, z + 1),
    };
    Some((row as usize, col as usize))
}

/// Inverse of [`cell_for_cubie_position`]: the cubie carrying a facelet.
pub fn facelet_position(face: Face, row: usize, col: usize) -> Option<CubiePos> {
    if row > 2 || col > 2 {
        return None;
    }
    let (r, c) = (row as i8, col as i8);
    let pos = match face {
        Face::U => CubiePos::new(c - 1, 1, r - 1),
        Face::D => CubiePos::new(c - 1, -1, 1 - r),
        Face::F => CubiePos::new(c - 1, 1 - r, 1),
        Face::B => CubiePos::new(1 - c, 1 - r, -1),
        Face::R => CubiePos::new(1, 1 - r, 1 - c),
        Face::L => CubiePos::new(-1, 1 - r, c - 1),
    };
    Some(pos)
}

/// Side order of a box mesh: right, left, top, bottom, front, back.
pub const BOX_SIDES: [Face; 6] = [Face::R, Face::L, Face::U, Face::D, Face::F, Face::B];

/// Sticker colors of one cubie in [`BOX_SIDES`] order; `None` for hidden sides.
pub fn cubie_colors(state: &FaceletState, pos: CubiePos) -> [Option<Color>; 6] {
    BOX_SIDES.map(|side| {
        cell_for_cubie_position(pos, side).map(|(row, col)| state.face(side)[row][col])
    })
}

/// A visible cubie with its sticker colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cubie {
    pub pos: CubiePos,
    pub kind: CubieKind,
    /// Colors in [`BOX_SIDES`] order
    pub sides: [Option<Color>; 6],
}

/// All 26 visible cubies of `state`.
pub fn cubies(state: &FaceletState) -> Vec<Cubie> {
    CubiePos::all()
        .filter(|&pos| pos != CubiePos::CORE)
        .map(|pos| Cubie {
            pos,
            kind: CubieKind::of(pos),
            sides: cubie_colors(state, pos),
        })
        .collect()
}
