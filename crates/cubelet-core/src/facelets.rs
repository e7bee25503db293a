//! Facelet state: the 54 stickers of the puzzle as an immutable value.
//!
//! Faces are stored in `Face::ALL` order, each as a 3×3 grid indexed
//! `[row][col]` in the face's own reading orientation (see crate docs).

use crate::color::{Color, Face};
use crate::error::{Error, Result};
use crate::FACE_SIZE;

/// One face: `[row][col]`.
pub type FaceGrid = [[Color; FACE_SIZE]; FACE_SIZE];

/// Rotate a 3×3 grid a quarter turn clockwise.
///
/// Cell `(i, j)` moves to `(j, 2 - i)`.
pub fn rotate_face_clockwise<T: Copy>(grid: [[T; 3]; 3]) -> [[T; 3]; 3] {
    let mut out = grid;
    for (i, row) in grid.iter().enumerate() {
        for (j, &cell) in row.iter().enumerate() {
            out[j][2 - i] = cell;
        }
    }
    out
}

/// Complete sticker assignment of the puzzle.
///
/// This is a plain `Copy` value. Moves return a new state instead of
/// mutating, so a rejected candidate never touches a committed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FaceletState {
    faces: [FaceGrid; 6],
}

impl FaceletState {
    /// The solved configuration: every face uniform in its home color.
    pub const fn solved() -> Self {
        const fn uniform(color: Color) -> FaceGrid {
            [[color; FACE_SIZE]; FACE_SIZE]
        }
        Self {
            faces: [
                uniform(Color::White),
                uniform(Color::Yellow),
                uniform(Color::Orange),
                uniform(Color::Red),
                uniform(Color::Green),
                uniform(Color::Blue),
            ],
        }
    }

    /// Build a state from raw faces in `Face::ALL` order.
    ///
    /// No validation is done here; see [`crate::check_state`].
    pub const fn from_faces(faces: [FaceGrid; 6]) -> Self {
        Self { faces }
    }

    /// All faces in `Face::ALL` order.
    pub const fn faces(&self) -> &[FaceGrid; 6] {
        &self.faces
    }

    /// The 3×3 grid of one face.
    #[inline]
    pub const fn face(&self, face: Face) -> &FaceGrid {
        &self.faces[face.index()]
    }

    /// Color of a single facelet.
    pub fn get(&self, face: Face, row: usize, col: usize) -> Result<Color> {
        if row >= FACE_SIZE || col >= FACE_SIZE {
            return Err(Error::InvalidCell { row, col });
        }
        Ok(self.faces[face.index()][row][col])
    }

    /// Return a copy with one face replaced.
    pub fn with_face(mut self, face: Face, grid: FaceGrid) -> Self {
        self.faces[face.index()] = grid;
        self
    }

    /// Return a copy with one facelet recolored.
    pub fn with_facelet(
        mut self,
        face: Face,
        row: usize,
        col: usize,
        color: Color,
    ) -> Result<Self> {
        if row >= FACE_SIZE || col >= FACE_SIZE {
            return Err(Error::InvalidCell { row, col });
        }
        self.faces[face.index()][row][col] = color;
        Ok(self)
    }

    /// Iterate over every facelet as `(face, row, col, color)`.
    pub fn iter(&self) -> impl Iterator<Item = (Face, usize, usize, Color)> + '_ {
        Face::ALL.into_iter().flat_map(move |face| {
            let grid = self.face(face);
            (0..FACE_SIZE).flat_map(move |row| {
                (0..FACE_SIZE).map(move |col| (face, row, col, grid[row][col]))
            })
        })
    }

    /// Occurrences of each color, indexed by [`Color::index`].
    pub fn color_counts(&self) -> [usize; 6] {
        let mut counts = [0usize; 6];
        for (_, _, _, color) in self.iter() {
            counts[color.index()] += 1;
        }
        counts
    }

    /// True if every face is a single uniform color.
    ///
    /// The center color is the reference, so a whole-puzzle reorientation
    /// still counts as solved.
    pub fn is_solved(&self) -> bool {
        self.faces.iter().all(|grid| {
            let center = grid[1][1];
            grid.iter().flatten().all(|&c| c == center)
        })
    }

    /// Number of facelets whose color differs from `other`.
    pub fn distance(&self, other: &Self) -> usize {
        self.iter()
            .zip(other.iter())
            .filter(|(a, b)| a.3 != b.3)
            .count()
    }
}

impl Default for FaceletState {
    fn default() -> Self {
        Self::solved()
    }
}

/// Unfolded net, one letter per facelet:
///
/// ```text
///     U
///   L F R B
///     D
/// ```
impl std::fmt::Display for FaceletState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let row_of = |face: Face, row: usize| -> String {
            self.face(face)[row].iter().map(|c| c.letter()).collect()
        };

        for row in 0..FACE_SIZE {
            writeln!(f, "    {}", row_of(Face::U, row))?;
        }
        for row in 0..FACE_SIZE {
            writeln!(
                f,
                "{} {} {} {}",
                row_of(Face::L, row),
                row_of(Face::F, row),
                row_of(Face::R, row),
                row_of(Face::B, row)
            )?;
        }
        for row in 0..FACE_SIZE {
            writeln!(f, "    {}", row_of(Face::D, row))?;
        }
        Ok(())
    }
}
