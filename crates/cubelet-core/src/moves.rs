//! The 12 quarter-turn moves and their composition.
//!
//! A clockwise turn of face X (as seen looking at X) does two things:
//! 1. Rotates X's own grid with [`rotate_face_clockwise`]
//! 2. Cycles the four 3-facelet strips bordering X on its neighbors
//!
//! Neighboring faces do not share reading directions along every edge, so
//! some strips are walked back to front. The table in [`edge_cycle`] is laid
//! out so position `t` of one strip always lands on position `t` of the next.
//!
//! Counter-clockwise turns are three clockwise turns. There is no separately
//! derived inverse table to drift out of sync.

use std::str::FromStr;

use crate::color::Face;
use crate::error::{Error, Result};
use crate::facelets::{rotate_face_clockwise, FaceletState};

/// A full puzzle surface of arbitrary labels, in `Face::ALL` order.
pub(crate) type Surface<T> = [[[T; 3]; 3]; 6];

/// Row or column of a face grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line {
    Row(usize),
    Col(usize),
}

/// A 3-facelet strip along one edge of a face.
#[derive(Debug, Clone, Copy)]
struct Strip {
    face: Face,
    line: Line,
    reversed: bool,
}

impl Strip {
    const fn new(face: Face, line: Line) -> Self {
        Self { face, line, reversed: false }
    }

    const fn rev(face: Face, line: Line) -> Self {
        Self { face, line, reversed: true }
    }

    /// Grid cell at position `t` (0..3) along the strip.
    #[inline]
    const fn cell(self, t: usize) -> (usize, usize) {
        let k = if self.reversed { 2 - t } else { t };
        match self.line {
            Line::Row(r) => (r, k),
            Line::Col(c) => (k, c),
        }
    }
}

/// Neighbor strips of each face, in the order stickers travel on a
/// clockwise turn: strip `k` moves onto strip `k + 1`.
const fn edge_cycle(face: Face) -> [Strip; 4] {
    use Face::{B, D, F, L, R, U};
    use Line::{Col, Row};

    match face {
        U => [
            Strip::new(F, Row(0)),
            Strip::new(L, Row(0)),
            Strip::new(B, Row(0)),
            Strip::new(R, Row(0)),
        ],
        D => [
            Strip::new(F, Row(2)),
            Strip::new(R, Row(2)),
            Strip::new(B, Row(2)),
            Strip::new(L, Row(2)),
        ],
        R => [
            Strip::new(F, Col(2)),
            Strip::new(U, Col(2)),
            Strip::rev(B, Col(0)),
            Strip::new(D, Col(2)),
        ],
        L => [
            Strip::new(U, Col(0)),
            Strip::new(F, Col(0)),
            Strip::new(D, Col(0)),
            Strip::rev(B, Col(2)),
        ],
        F => [
            Strip::new(U, Row(2)),
            Strip::new(R, Col(0)),
            Strip::rev(D, Row(0)),
            Strip::rev(L, Col(2)),
        ],
        B => [
            Strip::new(U, Row(0)),
            Strip::rev(L, Col(0)),
            Strip::rev(D, Row(2)),
            Strip::new(R, Col(2)),
        ],
    }
}

/// One clockwise quarter turn of `face` over any labeling of the surface.
///
/// Every output cell is read from exactly one input cell, so this is a
/// permutation of the 54 positions regardless of what the labels are.
pub(crate) fn turn_clockwise<T: Copy>(surface: &Surface<T>, face: Face) -> Surface<T> {
    let mut out = *surface;
    out[face.index()] = rotate_face_clockwise(surface[face.index()]);

    let cycle = edge_cycle(face);
    for k in 0..cycle.len() {
        let from = cycle[k];
        let to = cycle[(k + 1) % cycle.len()];
        for t in 0..3 {
            let (fr, fc) = from.cell(t);
            let (tr, tc) = to.cell(t);
            out[to.face.index()][tr][tc] = surface[from.face.index()][fr][fc];
        }
    }
    out
}

/// Apply `mv` to any labeling of the surface.
pub(crate) fn turn<T: Copy>(surface: &Surface<T>, mv: Move) -> Surface<T> {
    let mut out = *surface;
    for _ in 0..mv.quarter_turns() {
        out = turn_clockwise(&out, mv.face);
    }
    out
}

/// Turn direction, as seen looking straight at the face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    pub const fn inverse(self) -> Self {
        match self {
            Self::Clockwise => Self::CounterClockwise,
            Self::CounterClockwise => Self::Clockwise,
        }
    }
}

/// A quarter turn of one face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "String", try_from = "String")
)]
pub struct Move {
    pub face: Face,
    pub direction: Direction,
}

impl Move {
    /// All 12 moves: `U U' D D' L L' R R' F F' B B'`.
    pub const ALL: [Self; 12] = [
        Self::cw(Face::U),
        Self::ccw(Face::U),
        Self::cw(Face::D),
        Self::ccw(Face::D),
        Self::cw(Face::L),
        Self::ccw(Face::L),
        Self::cw(Face::R),
        Self::ccw(Face::R),
        Self::cw(Face::F),
        Self::ccw(Face::F),
        Self::cw(Face::B),
        Self::ccw(Face::B),
    ];

    pub const fn new(face: Face, direction: Direction) -> Self {
        Self { face, direction }
    }

    /// Clockwise turn of `face`.
    pub const fn cw(face: Face) -> Self {
        Self::new(face, Direction::Clockwise)
    }

    /// Counter-clockwise (primed) turn of `face`.
    pub const fn ccw(face: Face) -> Self {
        Self::new(face, Direction::CounterClockwise)
    }

    /// The move that undoes this one.
    pub const fn inverse(self) -> Self {
        Self::new(self.face, self.direction.inverse())
    }

    pub const fn is_prime(self) -> bool {
        matches!(self.direction, Direction::CounterClockwise)
    }

    /// Clockwise quarter turns this move expands to.
    pub const fn quarter_turns(self) -> usize {
        match self.direction {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => 3,
        }
    }

    /// Apply this move, returning the new state.
    pub fn apply(self, state: FaceletState) -> FaceletState {
        FaceletState::from_faces(turn(state.faces(), self))
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_prime() {
            write!(f, "{}'", self.face)
        } else {
            write!(f, "{}", self.face)
        }
    }
}

impl FromStr for Move {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        let face = chars
            .next()
            .filter(char::is_ascii_uppercase)
            .and_then(Face::from_letter)
            .ok_or_else(|| Error::ParseMove(s.to_string()))?;

        match chars.as_str() {
            "" => Ok(Self::cw(face)),
            "'" => Ok(Self::ccw(face)),
            _ => Err(Error::ParseMove(s.to_string())),
        }
    }
}

impl From<Move> for String {
    fn from(mv: Move) -> Self {
        mv.to_string()
    }
}

impl TryFrom<String> for Move {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Parse a whitespace-separated sequence such as `"R U R' U'"`.
pub fn parse_sequence(notation: &str) -> Result<Vec<Move>> {
    notation.split_whitespace().map(str::parse).collect()
}

/// Apply moves left to right.
pub fn apply_sequence(state: FaceletState, moves: &[Move]) -> FaceletState {
    moves.iter().fold(state, |s, mv| mv.apply(s))
}

/// The sequence that undoes `moves`: reversed, each move inverted.
pub fn invert_sequence(moves: &[Move]) -> Vec<Move> {
    moves.iter().rev().map(|mv| mv.inverse()).collect()
}
