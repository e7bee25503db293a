//! Sticker colors and face identifiers.

/// One of the six sticker colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Color {
    White,
    Yellow,
    Orange,
    Red,
    Green,
    Blue,
}

impl Color {
    /// All six colors, in face order (U, D, L, R, F, B).
    pub const ALL: [Self; 6] = [
        Self::White,
        Self::Yellow,
        Self::Orange,
        Self::Red,
        Self::Green,
        Self::Blue,
    ];

    /// Dense index, 0..6.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Single-letter tag used in the net printout.
    pub const fn letter(self) -> char {
        match self {
            Self::White => 'W',
            Self::Yellow => 'Y',
            Self::Orange => 'O',
            Self::Red => 'R',
            Self::Green => 'G',
            Self::Blue => 'B',
        }
    }

    /// Face whose center carries this color in the solved state.
    pub const fn home_face(self) -> Face {
        Face::ALL[self.index()]
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::White => "white",
            Self::Yellow => "yellow",
            Self::Orange => "orange",
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
        };
        f.write_str(name)
    }
}

/// One of the six faces: Up, Down, Left, Right, Front, Back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Face {
    U,
    D,
    L,
    R,
    F,
    B,
}

impl Face {
    pub const ALL: [Self; 6] = [Self::U, Self::D, Self::L, Self::R, Self::F, Self::B];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Color of this face when the puzzle is solved.
    pub const fn home_color(self) -> Color {
        Color::ALL[self.index()]
    }

    pub const fn letter(self) -> char {
        match self {
            Self::U => 'U',
            Self::D => 'D',
            Self::L => 'L',
            Self::R => 'R',
            Self::F => 'F',
            Self::B => 'B',
        }
    }

    /// Parse a face letter (case-insensitive).
    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'U' => Some(Self::U),
            'D' => Some(Self::D),
            'L' => Some(Self::L),
            'R' => Some(Self::R),
            'F' => Some(Self::F),
            'B' => Some(Self::B),
            _ => None,
        }
    }

    /// Face on the other side of the puzzle.
    pub const fn opposite(self) -> Self {
        match self {
            Self::U => Self::D,
            Self::D => Self::U,
            Self::L => Self::R,
            Self::R => Self::L,
            Self::F => Self::B,
            Self::B => Self::F,
        }
    }

    /// Outward normal in world axes (+x toward R, +y toward U, +z toward F).
    pub const fn normal(self) -> [i8; 3] {
        match self {
            Self::U => [0, 1, 0],
            Self::D => [0, -1, 0],
            Self::L => [-1, 0, 0],
            Self::R => [1, 0, 0],
            Self::F => [0, 0, 1],
            Self::B => [0, 0, -1],
        }
    }

    /// Face whose outward normal is `normal`, if any.
    pub fn from_normal(normal: [i8; 3]) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.normal() == normal)
    }
}

impl std::fmt::Display for Face {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}
