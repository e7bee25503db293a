//! Nine-per-color sanity check.
//!
//! This is a cheap net, not a legality proof: any configuration with the
//! right color totals passes, including unreachable ones such as a single
//! swapped pair of facelets.

use crate::color::Color;
use crate::facelets::FaceletState;
use crate::STICKERS_PER_COLOR;

/// Per-color facelet counts, indexed by [`Color::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColorCounts(pub [usize; 6]);

impl ColorCounts {
    pub fn of(state: &FaceletState) -> Self {
        Self(state.color_counts())
    }

    pub fn get(&self, color: Color) -> usize {
        self.0[color.index()]
    }

    /// Colors whose count is not exactly nine.
    pub fn off_colors(&self) -> impl Iterator<Item = (Color, usize)> + '_ {
        Color::ALL
            .into_iter()
            .map(|c| (c, self.get(c)))
            .filter(|&(_, n)| n != STICKERS_PER_COLOR)
    }

    pub fn is_balanced(&self) -> bool {
        self.off_colors().next().is_none()
    }
}

impl std::fmt::Display for ColorCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for color in Color::ALL {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{}={}", color, self.get(color))?;
        }
        Ok(())
    }
}

/// A state failed the nine-per-color check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid facelet state: color counts {counts}")]
pub struct InvalidState {
    pub counts: ColorCounts,
}

/// True iff every color appears exactly nine times.
pub fn is_valid_state(state: &FaceletState) -> bool {
    ColorCounts::of(state).is_balanced()
}

/// Like [`is_valid_state`], reporting the counts on failure.
pub fn check_state(state: &FaceletState) -> Result<(), InvalidState> {
    let counts = ColorCounts::of(state);
    if counts.is_balanced() {
        Ok(())
    } else {
        Err(InvalidState { counts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Face;

    #[test]
    fn solved_is_valid() {
        assert!(is_valid_state(&FaceletState::solved()));
        assert!(check_state(&FaceletState::solved()).is_ok());
    }

    #[test]
    fn recolored_facelet_is_invalid() {
        let s = FaceletState::solved()
            .with_facelet(Face::U, 1, 1, Color::Blue)
            .unwrap();

        let err = check_state(&s).unwrap_err();
        assert_eq!(err.counts.get(Color::White), 8);
        assert_eq!(err.counts.get(Color::Blue), 10);

        let off: Vec<_> = err.counts.off_colors().collect();
        assert_eq!(off, vec![(Color::White, 8), (Color::Blue, 10)]);
    }

    #[test]
    fn swapped_pair_passes_count_check() {
        // Count-preserving corruption is not detected
        let s = FaceletState::solved()
            .with_facelet(Face::U, 0, 0, Color::Green)
            .unwrap()
            .with_facelet(Face::F, 0, 0, Color::White)
            .unwrap();

        assert!(is_valid_state(&s));
        assert!(!s.is_solved());
    }

    #[test]
    fn uniform_state_is_invalid() {
        let s = FaceletState::from_faces([[[Color::Red; 3]; 3]; 6]);
        assert!(!is_valid_state(&s));
        assert_eq!(check_state(&s).unwrap_err().counts.get(Color::Red), 54);
    }

    #[test]
    fn error_message_lists_counts() {
        let s = FaceletState::from_faces([[[Color::Red; 3]; 3]; 6]);
        let msg = check_state(&s).unwrap_err().to_string();
        assert!(msg.contains("red=54"));
        assert!(msg.contains("white=0"));
    }
}
