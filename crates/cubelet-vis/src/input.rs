//! Keyboard mapping.

use cubelet_core::{Face, Move};
use serde::{Deserialize, Serialize};

/// What a key press asks the session to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum InputAction {
    /// Turn a face
    Move {
        #[serde(rename = "move")]
        mv: Move,
    },
    /// Scramble from solved
    Scramble,
    /// Full reset to solved
    Reset,
}

/// Map a key name (as browsers report it) to an action.
///
/// Face letters turn clockwise, or counter-clockwise with shift. Letters are
/// matched case-insensitively so a shifted `R` works too. Space scrambles and
/// escape resets. Anything else maps to `None`.
pub fn map_key(key: &str, shift: bool) -> Option<InputAction> {
    let key = key.to_ascii_lowercase();
    match key.as_str() {
        " " | "space" => return Some(InputAction::Scramble),
        "escape" | "esc" => return Some(InputAction::Reset),
        _ => {}
    }

    let mut chars = key.chars();
    let letter = chars.next()?;
    if chars.next().is_some() || !"udlrfb".contains(letter) {
        return None;
    }
    let face = Face::from_letter(letter)?;
    let mv = if shift { Move::ccw(face) } else { Move::cw(face) };
    Some(InputAction::Move { mv })
}
