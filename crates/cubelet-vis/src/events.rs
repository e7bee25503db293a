//! Session events and snapshots for the view.

use cubelet_core::{ColorCounts, FaceletState, Move};
use serde::{Deserialize, Serialize};

use crate::playback::PlaybackStatus;

/// Who asked for a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveSource {
    /// Button, key press or API call
    Manual,
    /// Playback step
    Playback,
    /// Autoplay tick
    Autoplay,
}

/// Events that occur during a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CubeEvent {
    /// A move was validated and committed
    MoveApplied {
        #[serde(rename = "move")]
        mv: Move,
        source: MoveSource,
        frame: u64,
    },

    /// A move produced an invalid candidate and was discarded
    MoveRejected {
        #[serde(rename = "move")]
        mv: Move,
        source: MoveSource,
        counts: ColorCounts,
        frame: u64,
    },

    /// A new scramble replaced the state
    Scrambled {
        sequence: String,
        fell_back: bool,
        frame: u64,
    },

    /// Full reset to solved
    Reset { frame: u64 },

    /// A solution was loaded for playback
    SolutionLoaded { total_moves: usize, frame: u64 },

    /// Playback cursor moved forward onto `index`
    StepForward {
        index: usize,
        #[serde(rename = "move")]
        mv: Move,
        frame: u64,
    },

    /// Playback cursor moved back off `index`
    StepBackward {
        index: usize,
        #[serde(rename = "move")]
        mv: Move,
        frame: u64,
    },

    /// Playback hit an invalid state and was halted
    PlaybackCorrupted { frame: u64 },

    /// Autoplay started or stopped
    Autoplay { running: bool, frame: u64 },
}

impl CubeEvent {
    /// Get the frame number for this event.
    pub fn frame(&self) -> u64 {
        match self {
            CubeEvent::MoveApplied { frame, .. } => *frame,
            CubeEvent::MoveRejected { frame, .. } => *frame,
            CubeEvent::Scrambled { frame, .. } => *frame,
            CubeEvent::Reset { frame } => *frame,
            CubeEvent::SolutionLoaded { frame, .. } => *frame,
            CubeEvent::StepForward { frame, .. } => *frame,
            CubeEvent::StepBackward { frame, .. } => *frame,
            CubeEvent::PlaybackCorrupted { frame } => *frame,
            CubeEvent::Autoplay { frame, .. } => *frame,
        }
    }
}

/// Everything the view needs to redraw.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CubeSnapshot {
    pub generation: u64,
    pub state: FaceletState,
    pub valid: bool,
    pub solved: bool,
    pub corrupted: bool,
    pub solving: bool,
    pub playback: Option<PlaybackStatus>,
    pub event_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubelet_core::Face;

    #[test]
    fn events_are_tagged_by_type() {
        let event = CubeEvent::MoveApplied {
            mv: Move::ccw(Face::F),
            source: MoveSource::Manual,
            frame: 3,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "MoveApplied");
        assert_eq!(json["move"], "F'");
        assert_eq!(json["source"], "manual");
        assert_eq!(event.frame(), 3);
    }

    #[test]
    fn snapshot_serializes_faces_by_color_name() {
        let snapshot = CubeSnapshot {
            generation: 0,
            state: FaceletState::solved(),
            valid: true,
            solved: true,
            corrupted: false,
            solving: false,
            playback: None,
            event_count: 0,
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["state"]["faces"][0][1][1], "white");
        assert_eq!(json["state"]["faces"][5][0][0], "blue");
        assert!(json["playback"].is_null());
    }
}
