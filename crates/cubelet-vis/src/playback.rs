//! Step playback over a loaded solution.
//!
//! The controller owns a cursor into the solution and nothing else. Applying
//! a step to the puzzle is the caller's job: [`Playback::next`] and
//! [`Playback::previous`] hand the move to a closure and only move the cursor
//! if that closure commits it.

use cubelet_core::Move;
use serde::{Deserialize, Serialize};

use crate::solver::{Solution, SolutionStep};

/// Position in the step list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "index", rename_all = "lowercase")]
pub enum Cursor {
    /// No step applied yet
    Before,
    /// Step `i` was the last one applied
    At(usize),
}

impl Cursor {
    /// Number of steps applied so far.
    pub fn applied(self) -> usize {
        match self {
            Cursor::Before => 0,
            Cursor::At(i) => i + 1,
        }
    }
}

/// Playback controller for a solution.
#[derive(Debug, Clone)]
pub struct Playback {
    solution: Solution,
    cursor: Cursor,
    autoplaying: bool,
}

impl Playback {
    /// Create a controller at [`Cursor::Before`].
    pub fn new(solution: Solution) -> Self {
        Self {
            solution,
            cursor: Cursor::Before,
            autoplaying: false,
        }
    }

    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Get the total number of steps.
    pub fn total_steps(&self) -> usize {
        self.solution.steps.len()
    }

    pub fn is_autoplaying(&self) -> bool {
        self.autoplaying
    }

    /// True once the last step has been applied.
    pub fn is_finished(&self) -> bool {
        self.cursor.applied() >= self.total_steps()
    }

    /// The step the cursor is on, if any.
    pub fn current_step(&self) -> Option<&SolutionStep> {
        match self.cursor {
            Cursor::Before => None,
            Cursor::At(i) => self.solution.steps.get(i),
        }
    }

    /// The move `next` would apply.
    pub fn peek_next(&self) -> Option<Move> {
        self.solution.steps.get(self.cursor.applied()).map(|s| s.mv)
    }

    /// The move `previous` would apply: the inverse of the current step.
    pub fn peek_previous(&self) -> Option<Move> {
        self.current_step().map(|s| s.mv.inverse())
    }

    /// Step forward one move.
    ///
    /// Returns `Ok(None)` at the end. If `apply` fails the cursor stays put
    /// and the error is returned.
    pub fn next<E>(
        &mut self,
        apply: impl FnOnce(Move) -> Result<(), E>,
    ) -> Result<Option<Move>, E> {
        let Some(mv) = self.peek_next() else {
            return Ok(None);
        };
        apply(mv)?;
        self.cursor = Cursor::At(self.cursor.applied());
        Ok(Some(mv))
    }

    /// Step backward one move by applying the inverse of the current step.
    ///
    /// Returns `Ok(None)` at [`Cursor::Before`].
    pub fn previous<E>(
        &mut self,
        apply: impl FnOnce(Move) -> Result<(), E>,
    ) -> Result<Option<Move>, E> {
        let Cursor::At(i) = self.cursor else {
            return Ok(None);
        };
        let mv = self.solution.steps[i].mv.inverse();
        apply(mv)?;
        self.cursor = if i == 0 { Cursor::Before } else { Cursor::At(i - 1) };
        Ok(Some(mv))
    }

    /// Return the cursor to the start. The puzzle state is not touched.
    pub fn reset(&mut self) {
        self.cursor = Cursor::Before;
        self.autoplaying = false;
    }

    /// Mark autoplay as running.
    pub fn play(&mut self) {
        self.autoplaying = true;
    }

    /// Mark autoplay as stopped.
    pub fn stop(&mut self) {
        self.autoplaying = false;
    }

    /// Calculate progress as a fraction (0.0 - 1.0).
    pub fn progress(&self) -> f64 {
        if self.solution.steps.is_empty() {
            0.0
        } else {
            self.cursor.applied() as f64 / self.total_steps() as f64
        }
    }
}

/// Playback status for sending to the view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackStatus {
    pub cursor: Cursor,
    pub applied: usize,
    pub total_steps: usize,
    pub progress: f64,
    pub autoplaying: bool,
    pub current_step: Option<SolutionStep>,
}

impl From<&Playback> for PlaybackStatus {
    fn from(playback: &Playback) -> Self {
        Self {
            cursor: playback.cursor,
            applied: playback.cursor.applied(),
            total_steps: playback.total_steps(),
            progress: playback.progress(),
            autoplaying: playback.autoplaying,
            current_step: playback.current_step().cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubelet_core::{is_valid_state, parse_sequence, Face, FaceletState};
    use std::convert::Infallible;

    fn make_solution(notation: &str) -> Solution {
        let steps = parse_sequence(notation)
            .unwrap()
            .into_iter()
            .map(|mv| SolutionStep::new(mv, mv.to_string()))
            .collect();
        Solution::new(steps)
    }

    fn step_on(state: &mut FaceletState) -> impl FnOnce(Move) -> Result<(), Infallible> + '_ {
        move |mv| {
            *state = mv.apply(*state);
            Ok(())
        }
    }

    #[test]
    fn playback_starts_before_first_step() {
        let playback = Playback::new(make_solution("R U"));
        assert_eq!(playback.cursor(), Cursor::Before);
        assert!(playback.current_step().is_none());
        assert!(!playback.is_autoplaying());
        assert_eq!(playback.peek_next(), Some(Move::cw(Face::R)));
    }

    #[test]
    fn next_walks_to_the_end() {
        let mut playback = Playback::new(make_solution("R U F"));
        let mut state = FaceletState::solved();

        let first = playback.next(step_on(&mut state)).unwrap();
        assert_eq!(first, Some(Move::cw(Face::R)));
        assert_eq!(playback.cursor(), Cursor::At(0));
        playback.next(step_on(&mut state)).unwrap();
        playback.next(step_on(&mut state)).unwrap();
        assert_eq!(playback.cursor(), Cursor::At(2));
        assert!(playback.is_finished());

        // No-op at the end
        let before = state;
        assert_eq!(playback.next(step_on(&mut state)).unwrap(), None);
        assert_eq!(playback.cursor(), Cursor::At(2));
        assert_eq!(state, before);
    }

    #[test]
    fn previous_is_noop_before_start() {
        let mut playback = Playback::new(make_solution("R U"));
        let mut state = FaceletState::solved();
        assert_eq!(playback.previous(step_on(&mut state)).unwrap(), None);
        assert_eq!(playback.cursor(), Cursor::Before);
        assert!(state.is_solved());
    }

    #[test]
    fn previous_from_first_step_returns_to_before() {
        let mut playback = Playback::new(make_solution("R U"));
        let mut state = FaceletState::solved();

        playback.next(step_on(&mut state)).unwrap();
        let undone = playback.previous(step_on(&mut state)).unwrap();
        assert_eq!(undone, Some(Move::ccw(Face::R)));
        assert_eq!(playback.cursor(), Cursor::Before);
        assert!(state.is_solved());
    }

    #[test]
    fn forward_then_back_restores_state() {
        let solution = make_solution("F R U R' F' R D R' D' U R U' R'");
        let start = FaceletState::solved();

        for k in 0..=solution.steps.len() {
            let mut playback = Playback::new(solution.clone());
            let mut state = start;
            for _ in 0..k {
                playback.next(step_on(&mut state)).unwrap();
                assert!(is_valid_state(&state));
            }
            for _ in 0..k {
                playback.previous(step_on(&mut state)).unwrap();
            }
            assert_eq!(state, start, "prefix {k}");
            assert_eq!(playback.cursor(), Cursor::Before);
        }
    }

    #[test]
    fn failed_apply_keeps_cursor() {
        let mut playback = Playback::new(make_solution("R U"));
        let err = playback.next(|_| Err("rejected")).unwrap_err();
        assert_eq!(err, "rejected");
        assert_eq!(playback.cursor(), Cursor::Before);

        let mut state = FaceletState::solved();
        playback.next(step_on(&mut state)).unwrap();
        assert!(playback.previous(|_| Err("rejected")).is_err());
        assert_eq!(playback.cursor(), Cursor::At(0));
    }

    #[test]
    fn reset_moves_cursor_only() {
        let mut playback = Playback::new(make_solution("R U"));
        let mut state = FaceletState::solved();
        playback.next(step_on(&mut state)).unwrap();
        playback.play();

        playback.reset();
        assert_eq!(playback.cursor(), Cursor::Before);
        assert!(!playback.is_autoplaying());
        assert!(!state.is_solved());
    }

    #[test]
    fn empty_solution_has_nothing_to_play() {
        let mut playback = Playback::new(Solution::new(Vec::new()));
        assert!(playback.is_finished());
        assert_eq!(playback.progress(), 0.0);
        assert_eq!(playback.next(|_| Ok::<(), Infallible>(())).unwrap(), None);
    }

    #[test]
    fn progress_calculation() {
        let mut playback = Playback::new(make_solution("R U F B"));
        assert_eq!(playback.progress(), 0.0);

        playback.next(|_| Ok::<(), Infallible>(())).unwrap();
        playback.next(|_| Ok::<(), Infallible>(())).unwrap();
        assert_eq!(playback.progress(), 0.5);
    }

    #[test]
    fn status_conversion() {
        let mut playback = Playback::new(make_solution("R U F"));
        playback.next(|_| Ok::<(), Infallible>(())).unwrap();
        playback.play();

        let status: PlaybackStatus = (&playback).into();
        assert_eq!(status.cursor, Cursor::At(0));
        assert_eq!(status.applied, 1);
        assert_eq!(status.total_steps, 3);
        assert!(status.autoplaying);
        assert_eq!(status.current_step.map(|s| s.description), Some("R".to_string()));
    }

    #[test]
    fn cursor_serializes_tagged() {
        let json = serde_json::to_value(Cursor::At(4)).unwrap();
        assert_eq!(json, serde_json::json!({"state": "at", "index": 4}));
        let json = serde_json::to_value(Cursor::Before).unwrap();
        assert_eq!(json, serde_json::json!({"state": "before"}));
    }
}
