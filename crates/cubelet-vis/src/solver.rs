//! Solution providers.
//!
//! A provider turns a puzzle state into an ordered move list. The session
//! treats the answer as opaque: it plays the moves back but never checks that
//! they actually solve the state.

use std::time::Duration;

use async_trait::async_trait;
use cubelet_core::{parse_sequence, Face, FaceletState, Move};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One step of a solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionStep {
    #[serde(rename = "move")]
    pub mv: Move,
    pub description: String,
}

impl SolutionStep {
    pub fn new(mv: Move, description: impl Into<String>) -> Self {
        Self {
            mv,
            description: description.into(),
        }
    }
}

/// A finished move list from a provider.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Solution {
    pub steps: Vec<SolutionStep>,
    pub total_moves: usize,
    pub is_valid: bool,
}

impl Solution {
    /// A valid solution over `steps`.
    pub fn new(steps: Vec<SolutionStep>) -> Self {
        Self {
            total_moves: steps.len(),
            steps,
            is_valid: true,
        }
    }

    /// True if the solution can be loaded for playback.
    pub fn is_playable(&self) -> bool {
        self.is_valid && !self.steps.is_empty()
    }

    pub fn moves(&self) -> impl Iterator<Item = Move> + '_ {
        self.steps.iter().map(|s| s.mv)
    }
}

/// Provider failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct SolveError {
    pub reason: String,
}

impl SolveError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl From<SolveError> for Error {
    fn from(e: SolveError) -> Self {
        Error::SolutionUnavailable(e.reason)
    }
}

/// Something that can produce a solution for a state.
#[async_trait]
pub trait SolutionProvider: Send + Sync {
    async fn generate_solution(
        &self,
        state: &FaceletState,
    ) -> std::result::Result<Solution, SolveError>;
}

/// Ask `provider` for a solution, giving up after `timeout`.
pub async fn request_solution(
    provider: &dyn SolutionProvider,
    state: &FaceletState,
    timeout: Duration,
) -> Result<Solution> {
    match tokio::time::timeout(timeout, provider.generate_solution(state)).await {
        Ok(Ok(solution)) => Ok(solution),
        Ok(Err(e)) => {
            tracing::warn!(reason = %e, "solution provider failed");
            Err(e.into())
        }
        Err(_) => {
            tracing::warn!(?timeout, "solution provider timed out");
            Err(Error::Timeout(timeout))
        }
    }
}

/// Fixed demonstration script, with a description per move.
const SCRIPT: [(Move, &str); 24] = [
    (Move::cw(Face::F), "Turn the front face clockwise"),
    (Move::cw(Face::R), "Turn the right face clockwise"),
    (Move::cw(Face::U), "Turn the top face clockwise"),
    (Move::ccw(Face::R), "Turn the right face counter-clockwise"),
    (Move::ccw(Face::F), "Turn the front face counter-clockwise"),
    (Move::cw(Face::R), "Turn the right face clockwise"),
    (Move::cw(Face::D), "Turn the bottom face clockwise"),
    (Move::ccw(Face::R), "Turn the right face counter-clockwise"),
    (Move::ccw(Face::D), "Turn the bottom face counter-clockwise"),
    (Move::cw(Face::U), "Turn the top face clockwise"),
    (Move::cw(Face::R), "Turn the right face clockwise"),
    (Move::ccw(Face::U), "Turn the top face counter-clockwise"),
    (Move::ccw(Face::R), "Turn the right face counter-clockwise"),
    (Move::cw(Face::F), "Turn the front face clockwise"),
    (Move::cw(Face::R), "Turn the right face clockwise"),
    (Move::cw(Face::U), "Turn the top face clockwise"),
    (Move::ccw(Face::R), "Turn the right face counter-clockwise"),
    (Move::ccw(Face::U), "Turn the top face counter-clockwise"),
    (Move::ccw(Face::F), "Turn the front face counter-clockwise"),
    (Move::cw(Face::R), "Turn the right face clockwise"),
    (Move::ccw(Face::D), "Turn the bottom face counter-clockwise"),
    (Move::ccw(Face::R), "Turn the right face counter-clockwise"),
    (Move::cw(Face::D), "Turn the bottom face clockwise"),
    (Move::cw(Face::U), "Turn the top face clockwise"),
];

/// Provider that ignores the state and returns a fixed script after a delay.
///
/// A solved state gets an empty solution. This stands in until a real solver
/// is plugged in behind [`SolutionProvider`].
#[derive(Debug, Clone)]
pub struct ScriptedSolver {
    latency: Duration,
}

impl ScriptedSolver {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    /// The script as a solution, without any delay.
    pub fn script() -> Solution {
        let steps = SCRIPT
            .iter()
            .map(|&(mv, description)| SolutionStep::new(mv, description))
            .collect();
        Solution::new(steps)
    }
}

impl Default for ScriptedSolver {
    fn default() -> Self {
        Self::new(Duration::from_millis(1000))
    }
}

#[async_trait]
impl SolutionProvider for ScriptedSolver {
    async fn generate_solution(
        &self,
        state: &FaceletState,
    ) -> std::result::Result<Solution, SolveError> {
        tokio::time::sleep(self.latency).await;

        if state.is_solved() {
            tracing::info!("puzzle already solved, nothing to play");
            return Ok(Solution::new(Vec::new()));
        }

        let solution = Self::script();
        tracing::info!(total_moves = solution.total_moves, "scripted solution ready");
        Ok(solution)
    }
}

/// Provider that replays a fixed move sequence, given in notation.
#[derive(Debug, Clone)]
pub struct SequenceSolver {
    moves: Vec<Move>,
}

impl SequenceSolver {
    pub fn new(moves: Vec<Move>) -> Self {
        Self { moves }
    }

    pub fn parse(notation: &str) -> Result<Self> {
        Ok(Self::new(parse_sequence(notation)?))
    }
}

#[async_trait]
impl SolutionProvider for SequenceSolver {
    async fn generate_solution(
        &self,
        _state: &FaceletState,
    ) -> std::result::Result<Solution, SolveError> {
        let steps = self
            .moves
            .iter()
            .map(|&mv| SolutionStep::new(mv, format!("Apply {mv}")))
            .collect();
        Ok(Solution::new(steps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingSolver;

    #[async_trait]
    impl SolutionProvider for FailingSolver {
        async fn generate_solution(
            &self,
            _state: &FaceletState,
        ) -> std::result::Result<Solution, SolveError> {
            Err(SolveError::new("no solver installed"))
        }
    }

    fn scrambled() -> FaceletState {
        Move::cw(Face::R).apply(FaceletState::solved())
    }

    #[test]
    fn script_has_twenty_four_moves() {
        let solution = ScriptedSolver::script();
        assert_eq!(solution.total_moves, 24);
        assert_eq!(solution.steps.len(), 24);
        assert!(solution.is_playable());

        let notation: Vec<String> = solution.moves().map(|m| m.to_string()).collect();
        assert_eq!(
            notation.join(" "),
            "F R U R' F' R D R' D' U R U' R' F R U R' U' F' R D' R' D U"
        );
        assert_eq!(solution.steps[3].description, "Turn the right face counter-clockwise");
    }

    #[test]
    fn playable_needs_steps_and_validity() {
        assert!(!Solution::new(Vec::new()).is_playable());

        let mut invalid = ScriptedSolver::script();
        invalid.is_valid = false;
        assert!(!invalid.is_playable());
    }

    #[test]
    fn step_serializes_move_in_notation() {
        let step = SolutionStep::new(Move::ccw(Face::U), "Turn the top face counter-clockwise");
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["move"], "U'");
    }

    #[tokio::test(start_paused = true)]
    async fn scripted_solver_waits_its_latency() {
        let solver = ScriptedSolver::new(Duration::from_millis(1000));
        let start = tokio::time::Instant::now();

        let solution = solver.generate_solution(&scrambled()).await.unwrap();
        assert_eq!(solution.total_moves, 24);
        assert!(start.elapsed() >= Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn scripted_solver_returns_empty_for_solved() {
        let solver = ScriptedSolver::default();
        let solution = solver.generate_solution(&FaceletState::solved()).await.unwrap();
        assert!(solution.steps.is_empty());
        assert!(!solution.is_playable());
    }

    #[tokio::test(start_paused = true)]
    async fn request_times_out() {
        let solver = ScriptedSolver::new(Duration::from_secs(30));
        let err = request_solution(&solver, &scrambled(), Duration::from_secs(10))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout(d) if d == Duration::from_secs(10)));
    }

    #[tokio::test]
    async fn provider_failure_is_unavailable() {
        let err = request_solution(&FailingSolver, &scrambled(), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SolutionUnavailable(ref r) if r == "no solver installed"));
    }

    #[test]
    fn sequence_solver_replays_moves() {
        let solver = SequenceSolver::parse("R U R' U'").unwrap();
        let solution = tokio_test::assert_ok!(tokio_test::block_on(
            solver.generate_solution(&scrambled())
        ));
        assert_eq!(solution.total_moves, 4);
        assert_eq!(solution.steps[2].description, "Apply R'");
    }

    #[test]
    fn sequence_solver_rejects_bad_notation() {
        tokio_test::assert_err!(SequenceSolver::parse("R U2"));
    }
}
