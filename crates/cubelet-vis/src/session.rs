//! A puzzle session: the committed state plus everything that changes it.
//!
//! Every transition runs to completion under `&mut self`. Async work
//! captures a generation counter when it starts and is refused once that
//! counter has moved on. Solution requests watch the state generation, which
//! moves whenever the committed state changes. Autoplay runs watch their own
//! counter, which also moves on stop and restart.

use std::collections::VecDeque;
use std::time::Duration;

use cubelet_core::{check_state, cubies, Cubie, FaceletState, Move, Scramble, ScrambleConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::events::{CubeEvent, CubeSnapshot, MoveSource};
use crate::input::{map_key, InputAction};
use crate::playback::{Cursor, Playback, PlaybackStatus};
use crate::solver::{request_solution, Solution, SolutionProvider};

/// Session tuning.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub scramble: ScrambleConfig,
    /// Delay between autoplay steps
    pub autoplay_interval: Duration,
    /// Simulated delay of the scripted solution provider
    pub solve_latency: Duration,
    /// Give up on a solution provider after this long
    pub solve_timeout: Duration,
    /// Seed for reproducible scrambles; entropy if `None`
    pub seed: Option<u64>,
    /// Events kept in the timeline; older ones are dropped
    pub max_events: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            scramble: ScrambleConfig::default(),
            autoplay_interval: Duration::from_millis(1500),
            solve_latency: Duration::from_millis(1000),
            solve_timeout: Duration::from_secs(10),
            seed: None,
            max_events: 4096,
        }
    }
}

/// Handle for one autoplay run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoplayToken {
    generation: u64,
}

/// Handle for one outstanding solution request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolveTicket {
    generation: u64,
    state: FaceletState,
}

impl SolveTicket {
    /// The state the solution was requested for.
    pub fn state(&self) -> &FaceletState {
        &self.state
    }
}

/// One user's puzzle.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    state: FaceletState,
    playback: Option<Playback>,
    generation: u64,
    autoplay_generation: u64,
    corrupted: bool,
    solving: bool,
    events: VecDeque<CubeEvent>,
    next_frame: u64,
    rng: StdRng,
}

impl Session {
    /// Create a solved session.
    pub fn new(config: SessionConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            state: FaceletState::solved(),
            playback: None,
            generation: 0,
            autoplay_generation: 0,
            corrupted: false,
            solving: false,
            events: VecDeque::new(),
            next_frame: 0,
            rng,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The last committed state.
    pub fn state(&self) -> &FaceletState {
        &self.state
    }

    /// Bumped whenever the committed state changes.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_corrupted(&self) -> bool {
        self.corrupted
    }

    pub fn is_solving(&self) -> bool {
        self.solving
    }

    pub fn playback(&self) -> Option<&Playback> {
        self.playback.as_ref()
    }

    pub fn playback_status(&self) -> Option<PlaybackStatus> {
        self.playback.as_ref().map(PlaybackStatus::from)
    }

    /// The retained tail of the timeline, oldest first.
    pub fn events(&self) -> &VecDeque<CubeEvent> {
        &self.events
    }

    /// Frame number the next event will get.
    pub fn next_frame(&self) -> u64 {
        self.next_frame
    }

    /// Retained events recorded at or after `frame`.
    ///
    /// Frames that were already dropped from the timeline are skipped.
    pub fn events_since(&self, frame: u64) -> Vec<CubeEvent> {
        let first = self.next_frame - self.events.len() as u64;
        let skip = usize::try_from(frame.saturating_sub(first)).unwrap_or(usize::MAX);
        self.events.iter().skip(skip).cloned().collect()
    }

    /// The 26 visible cubies of the committed state.
    pub fn cubies(&self) -> Vec<Cubie> {
        cubies(&self.state)
    }

    pub fn snapshot(&self) -> CubeSnapshot {
        CubeSnapshot {
            generation: self.generation,
            state: self.state,
            valid: check_state(&self.state).is_ok(),
            solved: self.state.is_solved(),
            corrupted: self.corrupted,
            solving: self.solving,
            playback: self.playback_status(),
            event_count: self.next_frame as usize,
        }
    }

    /// Apply one move chosen by the user.
    pub fn apply_move(&mut self, mv: Move) -> Result<()> {
        self.cancel_autoplay();
        self.commit(mv, MoveSource::Manual)
    }

    /// Parse and apply one move in standard notation.
    pub fn apply_notation(&mut self, notation: &str) -> Result<Move> {
        let mv: Move = notation.trim().parse()?;
        self.apply_move(mv)?;
        Ok(mv)
    }

    /// Replace the state with a fresh scramble from solved.
    ///
    /// Any loaded solution is dropped.
    pub fn scramble(&mut self) -> Scramble {
        self.bump();
        let result = cubelet_core::scramble(&mut self.rng, &self.config.scramble);
        self.state = result.state;
        self.playback = None;

        let sequence = result.notation();
        let fell_back = result.fell_back;
        self.record(|frame| CubeEvent::Scrambled {
            sequence,
            fell_back,
            frame,
        });
        result
    }

    /// Full reset: solved state, no solution, no autoplay.
    pub fn reset(&mut self) {
        self.bump();
        self.state = FaceletState::solved();
        self.playback = None;
        self.corrupted = false;
        info!("puzzle reset to solved");
        self.record(|frame| CubeEvent::Reset { frame });
    }

    /// Load a solution for playback, cursor at the start.
    pub fn load_solution(&mut self, solution: Solution) -> Result<()> {
        if !solution.is_playable() {
            return Err(Error::NoSolution);
        }
        self.cancel_autoplay();
        let total_moves = solution.total_moves;
        self.playback = Some(Playback::new(solution));
        info!(total_moves, "solution loaded");
        self.record(|frame| CubeEvent::SolutionLoaded { total_moves, frame });
        Ok(())
    }

    /// Apply the next solution step.
    ///
    /// `Ok(None)` if playback is already at the last step.
    pub fn next_step(&mut self) -> Result<Option<Move>> {
        self.check_playback()?;
        self.cancel_autoplay();
        self.step(true, MoveSource::Playback)
    }

    /// Undo the current solution step.
    ///
    /// `Ok(None)` if playback is before the first step.
    pub fn previous_step(&mut self) -> Result<Option<Move>> {
        self.check_playback()?;
        self.cancel_autoplay();
        self.step(false, MoveSource::Playback)
    }

    /// Move the playback cursor back to the start without touching the state.
    pub fn reset_playback(&mut self) -> Result<()> {
        if self.playback.is_none() {
            return Err(Error::NoSolution);
        }
        self.cancel_autoplay();
        if let Some(playback) = self.playback.as_mut() {
            playback.reset();
        }
        Ok(())
    }

    /// Start autoplay. Ticks must present the returned token.
    pub fn start_autoplay(&mut self) -> Result<AutoplayToken> {
        self.check_playback()?;
        self.cancel_autoplay();
        if let Some(playback) = self.playback.as_mut() {
            playback.play();
        }
        self.record(|frame| CubeEvent::Autoplay {
            running: true,
            frame,
        });
        Ok(AutoplayToken {
            generation: self.autoplay_generation,
        })
    }

    /// Stop autoplay. Returns whether it was running.
    pub fn stop_autoplay(&mut self) -> bool {
        let was_running = self.playback.as_ref().is_some_and(Playback::is_autoplaying);
        self.cancel_autoplay();
        was_running
    }

    /// True if `token` belongs to the autoplay run in progress.
    pub fn autoplay_active(&self, token: AutoplayToken) -> bool {
        token.generation == self.autoplay_generation
            && self.playback.as_ref().is_some_and(Playback::is_autoplaying)
    }

    /// One autoplay step.
    ///
    /// Fails with [`Error::Stale`] if the run was stopped or overtaken.
    /// Autoplay ends itself after the last step.
    pub fn autoplay_tick(&mut self, token: AutoplayToken) -> Result<Option<Move>> {
        if !self.autoplay_active(token) {
            return Err(Error::Stale);
        }
        let stepped = self.step(true, MoveSource::Autoplay)?;
        if self.playback.as_ref().is_some_and(Playback::is_finished) {
            info!("autoplay reached the last step");
            self.halt_autoplay();
        }
        Ok(stepped)
    }

    /// Mark a solution request as in flight and capture what it is for.
    pub fn begin_solve(&mut self) -> Result<SolveTicket> {
        check_state(&self.state)?;
        self.bump();
        self.solving = true;
        Ok(SolveTicket {
            generation: self.generation,
            state: self.state,
        })
    }

    /// Load the answer to `ticket`, unless the puzzle changed since.
    ///
    /// Returns the number of moves loaded.
    pub fn install_solution(&mut self, ticket: SolveTicket, solution: Solution) -> Result<usize> {
        if ticket.generation != self.generation {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale solution"
            );
            return Err(Error::Stale);
        }
        self.solving = false;
        let total = solution.total_moves;
        self.load_solution(solution)?;
        Ok(total)
    }

    /// Clear the in-flight flag after a failed request.
    pub fn fail_solve(&mut self, ticket: SolveTicket) {
        if ticket.generation == self.generation {
            self.solving = false;
        }
    }

    /// Drop the outstanding solution request, if any.
    pub fn abandon_solve(&mut self) -> bool {
        if !self.solving {
            return false;
        }
        self.invalidate_solve();
        info!("solution request abandoned");
        true
    }

    /// Handle a key press. `Ok(None)` for unmapped keys.
    pub fn handle_input(&mut self, key: &str, shift: bool) -> Result<Option<InputAction>> {
        let Some(action) = map_key(key, shift) else {
            return Ok(None);
        };
        match action {
            InputAction::Move { mv } => self.apply_move(mv)?,
            InputAction::Scramble => {
                self.scramble();
            }
            InputAction::Reset => self.reset(),
        }
        Ok(Some(action))
    }

    /// Invalidate async work and stop autoplay.
    fn bump(&mut self) {
        self.invalidate_solve();
        self.cancel_autoplay();
    }

    /// Outstanding solution requests no longer match the state.
    fn invalidate_solve(&mut self) {
        self.generation += 1;
        self.solving = false;
    }

    fn cancel_autoplay(&mut self) {
        self.autoplay_generation += 1;
        self.halt_autoplay();
    }

    fn check_playback(&self) -> Result<()> {
        if self.corrupted {
            return Err(Error::Corrupted);
        }
        if self.playback.is_none() {
            return Err(Error::NoSolution);
        }
        Ok(())
    }

    fn halt_autoplay(&mut self) {
        let was_running = match self.playback.as_mut() {
            Some(playback) if playback.is_autoplaying() => {
                playback.stop();
                true
            }
            _ => false,
        };
        if was_running {
            self.record(|frame| CubeEvent::Autoplay {
                running: false,
                frame,
            });
        }
    }

    fn record(&mut self, event: impl FnOnce(u64) -> CubeEvent) {
        let frame = self.next_frame;
        self.next_frame += 1;
        self.events.push_back(event(frame));
        while self.events.len() > self.config.max_events {
            self.events.pop_front();
        }
    }

    /// Validate and commit one move.
    fn commit(&mut self, mv: Move, source: MoveSource) -> Result<()> {
        let candidate = mv.apply(self.state);
        if let Err(invalid) = check_state(&candidate) {
            warn!(%mv, ?source, counts = %invalid.counts, "move rejected, keeping last good state");
            self.record(|frame| CubeEvent::MoveRejected {
                mv,
                source,
                counts: invalid.counts,
                frame,
            });
            return Err(invalid.into());
        }

        self.state = candidate;
        self.invalidate_solve();
        debug!(%mv, ?source, "move applied");
        self.record(|frame| CubeEvent::MoveApplied { mv, source, frame });
        Ok(())
    }

    fn step(&mut self, forward: bool, source: MoveSource) -> Result<Option<Move>> {
        if self.corrupted {
            return Err(Error::Corrupted);
        }
        let mut playback = self.playback.take().ok_or(Error::NoSolution)?;
        let from = playback.cursor();

        let result = if forward {
            playback.next(|mv| self.commit(mv, source))
        } else {
            playback.previous(|mv| self.commit(mv, source))
        };
        let to = playback.cursor();
        self.playback = Some(playback);

        match result {
            Ok(Some(mv)) => {
                match (forward, from, to) {
                    (true, _, Cursor::At(index)) => {
                        self.record(|frame| CubeEvent::StepForward { index, mv, frame })
                    }
                    (false, Cursor::At(index), _) => {
                        self.record(|frame| CubeEvent::StepBackward { index, mv, frame })
                    }
                    _ => {}
                }
                Ok(Some(mv))
            }
            Ok(None) => Ok(None),
            Err(e) => {
                error!(
                    error = %e,
                    ?from,
                    "playback step produced an invalid state; halting playback"
                );
                self.halt_autoplay();
                self.corrupted = true;
                self.record(|frame| CubeEvent::PlaybackCorrupted { frame });
                Err(e)
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn force_state(&mut self, state: FaceletState) {
        self.state = state;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

/// Request a solution for the session's current state and load it.
///
/// The lock is released while the provider works, so the user can keep
/// turning faces. Doing so makes the answer stale and it is dropped.
pub async fn solve(session: &RwLock<Session>, provider: &dyn SolutionProvider) -> Result<usize> {
    let (ticket, timeout) = {
        let mut s = session.write().await;
        (s.begin_solve()?, s.config.solve_timeout)
    };

    let result = request_solution(provider, ticket.state(), timeout).await;

    let mut s = session.write().await;
    match result {
        Ok(solution) => s.install_solution(ticket, solution),
        Err(e) => {
            s.fail_solve(ticket);
            Err(e)
        }
    }
}
