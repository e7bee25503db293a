//! Cubelet puzzle session and view server
//!
//! Drives a [`cubelet_core`] puzzle for an interactive 3D view.
//!
//! # Architecture
//!
//! - **Session**: Owns the committed state, validates every move
//! - **Playback**: Steps through a loaded solution forward and backward
//! - **Autoplay**: Timer task that advances playback until cancelled
//! - **Solver**: Pluggable solution providers behind an async trait
//! - **REST API / WebSocket**: Commands in, snapshots out
//!
//! # Usage
//!
//! ```ignore
//! let session = Session::new(SessionConfig::default());
//! let server = VisServer::new(session, Arc::new(ScriptedSolver::default()));
//! server.serve(3000).await?;
//! ```

mod autoplay;
mod error;
mod events;
mod input;
mod playback;
mod server;
mod session;
mod solver;

pub use autoplay::{spawn_autoplay, AutoplayOutcome};
pub use error::{Error, Result};
pub use events::{CubeEvent, CubeSnapshot, MoveSource};
pub use input::{map_key, InputAction};
pub use playback::{Cursor, Playback, PlaybackStatus};
pub use server::VisServer;
pub use session::{solve, AutoplayToken, Session, SessionConfig, SolveTicket};
pub use solver::{
    request_solution, ScriptedSolver, SequenceSolver, Solution, SolutionProvider, SolutionStep,
    SolveError,
};
