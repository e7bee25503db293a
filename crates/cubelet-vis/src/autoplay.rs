//! Timer task that drives autoplay.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::error::{Error, Result};
use crate::session::Session;

/// How an autoplay run ended.
#[derive(Debug)]
pub enum AutoplayOutcome {
    /// The last step was applied
    Finished,
    /// Stopped or overtaken by a user action
    Cancelled,
    /// A step failed; the session is now corrupted
    Failed(Error),
}

/// Start autoplay on `session` and spawn the task that ticks it.
///
/// The first step is applied one `interval` after the call.
pub async fn spawn_autoplay(
    session: Arc<RwLock<Session>>,
    interval: Duration,
) -> Result<JoinHandle<AutoplayOutcome>> {
    let token = session.write().await.start_autoplay()?;
    tracing::info!(?interval, "autoplay started");

    Ok(tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let mut s = session.write().await;
            match s.autoplay_tick(token) {
                Ok(_) if !s.autoplay_active(token) => return AutoplayOutcome::Finished,
                Ok(_) => {}
                Err(Error::Stale) => {
                    tracing::debug!("autoplay run cancelled");
                    return AutoplayOutcome::Cancelled;
                }
                Err(e) => return AutoplayOutcome::Failed(e),
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::Cursor;
    use crate::solver::ScriptedSolver;
    use crate::session::SessionConfig;
    use cubelet_core::{Face, Move};

    const TICK: Duration = Duration::from_millis(1500);

    async fn loaded_session() -> Arc<RwLock<Session>> {
        let mut session = Session::new(SessionConfig {
            seed: Some(9),
            ..SessionConfig::default()
        });
        session.scramble();
        session.load_solution(ScriptedSolver::script()).unwrap();
        Arc::new(RwLock::new(session))
    }

    fn cursor(session: &Session) -> Cursor {
        session.playback().unwrap().cursor()
    }

    #[tokio::test(start_paused = true)]
    async fn one_step_per_interval() {
        let session = loaded_session().await;
        let _task = spawn_autoplay(session.clone(), TICK).await.unwrap();

        tokio::time::sleep(Duration::from_millis(1400)).await;
        assert_eq!(cursor(&*session.read().await), Cursor::Before);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(cursor(&*session.read().await), Cursor::At(0));

        tokio::time::sleep(TICK).await;
        assert_eq!(cursor(&*session.read().await), Cursor::At(1));
    }

    #[tokio::test(start_paused = true)]
    async fn runs_to_the_last_step() {
        let session = loaded_session().await;
        let task = spawn_autoplay(session.clone(), TICK).await.unwrap();

        let outcome = task.await.unwrap();
        assert!(matches!(outcome, AutoplayOutcome::Finished));

        let s = session.read().await;
        assert_eq!(cursor(&s), Cursor::At(23));
        assert!(!s.playback().unwrap().is_autoplaying());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_pending_tick() {
        let session = loaded_session().await;
        let task = spawn_autoplay(session.clone(), TICK).await.unwrap();

        tokio::time::sleep(Duration::from_millis(1600)).await;
        assert!(session.write().await.stop_autoplay());
        let state = *session.read().await.state();

        let outcome = task.await.unwrap();
        assert!(matches!(outcome, AutoplayOutcome::Cancelled));
        let s = session.read().await;
        assert_eq!(cursor(&s), Cursor::At(0));
        assert_eq!(*s.state(), state);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_move_cancels_autoplay() {
        let session = loaded_session().await;
        let task = spawn_autoplay(session.clone(), TICK).await.unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;
        session.write().await.apply_move(Move::cw(Face::U)).unwrap();

        assert!(matches!(task.await.unwrap(), AutoplayOutcome::Cancelled));
        assert_eq!(cursor(&*session.read().await), Cursor::Before);
    }

    #[tokio::test]
    async fn needs_a_solution() {
        let session = Arc::new(RwLock::new(Session::default()));
        let err = spawn_autoplay(session, TICK).await.unwrap_err();
        assert!(matches!(err, Error::NoSolution));
    }
}
