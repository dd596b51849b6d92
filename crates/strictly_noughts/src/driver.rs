//! Async driver that applies automated moves after a thinking delay.
//!
//! The driver owns a [`Session`] behind a mutex and, whenever the session
//! schedules an automated move, spawns a Tokio task that sleeps for the
//! configured delay and then completes the ticket. The lock is never held
//! across an await. Resetting aborts the task; the session's generation check
//! discards anything that slips through.

use crate::{
    CELL_COUNT, Cell, GameOutcome, Mark, MoveApplied, MoveRejection, ParticipantCount, Session,
    SessionConfig,
};
use derive_more::{Display, Error};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

/// Messages sent from the driver to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// The engine played a move.
    AutomatedMove {
        /// Cell played.
        index: usize,
        /// Outcome after the move.
        outcome: GameOutcome,
    },
    /// A new game started.
    Restarted {
        /// Generation of the new game.
        generation: u64,
    },
}

/// Driver error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum DriverError {
    /// A thread panicked while holding the session.
    #[display("Session lock poisoned")]
    LockPoisoned,

    /// The session refused a human move.
    #[display("Move rejected: {}", _0)]
    Rejected(MoveRejection),
}

/// Read-only view of a session for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionView {
    /// Board cells.
    pub cells: [Cell; CELL_COUNT],
    /// Current outcome.
    pub outcome: GameOutcome,
    /// Mark to move.
    pub current_mark: Mark,
    /// Session generation.
    pub generation: u64,
    /// True while an automated move is pending.
    pub engine_thinking: bool,
}

/// Drives a session with a real-time thinking delay.
#[derive(Debug)]
pub struct SessionDriver {
    session: Arc<Mutex<Session>>,
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
    event_tx: mpsc::UnboundedSender<GameEvent>,
}

impl SessionDriver {
    /// Creates a driver and starts the first game.
    ///
    /// Must be called from within a Tokio runtime.
    #[instrument(skip(config), fields(participants = %config.participants()))]
    pub fn new(config: SessionConfig) -> (Self, mpsc::UnboundedReceiver<GameEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let delay = config.think_delay();

        let mut session = Session::new(config);
        let observer_tx = event_tx.clone();
        session.set_observer(move |index, outcome| {
            if observer_tx
                .send(GameEvent::AutomatedMove { index, outcome })
                .is_err()
            {
                debug!("Event receiver dropped");
            }
        });

        let driver = Self {
            session: Arc::new(Mutex::new(session)),
            delay,
            pending: Mutex::new(None),
            event_tx,
        };
        // Restart so the opening game's automated moves reach the observer.
        if let Err(e) = driver.restart(Session::reset) {
            error!(error = %e, "Failed to start the first game");
        }
        (driver, event_rx)
    }

    /// Plays a human move; ignored if illegal.
    #[instrument(skip(self))]
    pub fn apply_human_move(&self, index: usize) -> Result<(), DriverError> {
        match self.try_human_move(index) {
            Ok(_) => Ok(()),
            Err(DriverError::Rejected(rejection)) => {
                debug!(%rejection, "Human move ignored");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Plays a human move and reports why it was refused, if it was.
    #[instrument(skip(self))]
    pub fn try_human_move(&self, index: usize) -> Result<MoveApplied, DriverError> {
        let applied = self
            .lock()?
            .try_human_move(index)
            .map_err(DriverError::Rejected)?;
        self.dispatch();
        Ok(applied)
    }

    /// Starts a new game with the given participant count.
    #[instrument(skip(self))]
    pub fn start(&self, participants: ParticipantCount) -> Result<(), DriverError> {
        self.restart(|session| session.start(participants))
    }

    /// Starts a new game with the current participant count.
    #[instrument(skip(self))]
    pub fn reset(&self) -> Result<(), DriverError> {
        self.restart(Session::reset)
    }

    /// Snapshot for rendering.
    pub fn view(&self) -> Result<SessionView, DriverError> {
        let session = self.lock()?;
        Ok(SessionView {
            cells: session.board_snapshot(),
            outcome: session.outcome(),
            current_mark: session.current_mark(),
            generation: session.generation(),
            engine_thinking: session.scheduled().is_some(),
        })
    }

    /// Runs `f` against the session.
    pub fn with_session<R>(&self, f: impl FnOnce(&Session) -> R) -> Result<R, DriverError> {
        Ok(f(&*self.lock()?))
    }

    /// `Restarted` goes out before `f` runs: with no think delay the new
    /// game's opening moves are played, and observed, inside `f`.
    fn restart(&self, f: impl FnOnce(&mut Session)) -> Result<(), DriverError> {
        self.cancel_pending();
        let generation = {
            let mut session = self.lock()?;
            let generation = session.generation() + 1;
            self.emit(GameEvent::Restarted { generation });
            f(&mut session);
            session.generation()
        };
        info!(generation, "Session restarted");
        self.dispatch();
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Session>, DriverError> {
        self.session.lock().map_err(|_| {
            error!("Session lock poisoned");
            DriverError::LockPoisoned
        })
    }

    fn emit(&self, event: GameEvent) {
        if self.event_tx.send(event).is_err() {
            debug!("Event receiver dropped");
        }
    }

    fn cancel_pending(&self) {
        if let Ok(mut pending) = self.pending.lock()
            && let Some(handle) = pending.take()
        {
            debug!("Cancelling pending automated move");
            handle.abort();
        }
    }

    /// Spawns the delayed completion of the session's scheduled move, if any.
    fn dispatch(&self) {
        let ticket = match self.lock() {
            Ok(session) => session.scheduled(),
            Err(_) => return,
        };
        let Some(mut ticket) = ticket else {
            return;
        };

        let session = Arc::clone(&self.session);
        let delay = self.delay;
        debug!(?ticket, ?delay, "Scheduling automated move");

        let handle = tokio::spawn(async move {
            loop {
                tokio::time::sleep(delay).await;
                let next = match session.lock() {
                    Ok(mut session) => session
                        .complete_scheduled(ticket)
                        .and_then(|_| session.scheduled()),
                    Err(_) => {
                        error!("Session lock poisoned");
                        None
                    }
                };
                match next {
                    Some(following) => ticket = following,
                    None => break,
                }
            }
        });

        if let Ok(mut pending) = self.pending.lock()
            && let Some(previous) = pending.replace(handle)
        {
            previous.abort();
        }
    }
}

impl Drop for SessionDriver {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
