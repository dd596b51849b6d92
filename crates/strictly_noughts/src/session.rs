//! Game session lifecycle.
//!
//! A session owns the board, the turn controller and the engine strategy.
//! Every `start`/`reset` bumps a generation counter; automated moves are
//! scheduled as [`ScheduledMove`] tickets carrying that generation and are
//! dropped on completion if the session has moved on.

use crate::{
    Board, CELL_COUNT, Cell, GameOutcome, Mark, MoveApplied, MoveRejection, ParticipantCount,
    Phase, SessionConfig, Strategy, TurnController, TurnState,
};
use tracing::{debug, info, instrument, warn};

/// Callback fired after an automated move lands: `(cell_index, new_outcome)`.
pub type AutomatedMoveObserver = Box<dyn FnMut(usize, GameOutcome) + Send>;

/// Ticket for a pending automated move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScheduledMove {
    generation: u64,
    sequence: u64,
    mark: Mark,
}

impl ScheduledMove {
    /// Session generation the move was scheduled in.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Position of the ticket among all tickets the session has issued.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Mark the engine will play.
    pub fn mark(&self) -> Mark {
        self.mark
    }
}

/// A game session.
pub struct Session {
    config: SessionConfig,
    board: Board,
    controller: TurnController,
    strategy: Box<dyn Strategy>,
    generation: u64,
    issued: u64,
    scheduled: Option<ScheduledMove>,
    observer: Option<AutomatedMoveObserver>,
}

/// Creates and starts a session with default settings for `participants`.
///
/// Automated moves resolve immediately; use [`Session::new`] with a
/// configured delay to hand them to a driver instead.
#[instrument]
pub fn new_session(participants: ParticipantCount) -> Session {
    Session::new(SessionConfig::new(participants).with_think_delay_ms(0))
}

impl Session {
    /// Creates a session and starts its first game.
    #[instrument(skip(config), fields(participants = %config.participants()))]
    pub fn new(config: SessionConfig) -> Self {
        let strategy = config.difficulty().strategy(*config.seed());
        let mut session = Self {
            board: Board::new(),
            controller: TurnController::new(*config.participants(), *config.human_mark()),
            strategy,
            generation: 0,
            issued: 0,
            scheduled: None,
            observer: None,
            config,
        };
        session.start(*session.config.participants());
        session
    }

    /// Starts a new game with the given participant count.
    ///
    /// Board and turn state are rebuilt from scratch and any automated move
    /// still pending from the previous game is invalidated.
    #[instrument(skip(self))]
    pub fn start(&mut self, participants: ParticipantCount) {
        self.config = self.config.clone().with_participants(participants);
        self.board = Board::new();
        self.controller = TurnController::new(participants, *self.config.human_mark());
        self.generation += 1;
        self.scheduled = None;
        info!(
            generation = self.generation,
            strategy = self.strategy.name(),
            "Game started"
        );
        self.schedule_if_automated();
        self.resolve_inline();
    }

    /// Starts again with the current participant count.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.start(*self.config.participants());
    }

    /// Registers the automated-move observer, replacing any previous one.
    pub fn set_observer(&mut self, observer: impl FnMut(usize, GameOutcome) + Send + 'static) {
        self.observer = Some(Box::new(observer));
    }

    /// Plays a human move.
    ///
    /// Occupied cells, moves after the game ended and moves on the engine's
    /// turn are ignored.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 9`.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn apply_human_move(&mut self, index: usize) {
        if let Err(rejection) = self.try_human_move(index) {
            debug!(%rejection, "Human move ignored");
        }
    }

    /// Plays a human move and reports why it was ignored, if it was.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn try_human_move(&mut self, index: usize) -> Result<MoveApplied, MoveRejection> {
        let applied = self.controller.apply_human_move(&mut self.board, index)?;
        if applied.outcome.is_terminal() {
            info!(outcome = %applied.outcome, "Game over");
        }
        self.schedule_if_automated();
        self.resolve_inline();
        Ok(applied)
    }

    /// The pending automated move, if one is waiting for its delay.
    pub fn scheduled(&self) -> Option<ScheduledMove> {
        self.scheduled
    }

    /// Lets the engine play a previously scheduled move.
    ///
    /// Returns `None` and leaves the session untouched if the ticket is stale:
    /// the session was reset since, or the move already landed. Every ticket
    /// carries its own sequence number, so an old ticket never matches a
    /// later engine turn of the same game.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn complete_scheduled(&mut self, ticket: ScheduledMove) -> Option<MoveApplied> {
        if ticket.generation != self.generation || self.scheduled != Some(ticket) {
            warn!(
                ticket_generation = ticket.generation,
                ticket_sequence = ticket.sequence,
                "Discarding stale automated move"
            );
            return None;
        }
        self.scheduled = None;

        let index = self.strategy.choose_move(&self.board, ticket.mark)?;
        let applied = match self.controller.apply_move(&mut self.board, index) {
            Ok(applied) => applied,
            Err(rejection) => {
                warn!(%rejection, index, "Strategy chose an illegal move");
                return None;
            }
        };

        info!(
            index,
            mark = %applied.mark,
            outcome = %applied.outcome,
            strategy = self.strategy.name(),
            "Automated move applied"
        );
        if let Some(observer) = self.observer.as_mut() {
            observer(applied.index, applied.outcome);
        }
        self.schedule_if_automated();
        Some(applied)
    }

    /// Plays every pending automated move right away.
    #[instrument(skip(self))]
    pub fn run_scheduled(&mut self) -> Vec<MoveApplied> {
        let mut applied = Vec::new();
        while let Some(ticket) = self.scheduled {
            match self.complete_scheduled(ticket) {
                Some(step) => applied.push(step),
                None => break,
            }
        }
        applied
    }

    fn schedule_if_automated(&mut self) {
        let Some(mark) = self.controller.automated_turn() else {
            return;
        };
        self.issued += 1;
        let ticket = ScheduledMove {
            generation: self.generation,
            sequence: self.issued,
            mark,
        };
        debug!(?ticket, "Automated move scheduled");
        self.scheduled = Some(ticket);
    }

    /// Without a think delay there is nothing to wait for.
    fn resolve_inline(&mut self) {
        if self.config.think_delay().is_zero() {
            self.run_scheduled();
        }
    }

    /// Outcome derived from the current board.
    pub fn outcome(&self) -> GameOutcome {
        GameOutcome::of(&self.board)
    }

    /// Copy of the cells for rendering.
    pub fn board_snapshot(&self) -> [Cell; CELL_COUNT] {
        *self.board.cells()
    }

    /// Read-only board access.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mark to move (the last mover once the game is over).
    pub fn current_mark(&self) -> Mark {
        self.controller.state().current_mark()
    }

    /// State machine phase.
    pub fn phase(&self) -> Phase {
        self.controller.phase(&self.board)
    }

    /// Turn state.
    pub fn turn_state(&self) -> &TurnState {
        self.controller.state()
    }

    /// Current generation; increases on every start and reset.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Active configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("board", &self.board)
            .field("controller", &self.controller)
            .field("strategy", &self.strategy.name())
            .field("generation", &self.generation)
            .field("issued", &self.issued)
            .field("scheduled", &self.scheduled)
            .finish_non_exhaustive()
    }
}
