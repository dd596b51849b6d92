//! Turn sequencing state machine.
//!
//! ```text
//! AwaitingMove(m) --legal move--> Evaluating --+--> AwaitingMove(m.opponent())
//!                                              +--> Terminal(Win(m) | Draw)
//! ```
//!
//! `Terminal` is absorbing until the session resets. Human and automated
//! moves share [`TurnController::apply_move`], so legality and win/draw
//! evaluation exist in one place only.

use crate::{Board, GameOutcome, Mark};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Number of human participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ParticipantCount {
    /// Both marks automated (self-play).
    Zero,
    /// One human against the engine.
    #[default]
    One,
    /// Two humans, no engine.
    Two,
}

impl ParticipantCount {
    /// Returns the count as a number.
    pub fn humans(self) -> u8 {
        match self {
            ParticipantCount::Zero => 0,
            ParticipantCount::One => 1,
            ParticipantCount::Two => 2,
        }
    }
}

impl TryFrom<u8> for ParticipantCount {
    type Error = InvalidParticipantCount;

    fn try_from(count: u8) -> Result<Self, Self::Error> {
        match count {
            0 => Ok(ParticipantCount::Zero),
            1 => Ok(ParticipantCount::One),
            2 => Ok(ParticipantCount::Two),
            other => Err(InvalidParticipantCount(other)),
        }
    }
}

impl From<ParticipantCount> for u8 {
    fn from(count: ParticipantCount) -> Self {
        count.humans()
    }
}

impl std::fmt::Display for ParticipantCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.humans())
    }
}

/// Participant count outside 0..=2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("participant count must be 0, 1 or 2, got {}", _0)]
pub struct InvalidParticipantCount(#[error(not(source))] pub u8);

/// Why a move was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum MoveRejection {
    /// The cell already holds a mark.
    #[display("Cell {} is already occupied", _0)]
    CellOccupied(#[error(not(source))] usize),

    /// The game has ended.
    #[display("Game is already over")]
    GameOver,

    /// The mark to move belongs to the engine.
    #[display("It's {}'s turn and {} is automated", _0, _0)]
    NotHumanTurn(#[error(not(source))] Mark),
}

/// Observable phase of the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the given mark to play.
    AwaitingMove(Mark),
    /// Game over.
    Terminal(GameOutcome),
}

/// Whose turn it is and whether the game is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnState {
    current_mark: Mark,
    participants: ParticipantCount,
    human_mark: Mark,
    terminal: bool,
}

impl TurnState {
    /// Fresh state: X to move, game open.
    pub fn new(participants: ParticipantCount, human_mark: Mark) -> Self {
        Self {
            current_mark: Mark::X,
            participants,
            human_mark,
            terminal: false,
        }
    }

    /// Mark to move (the last mover once terminal).
    pub fn current_mark(&self) -> Mark {
        self.current_mark
    }

    /// Configured participant count.
    pub fn participants(&self) -> ParticipantCount {
        self.participants
    }

    /// Mark played by the single human in one-participant games.
    pub fn human_mark(&self) -> Mark {
        self.human_mark
    }

    /// True once a win or draw has been reached.
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Returns true if `mark` is played by the engine.
    pub fn is_automated(&self, mark: Mark) -> bool {
        match self.participants {
            ParticipantCount::Zero => true,
            ParticipantCount::One => mark != self.human_mark,
            ParticipantCount::Two => false,
        }
    }
}

/// A move that was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveApplied {
    /// Cell played.
    pub index: usize,
    /// Mark placed.
    pub mark: Mark,
    /// Outcome after the move.
    pub outcome: GameOutcome,
}

/// Applies moves to a board and tracks turn alternation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnController {
    state: TurnState,
}

impl TurnController {
    /// Creates a controller for a new game.
    #[instrument]
    pub fn new(participants: ParticipantCount, human_mark: Mark) -> Self {
        Self {
            state: TurnState::new(participants, human_mark),
        }
    }

    /// Returns the turn state.
    pub fn state(&self) -> &TurnState {
        &self.state
    }

    /// Current phase, with the outcome derived from `board`.
    pub fn phase(&self, board: &Board) -> Phase {
        if self.state.terminal {
            Phase::Terminal(GameOutcome::of(board))
        } else {
            Phase::AwaitingMove(self.state.current_mark)
        }
    }

    /// Mark the engine should move now, if any.
    pub fn automated_turn(&self) -> Option<Mark> {
        let mark = self.state.current_mark;
        (!self.state.terminal && self.state.is_automated(mark)).then_some(mark)
    }

    /// Places the current mark at `index` and evaluates the result.
    ///
    /// On rejection neither the board nor the turn state change.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 9`.
    #[instrument(skip(self, board), fields(mark = %self.state.current_mark))]
    pub fn apply_move(
        &mut self,
        board: &mut Board,
        index: usize,
    ) -> Result<MoveApplied, MoveRejection> {
        if self.state.terminal {
            return Err(MoveRejection::GameOver);
        }
        if !board.is_empty(index) {
            return Err(MoveRejection::CellOccupied(index));
        }

        let mark = self.state.current_mark;
        board.place(index, mark);

        let outcome = if board.check_win(mark) {
            GameOutcome::Win(mark)
        } else if board.check_draw() {
            GameOutcome::Draw
        } else {
            GameOutcome::InProgress
        };

        if outcome.is_terminal() {
            self.state.terminal = true;
        } else {
            self.state.current_mark = mark.opponent();
        }

        debug!(index, %outcome, "Move applied");
        Ok(MoveApplied {
            index,
            mark,
            outcome,
        })
    }

    /// Like [`apply_move`](Self::apply_move), but only on a human turn.
    #[instrument(skip(self, board))]
    pub fn apply_human_move(
        &mut self,
        board: &mut Board,
        index: usize,
    ) -> Result<MoveApplied, MoveRejection> {
        if self.state.terminal {
            return Err(MoveRejection::GameOver);
        }
        if let Some(mark) = self.automated_turn() {
            return Err(MoveRejection::NotHumanTurn(mark));
        }
        self.apply_move(board, index)
    }
}
