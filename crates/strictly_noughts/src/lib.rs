//! Strictly Noughts - tic-tac-toe turn engine with a minimax opponent
//!
//! # Architecture
//!
//! - **Board**: nine cells plus win/draw predicates
//! - **Search**: exhaustive, deterministic minimax
//! - **Strategy**: pluggable move selection (minimax or random)
//! - **Controller**: turn alternation and terminal detection
//! - **Session**: start/reset lifecycle with generation-tagged automated moves
//! - **Driver**: Tokio task that lands automated moves after a thinking delay
//!
//! # Example
//!
//! ```
//! use strictly_noughts::{new_session, Cell, Mark, ParticipantCount};
//!
//! let mut session = new_session(ParticipantCount::One);
//! session.apply_human_move(0);
//! assert_eq!(session.board_snapshot()[4], Cell::Occupied(Mark::O));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod controller;
mod driver;
mod outcome;
mod session;
mod strategy;
mod types;

pub mod rules;
pub mod search;

// Crate-level exports - Board types
pub use types::{Board, CELL_COUNT, Cell, Mark};

// Crate-level exports - Outcome
pub use outcome::GameOutcome;

// Crate-level exports - Search
pub use search::SearchOutcome;

// Crate-level exports - Strategies
pub use strategy::{Difficulty, MinimaxStrategy, RandomStrategy, Strategy};

// Crate-level exports - Turn controller
pub use controller::{
    InvalidParticipantCount, MoveApplied, MoveRejection, ParticipantCount, Phase, TurnController,
    TurnState,
};

// Crate-level exports - Session management
pub use config::{ConfigError, SessionConfig};
pub use session::{AutomatedMoveObserver, ScheduledMove, Session, new_session};

// Crate-level exports - Async driver
pub use driver::{DriverError, GameEvent, SessionDriver, SessionView};
