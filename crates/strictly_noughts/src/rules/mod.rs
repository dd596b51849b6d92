//! Game rules for noughts and crosses.
//!
//! Pure functions over a [`Board`](crate::Board). Rules are kept apart from
//! board storage so the search, the turn controller and the outcome
//! projection all read the same predicates.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{WIN_LINES, WinLine, has_line};
