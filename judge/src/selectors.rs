//! Misbehaving selectors for exercising forfeits.

use dots::{GameState, Move, MoveSelector};

/// Plays a move that is always out of bounds.
pub(crate) struct OffBoard;

impl MoveSelector for OffBoard {
    fn select_move(&mut self, state: &GameState) -> Option<Move> {
        state
            .legal_moves()
            .next()
            .map(|mv| Move::new(state.rows(), mv.col, mv.direction))
    }
}

/// Never has a move.
pub(crate) struct Silent;

impl MoveSelector for Silent {
    fn select_move(&mut self, _state: &GameState) -> Option<Move> {
        None
    }
}
