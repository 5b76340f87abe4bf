use tracing::debug;

use super::{Move, Position, PositionError};
use crate::incr;
use crate::metrics::MOVES_APPLIED;

impl Position {
    /// Returns the position after `mve`, leaving `self` untouched.
    pub fn peek_move(&self, mve: &Move) -> Result<Position, PositionError> {
        if !self.get_moves().contains(mve) {
            debug!("rejected {} with {} to move", mve, self.active);
            return Err(PositionError::IllegalMove(mve.clone()));
        }
        Ok(self.apply_unchecked(mve))
    }

    /// Plays `mve` on this position.
    pub fn make_move(&mut self, mve: &Move) -> Result<(), PositionError> {
        *self = self.peek_move(mve)?;
        Ok(())
    }

    /// Plays a move known to come from `gen_moves` on this exact position.
    pub(crate) fn apply_unchecked(&self, mve: &Move) -> Position {
        let mut next = self.clone();
        next.relocate(mve);
        next.active = self.passive();
        next
    }

    /// Moves the active piece along `mve`, removes what it captured and promotes it if it
    /// reached its last row anywhere along the way. The side to move is left as is.
    pub(crate) fn relocate(&mut self, mve: &Move) {
        incr!(MOVES_APPLIED);

        let side = self.active;
        let opp_side = self.passive();
        let (src, dest) = (mve.src(), mve.dest());

        debug_assert!(
            self.pieces.get(side).is_square_set(src),
            "no {} piece on {}\n{:?}",
            side,
            src,
            self
        );

        let was_king = self.kings.get(side).is_square_set(src);
        self.pieces.get_mut(side).move_piece(src, dest);
        if was_king {
            self.kings.get_mut(side).move_piece(src, dest);
        }

        let captured = mve.captures();
        *self.pieces.get_mut(opp_side) &= !captured;
        *self.kings.get_mut(opp_side) &= !captured;

        let promotion_row = side.promotion_row();
        if !was_king && mve.path()[1..].iter().any(|&sq| promotion_row.is_square_set(sq)) {
            self.kings.get_mut(side).set_square(dest);
        }
    }
}
