use arrayvec::ArrayVec;
use tracing::trace;

use crate::bitboard::{BitBoard, Direction, Square};
use crate::incr;
use crate::metrics::CHAINS_EXPANDED;
use crate::position::{Move, Position, Side, MAX_JUMPS};

const ALL_DIRECTIONS: &[Direction] = &[
    Direction::RightForward,
    Direction::LeftForward,
    Direction::RightBackward,
    Direction::LeftBackward,
];

/// A chain still being extended, along with the board as the jumping piece sees it.
#[derive(Clone)]
struct PartialChain {
    path: ArrayVec<Square, { MAX_JUMPS + 1 }>,
    victims: BitBoard,
    empty: BitBoard,
    king: bool,
}

impl PartialChain {
    fn at(&self) -> Square {
        self.path[self.path.len() - 1]
    }

    fn directions(&self, side: Side) -> &'static [Direction] {
        if self.king {
            ALL_DIRECTIONS
        } else {
            side.advancing_directions()
        }
    }

    fn jump(&self, dir: Direction) -> Option<(Square, Square)> {
        let victim = self.at().shift(dir)?;
        if !self.victims.is_square_set(victim) {
            return None;
        }
        let landing = victim.shift(dir)?;
        self.empty
            .is_square_set(landing)
            .then_some((victim, landing))
    }
}

/// Pushes every complete jump chain for the piece on `src` onto `moves`.
///
/// Chains are grown from an explicit stack. Captured pieces leave the board as soon as they are
/// jumped and a man that lands on its last row jumps on as a king.
pub(super) fn gen_chains(position: &Position, src: Square, moves: &mut Vec<Move>) {
    let side = position.active();
    let promotion_row = side.promotion_row();
    let found_before = moves.len();

    let mut path = ArrayVec::new();
    path.push(src);
    let mut stack = vec![PartialChain {
        path,
        victims: position.pieces(position.passive()),
        empty: position.empty(),
        king: position.kings(side).is_square_set(src),
    }];

    while let Some(chain) = stack.pop() {
        incr!(CHAINS_EXPANDED);

        let mut extended = false;
        for &dir in chain.directions(side).iter().rev() {
            let Some((victim, landing)) = chain.jump(dir) else {
                continue;
            };

            let mut next = chain.clone();
            next.path.push(landing);
            next.victims.clear_square(victim);
            next.empty.set_square(victim);
            next.empty.set_square(chain.at());
            next.empty.clear_square(landing);
            next.king |= promotion_row.is_square_set(landing);

            stack.push(next);
            extended = true;
        }

        if !extended && chain.path.len() > 1 {
            moves.push(Move::chain(chain.path));
        }
    }

    trace!("{} chains from {}", moves.len() - found_before, src);
}
