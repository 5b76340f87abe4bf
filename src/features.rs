//! Positional features from Samuel's checkers player.
//!
//! Every feature is scored for the position as it stands, with `active` the side to move. Features
//! describing the passive side are meant to be read after the active side's reply has been
//! played, which is how a search over [`Position::peek_move`] will present them.

use std::fmt;

use serde::Serialize;
use tabled::{Table, Tabled};

use crate::bitboard::{BitBoard, Square};
use crate::masks::{CENTER, EVEN_ROWS};
use crate::move_gen::{gen_jumpers, gen_steps};
use crate::position::{Move, Position, Side};

/// ADV: passive men on their fifth and sixth rows, less those on their third and fourth.
pub fn advancement(position: &Position) -> i32 {
    let passive = position.passive();
    let men = position.men(passive);

    let near = passive.relative_row(2) | passive.relative_row(3);
    let far = passive.relative_row(4) | passive.relative_row(5);

    i32::from((men & far).num_squares_set()) - i32::from((men & near).num_squares_set())
}

/// BACK: 1 when the active side has no king and the passive side holds both bridge squares.
pub fn back_row_bridge(position: &Position) -> i32 {
    if !position.kings(position.active()).is_empty() {
        return 0;
    }

    let bridge = match position.passive() {
        Side::Black => BitBoard::from_squares(&[Square::S1, Square::S3]),
        Side::White => BitBoard::from_squares(&[Square::S30, Square::S32]),
    };

    i32::from(position.pieces(position.passive()) & bridge == bridge)
}

/// CENT: passive men on the central squares.
pub fn center_control(position: &Position) -> i32 {
    i32::from((position.men(position.passive()) & CENTER).num_squares_set())
}

/// CNTR: central squares held by an active piece, plus central squares some legal move ends on.
pub fn center_control_active(position: &Position) -> i32 {
    let held = position.pieces(position.active()) & CENTER;
    let reachable: BitBoard = position.get_moves().iter().map(Move::dest).collect();

    i32::from(held.num_squares_set()) + i32::from((reachable & CENTER).num_squares_set())
}

/// KCENT: passive kings on the central squares.
pub fn king_center_control(position: &Position) -> i32 {
    i32::from((position.kings(position.passive()) & CENTER).num_squares_set())
}

fn step_destinations(position: &Position) -> BitBoard {
    gen_steps(position).iter().map(Move::dest).collect()
}

/// MOB: squares the active side could step onto, whether or not a capture is forced.
pub fn total_mobility(position: &Position) -> i32 {
    i32::from(step_destinations(position).num_squares_set())
}

/// DENY: mobility squares where a piece that steps there can be taken without a recapture.
pub fn denial_of_occupancy(position: &Position) -> i32 {
    let mut denied = BitBoard::empty();

    for step in gen_steps(position) {
        let dest = step.dest();
        if denied.is_square_set(dest) {
            continue;
        }

        let after = position.apply_unchecked(&step);
        let lost = after
            .get_moves()
            .iter()
            .filter(|reply| reply.captures().is_square_set(dest))
            .any(|reply| !after.apply_unchecked(reply).takeable(reply.dest()));

        if lost {
            denied.set_square(dest);
        }
    }

    i32::from(denied.num_squares_set())
}

/// MOBIL: mobility left once denied squares are discounted.
pub fn undenied_mobility(position: &Position) -> i32 {
    total_mobility(position) - denial_of_occupancy(position)
}

/// MOVE: 1 when material is level and below 24 (men count 2, kings 3) and an odd number of
/// pieces stand in the active side's move system, the files starting on its own back row.
pub fn move_parity(position: &Position) -> i32 {
    let material = |side: Side| {
        2 * i32::from(position.men(side).num_squares_set())
            + 3 * i32::from(position.kings(side).num_squares_set())
    };
    let (black, white) = (material(Side::Black), material(Side::White));
    if black != white || black + white >= 24 {
        return 0;
    }

    let system = match position.active() {
        Side::Black => EVEN_ROWS,
        Side::White => !EVEN_ROWS,
    };

    i32::from((position.occupied() & system).num_squares_set() % 2 == 1)
}

/// THRET: squares an active piece can step onto and, from there, threaten a capture next turn.
pub fn threat(position: &Position) -> i32 {
    let mut threatening = BitBoard::empty();

    for step in gen_steps(position) {
        let mut after = position.clone();
        after.relocate(&step);
        if gen_jumpers(&after).is_square_set(step.dest()) {
            threatening.set_square(step.dest());
        }
    }

    i32::from(threatening.num_squares_set())
}

/// All features for one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Tabled)]
pub struct SamuelFeatures {
    pub adv: i32,
    pub back: i32,
    pub cent: i32,
    pub cntr: i32,
    pub deny: i32,
    pub kcent: i32,
    pub mob: i32,
    pub mobil: i32,
    #[tabled(rename = "move")]
    #[serde(rename = "move")]
    pub mov: i32,
    pub thret: i32,
}

impl SamuelFeatures {
    pub fn extract(position: &Position) -> Self {
        let mob = total_mobility(position);
        let deny = denial_of_occupancy(position);

        Self {
            adv: advancement(position),
            back: back_row_bridge(position),
            cent: center_control(position),
            cntr: center_control_active(position),
            deny,
            kcent: king_center_control(position),
            mob,
            mobil: mob - deny,
            mov: move_parity(position),
            thret: threat(position),
        }
    }
}

impl fmt::Display for SamuelFeatures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Table::new([self]))
    }
}
