mod chains;

use strum::IntoEnumIterator;
use tracing::trace;

use crate::bitboard::{BitBoard, Direction, Square};
use crate::incr;
use crate::metrics::MOVES_GENERATED;
use crate::position::{Move, Position};

/// Active pieces that can start a jump in `dir`: the neighbour that way is a passive piece and
/// the square past it is empty.
fn jump_sources(position: &Position, dir: Direction) -> BitBoard {
    let victims =
        position.movers(dir).shift(dir) & position.pieces(position.passive()) & !dir.blockers();
    let landings = victims.shift(dir) & position.empty();
    landings.shift(dir.opposite()).shift(dir.opposite())
}

/// Every active piece with at least one jump available.
pub fn gen_jumpers(position: &Position) -> BitBoard {
    Direction::iter().fold(BitBoard::empty(), |jumpers, dir| {
        jumpers | jump_sources(position, dir)
    })
}

/// Single steps for the side to move, ignoring whether a capture is forced.
pub(crate) fn gen_steps(position: &Position) -> Vec<Move> {
    let empty = position.empty();
    let mut moves = Vec::with_capacity(32);

    for dir in Direction::iter() {
        let mut srcs = position.movers(dir) & empty.shift(dir.opposite());
        while let Some(src) = srcs.pop_lsb() {
            if let Some(dest) = src.shift(dir) {
                moves.push(Move::step(src, dest));
            }
        }
    }

    moves
}

/// Legal moves for the side to move.
///
/// Whenever any jump exists only complete jump chains are returned, one per distinct path. A
/// chain is only complete once its piece has no further jump from where it landed.
pub fn gen_moves(position: &Position) -> Vec<Move> {
    let mut jumpers = gen_jumpers(position);

    let moves = if jumpers.is_empty() {
        gen_steps(position)
    } else {
        let mut moves = Vec::with_capacity(8);
        while let Some(src) = jumpers.pop_lsb() {
            chains::gen_chains(position, src, &mut moves);
        }
        trace!("{} capture chains for {}", moves.len(), position.active());
        moves
    };

    incr!(MOVES_GENERATED, moves.len());
    moves
}

/// Whether the side to move has a capture that takes the piece on `square`.
pub fn is_takeable(position: &Position, square: Square) -> bool {
    if !position.pieces(position.passive()).is_square_set(square) {
        return false;
    }
    gen_moves(position)
        .iter()
        .any(|mve| mve.captures().is_square_set(square))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::Square::*;
    use crate::position::{Piece, Side};
    use std::collections::HashSet;
    use test_case::test_case;
    use testresult::TestResult;

    fn notations(moves: &[Move]) -> HashSet<String> {
        moves.iter().map(|mve| mve.to_string()).collect()
    }

    #[test]
    fn test_start_moves() {
        let moves = gen_moves(&Position::start());

        assert_eq!(moves.len(), 7);
        assert!(moves.iter().all(|mve| !mve.is_capture()));
        assert_eq!(
            notations(&moves),
            HashSet::from(
                ["9-13", "9-14", "10-14", "10-15", "11-15", "11-16", "12-16"].map(String::from)
            )
        );
    }

    #[test]
    fn test_start_moves_white() -> TestResult {
        let mut position = Position::start();
        position.make_move(&position.parse_move("9-13")?)?;

        let moves = gen_moves(&position);

        assert_eq!(moves.len(), 7);
        assert_eq!(
            notations(&moves),
            HashSet::from(
                ["21-17", "22-17", "22-18", "23-18", "23-19", "24-19", "24-20"].map(String::from)
            )
        );
        Ok(())
    }

    #[test]
    fn test_forced_capture() -> TestResult {
        // Black has quiet moves on the other wing, but 14x23 must be played
        let position = Position::from_pieces(
            Side::Black,
            &[
                (S14, Side::Black, Piece::Man),
                (S1, Side::Black, Piece::Man),
                (S4, Side::Black, Piece::Man),
                (S18, Side::White, Piece::Man),
                (S30, Side::White, Piece::Man),
            ],
        )?;

        let moves = gen_moves(&position);

        assert_eq!(notations(&moves), HashSet::from(["14x23".to_string()]));
        assert_eq!(moves[0].captures(), BitBoard::from_square(S18));
        Ok(())
    }

    #[test]
    fn test_double_jump_is_one_move() -> TestResult {
        let position = Position::from_pieces(
            Side::Black,
            &[
                (S1, Side::Black, Piece::Man),
                (S6, Side::White, Piece::Man),
                (S15, Side::White, Piece::Man),
            ],
        )?;

        let moves = gen_moves(&position);

        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].to_string(), "1x10x19");
        assert_eq!(moves[0].captures(), BitBoard::from_squares(&[S6, S15]));
        Ok(())
    }

    #[test]
    fn test_branching_chains() -> TestResult {
        // After 1x10 the man can carry on over 14 or over 15
        let position = Position::from_pieces(
            Side::Black,
            &[
                (S1, Side::Black, Piece::Man),
                (S6, Side::White, Piece::Man),
                (S14, Side::White, Piece::Man),
                (S15, Side::White, Piece::Man),
            ],
        )?;

        let moves = gen_moves(&position);

        assert_eq!(
            notations(&moves),
            HashSet::from(["1x10x17", "1x10x19"].map(String::from))
        );
        Ok(())
    }

    #[test]
    fn test_man_does_not_jump_backward() -> TestResult {
        let position = Position::from_pieces(
            Side::Black,
            &[(S14, Side::Black, Piece::Man), (S10, Side::White, Piece::Man)],
        )?;

        let moves = gen_moves(&position);

        assert!(moves.iter().all(|mve| !mve.is_capture()));
        assert_eq!(notations(&moves), HashSet::from(["14-17", "14-18"].map(String::from)));
        Ok(())
    }

    #[test]
    fn test_king_jumps_backward() -> TestResult {
        let position = Position::from_pieces(
            Side::Black,
            &[(S14, Side::Black, Piece::King), (S10, Side::White, Piece::Man)],
        )?;

        let moves = gen_moves(&position);

        assert_eq!(notations(&moves), HashSet::from(["14x7".to_string()]));
        Ok(())
    }

    #[test]
    fn test_king_chain_turns_corner() -> TestResult {
        // Forward over 18, then backward over 19
        let position = Position::from_pieces(
            Side::White,
            &[
                (S14, Side::White, Piece::King),
                (S18, Side::Black, Piece::Man),
                (S19, Side::Black, Piece::Man),
            ],
        )?;

        let moves = gen_moves(&position);

        assert_eq!(notations(&moves), HashSet::from(["14x23x16".to_string()]));
        Ok(())
    }

    #[test]
    fn test_promotion_mid_chain_continues_as_king() -> TestResult {
        // Crowned on 30, the piece carries on backward over 25
        let position = Position::from_pieces(
            Side::Black,
            &[
                (S23, Side::Black, Piece::Man),
                (S26, Side::White, Piece::Man),
                (S25, Side::White, Piece::Man),
            ],
        )?;

        let moves = gen_moves(&position);

        assert_eq!(notations(&moves), HashSet::from(["23x30x21".to_string()]));
        let next = position.peek_move(&moves[0])?;
        assert_eq!(next.is_piece_at(S21), Some((Piece::King, Side::Black)));
        assert!(next.pieces(Side::White).is_empty());
        Ok(())
    }

    #[test]
    fn test_no_moves_when_blocked() -> TestResult {
        let position = Position::from_pieces(
            Side::Black,
            &[
                (S4, Side::Black, Piece::Man),
                (S8, Side::White, Piece::Man),
                (S11, Side::White, Piece::Man),
            ],
        )?;

        assert!(gen_moves(&position).is_empty());
        Ok(())
    }

    #[test_case(S18, true ; "capturable")]
    #[test_case(S30, false ; "out of reach")]
    #[test_case(S14, false ; "own piece")]
    #[test_case(S20, false ; "empty square")]
    fn test_is_takeable(square: Square, want: bool) -> TestResult {
        let position = Position::from_pieces(
            Side::Black,
            &[
                (S14, Side::Black, Piece::Man),
                (S18, Side::White, Piece::Man),
                (S30, Side::White, Piece::Man),
            ],
        )?;

        assert_eq!(is_takeable(&position, square), want);
        assert_eq!(position.takeable(square), want);
        Ok(())
    }

    #[test]
    fn test_gen_jumpers() -> TestResult {
        let position = Position::from_pieces(
            Side::Black,
            &[
                (S14, Side::Black, Piece::Man),
                (S15, Side::Black, Piece::Man),
                (S1, Side::Black, Piece::Man),
                (S18, Side::White, Piece::Man),
            ],
        )?;

        assert_eq!(gen_jumpers(&position), BitBoard::from_squares(&[S14, S15]));
        Ok(())
    }
}
