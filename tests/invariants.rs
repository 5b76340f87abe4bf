use checkers::Square::*;
use checkers::masks::VALID_SQUARES;
use checkers::{gen_jumpers, BitBoard, Move, Piece, Position, Side};

use test_case::test_case;

fn total_pieces(position: &Position) -> u32 {
    u32::from(position.occupied().num_squares_set())
}

fn check_position(position: &Position) {
    let black = position.pieces(Side::Black);
    let white = position.pieces(Side::White);

    assert!((black & white).is_empty(), "overlap\n{:?}", position);
    assert_eq!((black | white).to_val() & !VALID_SQUARES.to_val(), 0);
    for side in [Side::Black, Side::White] {
        let kings = position.kings(side);
        assert_eq!(kings & position.pieces(side), kings, "stray king\n{:?}", position);
    }
    assert_eq!(position.empty() & position.occupied(), BitBoard::empty());
}

fn check_move(before: &Position, mve: &Move, after: &Position) {
    let mover = before.active();
    let opp = before.passive();

    check_position(after);

    assert_eq!(after.active(), opp);
    assert_eq!(
        total_pieces(after),
        total_pieces(before) - mve.num_captures() as u32,
        "{} miscounted\n{:?}",
        mve,
        before
    );

    // Kings stay kings unless captured
    let mut mover_kings = before.kings(mover);
    if mover_kings.is_square_set(mve.src()) {
        mover_kings.move_piece(mve.src(), mve.dest());
    }
    assert_eq!(after.kings(mover) & mover_kings, mover_kings);
    assert_eq!(after.kings(opp), before.kings(opp) & !mve.captures());

    if mve.is_capture() {
        // The same piece, moving again, would have nothing left to jump
        let again = after.with_active(mover);
        assert!(
            !gen_jumpers(&again).is_square_set(mve.dest()),
            "{} stopped early\n{:?}",
            mve,
            before
        );
    }
}

fn walk(position: &Position, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = position.get_moves();
    if moves.iter().any(Move::is_capture) {
        assert!(moves.iter().all(Move::is_capture), "step offered next to a capture");
    }

    let mut nodes = 0;
    for mve in &moves {
        let after = position.peek_move(mve).unwrap();
        check_move(position, mve, &after);
        nodes += walk(&after, depth - 1);
    }
    nodes
}

#[test_case(Position::start(), 6 ; "start")]
#[test_case(Position::from_pieces(Side::White, &[
    (S14, Side::White, Piece::King),
    (S18, Side::Black, Piece::Man),
    (S19, Side::Black, Piece::Man),
    (S10, Side::Black, Piece::Man),
    (S27, Side::Black, Piece::King),
    (S6, Side::White, Piece::Man),
]).unwrap(), 5 ; "kings")]
#[test_case(Position::from_pieces(Side::Black, &[
    (S23, Side::Black, Piece::Man),
    (S24, Side::Black, Piece::Man),
    (S26, Side::White, Piece::Man),
    (S25, Side::White, Piece::Man),
    (S11, Side::White, Piece::Man),
    (S15, Side::White, Piece::King),
]).unwrap(), 5 ; "crowning")]
fn test_invariants_hold_through_tree(position: Position, depth: usize) {
    check_position(&position);
    assert!(walk(&position, depth) > 0);
}

#[test]
fn test_make_move_matches_peek_move() {
    let mut position = Position::start();

    for _ in 0..40 {
        let moves = position.get_moves();
        let Some(mve) = moves.last() else {
            break;
        };
        let peeked = position.peek_move(mve).unwrap();
        position.make_move(mve).unwrap();
        assert_eq!(position, peeked);
    }
}

#[test]
fn test_peeked_branches_are_independent() {
    let start = Position::start();
    let branches: Vec<Position> = start
        .get_moves()
        .iter()
        .map(|mve| start.peek_move(mve).unwrap())
        .collect();

    assert_eq!(start, Position::start());
    for (i, a) in branches.iter().enumerate() {
        for b in &branches[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn test_peek_move_across_threads() {
    let start = Position::start();
    let handles: Vec<_> = start
        .get_moves()
        .into_iter()
        .map(|mve| {
            let root = start.clone();
            std::thread::spawn(move || {
                let after = root.peek_move(&mve).unwrap();
                checkers::perft(&after, 3).1
            })
        })
        .collect();

    let tot: u64 = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(tot, checkers::perft(&start, 4).1);
}
