use std::fmt;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use crate::bitboard::{render_board, BitBoard, Direction, Square, SquareError};
use crate::masks::{row, FIRST_ROW, LAST_ROW};
use crate::move_gen;

mod apply;
mod moves;

pub use moves::{Move, MAX_JUMPS};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum PositionError {
    #[error("illegal move: {0}")]
    IllegalMove(Move),

    #[error("no legal move matches {0}")]
    UnknownMove(String),

    #[error("more than one legal move matches {0}")]
    AmbiguousMove(String),

    #[error(transparent)]
    Square(#[from] SquareError),

    #[error("both sides have a piece on {0}")]
    Overlap(Square),

    #[error("king on {0} but no piece there")]
    KingWithoutPiece(Square),

    #[error("man on {0} should already have been promoted")]
    ManOnPromotionRow(Square),

    #[error("squares [{0}] do not make up a move")]
    MalformedMove(String),
}

#[derive(Debug, PartialEq, Eq, EnumIter, Clone, Copy, Display, Hash, Deserialize, Serialize)]
pub enum Side {
    Black,
    White,
}

impl Side {
    pub fn opposite_side(self) -> Side {
        if self == Side::Black {
            Side::White
        } else {
            Side::Black
        }
    }

    /// Directions a man of this side may step or jump in.
    pub const fn advancing_directions(self) -> &'static [Direction] {
        match self {
            Side::Black => &[Direction::RightForward, Direction::LeftForward],
            Side::White => &[Direction::RightBackward, Direction::LeftBackward],
        }
    }

    pub const fn promotion_row(self) -> BitBoard {
        match self {
            Side::Black => LAST_ROW,
            Side::White => FIRST_ROW,
        }
    }

    /// Row `idx` counted from this side's own back row.
    pub const fn relative_row(self, idx: u8) -> BitBoard {
        match self {
            Side::Black => row(idx),
            Side::White => row(7 - idx),
        }
    }
}

#[derive(Debug, PartialEq, Eq, EnumIter, Clone, Copy, Display, Hash, Deserialize, Serialize)]
pub enum Piece {
    Man,
    King,
}

impl Piece {
    fn to_char(self, side: Side) -> char {
        match (self, side) {
            (Piece::Man, Side::Black) => 'b',
            (Piece::King, Side::Black) => 'B',
            (Piece::Man, Side::White) => 'w',
            (Piece::King, Side::White) => 'W',
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub(crate) struct Sides {
    black: BitBoard,
    white: BitBoard,
}

impl Sides {
    fn new(black: BitBoard, white: BitBoard) -> Self {
        Self { black, white }
    }

    pub(crate) fn get(&self, side: Side) -> BitBoard {
        match side {
            Side::Black => self.black,
            Side::White => self.white,
        }
    }

    pub(crate) fn get_mut(&mut self, side: Side) -> &mut BitBoard {
        match side {
            Side::Black => &mut self.black,
            Side::White => &mut self.white,
        }
    }
}

/// A checkers position: who occupies which square and who is to move.
///
/// `pieces` holds men and kings of a side, `kings` the promoted subset. The two sides never share
/// a square. Outside of construction the only way to change a position is through
/// [`Position::make_move`] or [`Position::peek_move`], both of which keep these invariants.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPosition")]
pub struct Position {
    pub(crate) pieces: Sides,
    pub(crate) kings: Sides,
    pub(crate) active: Side,
}

#[derive(Deserialize)]
struct RawPosition {
    pieces: Sides,
    kings: Sides,
    active: Side,
}

impl TryFrom<RawPosition> for Position {
    type Error = PositionError;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        Position::new(
            raw.active,
            raw.pieces.black,
            raw.pieces.white,
            raw.kings.black,
            raw.kings.white,
        )
    }
}

impl Position {
    pub fn start() -> Self {
        Self {
            pieces: Sides::new(row(0) | row(1) | row(2), row(5) | row(6) | row(7)),
            kings: Sides::new(BitBoard::empty(), BitBoard::empty()),
            active: Side::Black,
        }
    }

    pub fn new(
        active: Side,
        black: BitBoard,
        white: BitBoard,
        black_kings: BitBoard,
        white_kings: BitBoard,
    ) -> Result<Self, PositionError> {
        if let Some(sq) = (black & white).lsb() {
            return Err(PositionError::Overlap(sq));
        }
        for (pieces, kings) in [(black, black_kings), (white, white_kings)] {
            if let Some(sq) = (kings & !pieces).lsb() {
                return Err(PositionError::KingWithoutPiece(sq));
            }
        }
        for (side, men) in [(Side::Black, black & !black_kings), (Side::White, white & !white_kings)]
        {
            if let Some(sq) = (men & side.promotion_row()).lsb() {
                return Err(PositionError::ManOnPromotionRow(sq));
            }
        }

        Ok(Self {
            pieces: Sides::new(black, white),
            kings: Sides::new(black_kings, white_kings),
            active,
        })
    }

    pub fn from_pieces(
        active: Side,
        piece_locs: &[(Square, Side, Piece)],
    ) -> Result<Self, PositionError> {
        let mut pieces = Sides::new(BitBoard::empty(), BitBoard::empty());
        let mut kings = Sides::new(BitBoard::empty(), BitBoard::empty());

        for &(sq, side, piece) in piece_locs {
            if (pieces.black | pieces.white).is_square_set(sq) {
                return Err(PositionError::Overlap(sq));
            }
            pieces.get_mut(side).set_square(sq);
            if piece == Piece::King {
                kings.get_mut(side).set_square(sq);
            }
        }

        Position::new(active, pieces.black, pieces.white, kings.black, kings.white)
    }

    pub fn active(&self) -> Side {
        self.active
    }

    pub fn passive(&self) -> Side {
        self.active.opposite_side()
    }

    pub fn pieces(&self, side: Side) -> BitBoard {
        self.pieces.get(side)
    }

    pub fn kings(&self, side: Side) -> BitBoard {
        self.kings.get(side)
    }

    pub fn men(&self, side: Side) -> BitBoard {
        self.pieces.get(side) & !self.kings.get(side)
    }

    pub fn occupied(&self) -> BitBoard {
        self.pieces.black | self.pieces.white
    }

    pub fn empty(&self) -> BitBoard {
        !self.occupied()
    }

    /// Pieces of `side` that may move toward square 32: every black piece, white kings only.
    pub fn forward(&self, side: Side) -> BitBoard {
        match side {
            Side::Black => self.pieces.black,
            Side::White => self.kings.white,
        }
    }

    /// Pieces of `side` that may move toward square 1: black kings only, every white piece.
    pub fn backward(&self, side: Side) -> BitBoard {
        match side {
            Side::Black => self.kings.black,
            Side::White => self.pieces.white,
        }
    }

    /// Active pieces allowed to move in `dir` that are not up against the edge in that
    /// direction. Whether the neighbouring square is free is left to the caller.
    pub fn movers(&self, dir: Direction) -> BitBoard {
        let capable = if dir.is_forward() {
            self.forward(self.active)
        } else {
            self.backward(self.active)
        };
        capable & !dir.blockers()
    }

    pub fn right_forward(&self) -> BitBoard {
        self.movers(Direction::RightForward)
    }

    pub fn left_forward(&self) -> BitBoard {
        self.movers(Direction::LeftForward)
    }

    pub fn right_backward(&self) -> BitBoard {
        self.movers(Direction::RightBackward)
    }

    pub fn left_backward(&self) -> BitBoard {
        self.movers(Direction::LeftBackward)
    }

    pub fn is_piece_at(&self, square: Square) -> Option<(Piece, Side)> {
        for side in Side::iter() {
            if self.pieces.get(side).is_square_set(square) {
                let piece = if self.kings.get(side).is_square_set(square) {
                    Piece::King
                } else {
                    Piece::Man
                };
                return Some((piece, side));
            }
        }

        None
    }

    pub fn get_piece_locs(&self) -> ArrayVec<(Piece, Side, Square), 32> {
        let mut piece_locs = ArrayVec::new();
        for side in Side::iter() {
            for sq in self.pieces.get(side).to_squares() {
                let piece = if self.kings.get(side).is_square_set(sq) {
                    Piece::King
                } else {
                    Piece::Man
                };
                piece_locs.push((piece, side, sq));
            }
        }
        piece_locs
    }

    /// Every legal move for the side to move. Empty when that side has lost.
    pub fn get_moves(&self) -> Vec<Move> {
        move_gen::gen_moves(self)
    }

    /// Whether the side to move can capture the piece on `square`.
    pub fn takeable(&self, square: Square) -> bool {
        move_gen::is_takeable(self, square)
    }

    /// Looks up a legal move by its notation. Full chains (`1x10x19`) match exactly; a capture
    /// given only by its end points (`1x19`) matches when a single chain fits.
    pub fn parse_move(&self, notation: &str) -> Result<Move, PositionError> {
        let notation = notation.trim();
        let moves = self.get_moves();

        if let Some(mve) = moves.iter().find(|mve| mve.to_string() == notation) {
            return Ok(mve.clone());
        }

        let ends = notation
            .split('x')
            .map(str::parse::<Square>)
            .collect::<Result<Vec<_>, _>>();
        let (src, dest) = match ends.as_deref() {
            Ok([src, dest]) => (*src, *dest),
            _ => return Err(PositionError::UnknownMove(notation.to_string())),
        };

        let mut candidates = moves
            .into_iter()
            .filter(|mve| mve.is_capture() && mve.src() == src && mve.dest() == dest);
        match (candidates.next(), candidates.next()) {
            (Some(mve), None) => Ok(mve),
            (Some(_), Some(_)) => Err(PositionError::AmbiguousMove(notation.to_string())),
            _ => Err(PositionError::UnknownMove(notation.to_string())),
        }
    }

    /// The same board with `active` to move.
    pub fn with_active(&self, active: Side) -> Position {
        Position {
            active,
            ..self.clone()
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let board_str = render_board(|sq| match self.is_piece_at(sq) {
            Some((piece, side)) => piece.to_char(side),
            None => '.',
        });
        write!(f, "{}", board_str)
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} to move", self.active)?;
        write!(f, "{}", self)
    }
}
