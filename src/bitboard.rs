use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{EnumIter, FromRepr};

use crate::masks::{FILE_A, FILE_H, FIRST_ROW, LAST_ROW, VALID_SQUARES};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SquareError {
    #[error("square: want 1 <= x <= 32, got {0}")]
    IllegalSquare(u8),

    #[error("square: can't parse {0}")]
    Parse(String),

    #[error("bitboard has bits outside the playable squares: {0:#x}")]
    OutsideBoard(u64),
}

/// One of the 32 playable squares, in standard checkers numbering. `S1` is the first square of
/// Black's home row and `S32` the last square of White's.
#[allow(dead_code)]
#[rustfmt::skip]
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, FromRepr, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub enum Square {
    S1,  S2,  S3,  S4,
    S5,  S6,  S7,  S8,
    S9,  S10, S11, S12,
    S13, S14, S15, S16,
    S17, S18, S19, S20,
    S21, S22, S23, S24,
    S25, S26, S27, S28,
    S29, S30, S31, S32,
}

impl Square {
    pub const fn number(self) -> u8 {
        self as u8 + 1
    }

    /// Row counted from Black's home row, 0..8.
    pub const fn row(self) -> u8 {
        self as u8 / 4
    }

    /// Position inside the packed word. Rows take four bits each and every second row is
    /// followed by a guard bit, which keeps all four diagonal neighbours at a fixed offset.
    pub const fn bit(self) -> u8 {
        let row = self.row();
        4 * row + self as u8 % 4 + row / 2
    }

    pub const fn from_bit(bit: u8) -> Option<Square> {
        if bit >= 35 {
            return None;
        }
        let in_pair = bit % 9;
        if in_pair == 8 {
            return None;
        }
        let row = 2 * (bit / 9) + in_pair / 4;
        Square::from_repr(row * 4 + in_pair % 4)
    }

    pub(crate) const fn from_index(idx: u8) -> Square {
        match Square::from_repr(idx) {
            Some(sq) => sq,
            None => panic!("square out of bounds"),
        }
    }

    pub fn shift(self, dir: Direction) -> Option<Square> {
        BitBoard::from_square(self).shift(dir).lsb()
    }

    /// Square jumped over when leaping from `self` to `other`.
    pub(crate) fn between(self, other: Square) -> Option<Square> {
        let (lo, hi) = (self.bit().min(other.bit()), self.bit().max(other.bit()));
        match hi - lo {
            8 | 10 => Square::from_bit(lo + (hi - lo) / 2),
            _ => None,
        }
    }
}

impl TryFrom<u8> for Square {
    type Error = SquareError;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        match number {
            1..=32 => Ok(Square::from_index(number - 1)),
            _ => Err(SquareError::IllegalSquare(number)),
        }
    }
}

impl FromStr for Square {
    type Err = SquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let number = s
            .trim()
            .parse::<u8>()
            .map_err(|_| SquareError::Parse(s.to_string()))?;
        Square::try_from(number)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Diagonal step, named by the bit offset it applies. Forward points toward `S32`.
#[repr(i8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum Direction {
    RightForward = 4,
    LeftForward = 5,
    RightBackward = -4,
    LeftBackward = -5,
}

impl Direction {
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::RightForward => Direction::RightBackward,
            Direction::LeftForward => Direction::LeftBackward,
            Direction::RightBackward => Direction::RightForward,
            Direction::LeftBackward => Direction::LeftForward,
        }
    }

    pub const fn is_forward(self) -> bool {
        (self as i8) > 0
    }

    /// Squares with no neighbour in this direction.
    pub const fn blockers(self) -> BitBoard {
        match self {
            Direction::RightForward => FILE_A.const_bit_or(LAST_ROW),
            Direction::LeftForward => FILE_H.const_bit_or(LAST_ROW),
            Direction::RightBackward => FILE_H.const_bit_or(FIRST_ROW),
            Direction::LeftBackward => FILE_A.const_bit_or(FIRST_ROW),
        }
    }
}

/// Set of squares packed into the low 35 bits of a word. Never holds a bit outside
/// `VALID_SQUARES`.
#[derive(PartialEq, Eq, Clone, Copy, Hash, Default, Deserialize, Serialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct BitBoard(u64);

impl BitBoard {
    pub const fn empty() -> Self {
        BitBoard(0)
    }

    pub const fn from_square(square: Square) -> Self {
        BitBoard(1 << square.bit())
    }

    pub const fn from_squares(squares: &[Square]) -> Self {
        let mut val = 0;
        let mut idx = 0;
        while idx < squares.len() {
            val |= 1 << squares[idx].bit();
            idx += 1;
        }
        BitBoard(val)
    }

    pub(crate) const fn from_val_unchecked(val: u64) -> Self {
        BitBoard(val)
    }

    pub const fn to_val(self) -> u64 {
        self.0
    }

    pub fn to_squares(mut self) -> Vec<Square> {
        let mut sqs = Vec::with_capacity(self.num_squares_set() as usize);
        while let Some(sq) = self.pop_lsb() {
            sqs.push(sq);
        }
        sqs
    }

    pub fn move_piece(&mut self, src: Square, dest: Square) {
        self.clear_square(src);
        self.set_square(dest);
    }

    pub fn set_square(&mut self, square: Square) {
        self.0 |= 1 << square.bit()
    }

    pub fn clear_square(&mut self, square: Square) {
        self.0 &= !(1 << square.bit())
    }

    pub const fn is_square_set(&self, square: Square) -> bool {
        self.0 & 1 << square.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Moves every square one step in `dir`. Squares that would leave the board, or land on a
    /// guard bit, are dropped.
    pub const fn shift(self, dir: Direction) -> BitBoard {
        let amt = dir as i8;
        let shifted = if amt >= 0 {
            self.0 << amt
        } else {
            self.0 >> -amt
        };
        BitBoard(shifted & VALID_SQUARES.0)
    }

    pub fn lsb(&self) -> Option<Square> {
        if self.0 == 0 {
            return None;
        }
        let sq = Square::from_bit(self.0.trailing_zeros() as u8);
        debug_assert!(sq.is_some(), "bitboard holds a guard bit: {:#x}", self.0);
        sq
    }

    pub fn pop_lsb(&mut self) -> Option<Square> {
        let lsb = self.lsb()?;
        self.0 &= self.0 - 1;
        Some(lsb)
    }

    pub const fn num_squares_set(self) -> u8 {
        self.0.count_ones() as u8
    }

    pub const fn const_bit_or(self, other: BitBoard) -> BitBoard {
        BitBoard(self.0 | other.0)
    }
}

impl TryFrom<u64> for BitBoard {
    type Error = SquareError;

    fn try_from(val: u64) -> Result<Self, Self::Error> {
        if val & !VALID_SQUARES.0 != 0 {
            return Err(SquareError::OutsideBoard(val));
        }
        Ok(BitBoard(val))
    }
}

impl From<BitBoard> for u64 {
    fn from(bb: BitBoard) -> u64 {
        bb.0
    }
}

impl FromIterator<Square> for BitBoard {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> Self {
        iter.into_iter().fold(BitBoard::empty(), |mut bb, sq| {
            bb.set_square(sq);
            bb
        })
    }
}

impl BitOr for BitBoard {
    type Output = BitBoard;

    fn bitor(self, other: BitBoard) -> BitBoard {
        BitBoard(self.0 | other.0)
    }
}

impl BitOrAssign for BitBoard {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0
    }
}

impl BitAnd for BitBoard {
    type Output = BitBoard;

    fn bitand(self, other: BitBoard) -> BitBoard {
        BitBoard(self.0 & other.0)
    }
}

impl BitAndAssign for BitBoard {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0
    }
}

impl BitXor for BitBoard {
    type Output = BitBoard;

    fn bitxor(self, other: BitBoard) -> BitBoard {
        BitBoard(self.0 ^ other.0)
    }
}

impl BitXorAssign for BitBoard {
    fn bitxor_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0
    }
}

impl Not for BitBoard {
    type Output = BitBoard;

    // Complement within the board, guard bits stay clear
    fn not(self) -> Self::Output {
        BitBoard(!self.0 & VALID_SQUARES.0)
    }
}

/// Draws the board with square 1's row on top. Light squares are left blank.
pub(crate) fn render_board(cell: impl Fn(Square) -> char) -> String {
    let mut board_str = String::with_capacity(8 * 9);

    for row in 0..8u8 {
        for file in 0..8u8 {
            let dark = (row + file) % 2 == 1;
            let ch = if dark {
                cell(Square::from_index(row * 4 + file / 2))
            } else {
                ' '
            };
            board_str.push(ch);
        }
        if row != 7 {
            board_str.push('\n');
        }
    }

    board_str
}

impl fmt::Debug for BitBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let board_str = render_board(|sq| if self.is_square_set(sq) { 'X' } else { '.' });
        write!(f, "{}", board_str)
    }
}
