//! Fixed square sets over the packed board word.

use crate::bitboard::BitBoard;
use crate::bitboard::Square::{self, *};

/// Every playable bit. Bits 8, 17 and 26 are guard bits between row pairs, everything from bit 35
/// up is unused.
pub const VALID_SQUARES: BitBoard = BitBoard::from_val_unchecked(0x7_FBFD_FEFF);

/// Leftmost column as seen from White's side, the edge that `RightForward` and `LeftBackward` run
/// into.
pub const FILE_A: BitBoard = BitBoard::from_squares(&[S5, S13, S21, S29]);

/// Rightmost column, the edge that `LeftForward` and `RightBackward` run into.
pub const FILE_H: BitBoard = BitBoard::from_squares(&[S4, S12, S20, S28]);

pub const FIRST_ROW: BitBoard = row(0);
pub const LAST_ROW: BitBoard = row(7);

/// The eight central squares.
pub const CENTER: BitBoard = BitBoard::from_squares(&[S10, S11, S14, S15, S18, S19, S22, S23]);

/// Row `idx`, counted from Black's home row.
pub const fn row(idx: u8) -> BitBoard {
    let first = idx * 4;
    BitBoard::from_squares(&[
        Square::from_index(first),
        Square::from_index(first + 1),
        Square::from_index(first + 2),
        Square::from_index(first + 3),
    ])
}

/// Dark squares on the files that start at squares 1 to 4.
pub const EVEN_ROWS: BitBoard = row(0)
    .const_bit_or(row(2))
    .const_bit_or(row(4))
    .const_bit_or(row(6));
