use std::fmt;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use super::PositionError;
use crate::bitboard::{BitBoard, Direction, Square};

/// Upper bound on captures in one chain. A piece can only be jumped on one of the 18 squares off
/// the rim of the board.
pub const MAX_JUMPS: usize = 18;

/// One full turn: a single step, or a chain of jumps made by the same piece.
///
/// `path` starts at the moving piece's square and lists every square it lands on. For a chain
/// each consecutive pair of squares is one jump, and the captured piece sits between them.
#[derive(Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "RawMove")]
pub struct Move {
    path: ArrayVec<Square, { MAX_JUMPS + 1 }>,
    capture: bool,
}

#[derive(Deserialize)]
struct RawMove {
    path: ArrayVec<Square, { MAX_JUMPS + 1 }>,
    capture: bool,
}

impl TryFrom<RawMove> for Move {
    type Error = PositionError;

    // A step joins two neighbours, every hop of a chain leaps over one square
    fn try_from(raw: RawMove) -> Result<Self, Self::Error> {
        let joined = match (raw.capture, raw.path.as_slice()) {
            (false, &[src, dest]) => Direction::iter().any(|dir| src.shift(dir) == Some(dest)),
            (true, [_, _, ..]) => raw
                .path
                .windows(2)
                .all(|hop| hop[0].between(hop[1]).is_some()),
            _ => false,
        };

        if !joined {
            let squares: Vec<String> = raw.path.iter().map(Square::to_string).collect();
            return Err(PositionError::MalformedMove(squares.join(",")));
        }

        Ok(Self {
            path: raw.path,
            capture: raw.capture,
        })
    }
}

impl Move {
    pub(crate) fn step(src: Square, dest: Square) -> Self {
        let mut path = ArrayVec::new();
        path.push(src);
        path.push(dest);
        Self {
            path,
            capture: false,
        }
    }

    pub(crate) fn chain(path: ArrayVec<Square, { MAX_JUMPS + 1 }>) -> Self {
        debug_assert!(path.len() >= 2, "chain needs at least one jump: {:?}", path);
        Self {
            path,
            capture: true,
        }
    }

    pub fn src(&self) -> Square {
        self.path[0]
    }

    pub fn dest(&self) -> Square {
        self.path[self.path.len() - 1]
    }

    pub fn path(&self) -> &[Square] {
        &self.path
    }

    pub fn is_capture(&self) -> bool {
        self.capture
    }

    pub fn num_captures(&self) -> usize {
        if self.capture {
            self.path.len() - 1
        } else {
            0
        }
    }

    /// Captured squares in the order they are jumped.
    pub fn captured_squares(&self) -> impl Iterator<Item = Square> + '_ {
        self.path
            .windows(2)
            .filter(|_| self.capture)
            .filter_map(|hop| hop[0].between(hop[1]))
    }

    pub fn captures(&self) -> BitBoard {
        self.captured_squares().collect()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = if self.capture { "x" } else { "-" };
        write!(f, "{}", self.path[0])?;
        for sq in &self.path[1..] {
            write!(f, "{}{}", sep, sq)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.src(), self.dest())?;
        if self.capture {
            let captured: Vec<String> = self.captured_squares().map(|sq| sq.to_string()).collect();
            write!(f, " (x {})", captured.join(", "))?;
        }
        Ok(())
    }
}
