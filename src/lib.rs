pub mod bitboard;
pub mod features;
pub mod masks;
pub mod metrics;
pub mod move_gen;
pub mod perft;
pub mod position;

pub use bitboard::{BitBoard, Direction, Square, SquareError};
pub use features::SamuelFeatures;
pub use move_gen::{gen_jumpers, gen_moves};
pub use perft::{perft, perft_full, PerftDepthResult, PerftResult};
pub use position::{Move, Piece, Position, PositionError, Side};
