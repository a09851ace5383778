pub mod board;
pub mod notation;
pub mod perft;
pub mod types;

pub use board::*;
pub use notation::{positions, NotationError};
pub use perft::{perft, perft_divide};
pub use types::*;
