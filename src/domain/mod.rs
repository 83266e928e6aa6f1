pub mod chess;
pub mod notation;
pub mod resolver;
pub mod uci;

pub use chess::{Piece, PieceColor, PieceKind, shakmaty_to_piece, to_square};
pub use notation::{NotationError, StructuralMove, decode, encode};
pub use resolver::{ResolveError, resolve};
