//! 中国象棋核心规则库
//!
//! 包含:
//! - 棋子、坐标、走法等核心数据结构
//! - 哨兵邮箱棋盘与增量 Zobrist 哈希
//! - 伪合法走法生成与攻击检测
//! - 走子/撤销（make/unmake）
//! - FEN 格式解析和生成
//! - 中文纵线表示法
//! - perft 局面枚举

mod board;
mod error;
mod movegen;
mod moves;
mod notation;
mod piece;
mod square;
mod zobrist;

pub use board::{Position, INITIAL_FEN};
pub use error::FenError;
pub use movegen::perft;
pub use moves::{parse_coord, Move};
pub use notation::Notation;
pub use piece::{Piece, PieceKind, Side};
pub use square::{Square, FILE_COUNT, RANK_COUNT};
