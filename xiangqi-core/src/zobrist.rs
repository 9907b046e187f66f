//! Zobrist 哈希
//!
//! 为每个（阵营, 棋子, 格子）组合预生成随机常量，局面哈希是
//! 所有在场棋子常量的异或，再加上走子方常量。
//! 使用固定种子保证每次运行的哈希一致。

use lazy_static::lazy_static;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::piece::{Side, KIND_MASK};
use crate::square::BOARD_SIZE;

/// Zobrist 哈希表
pub(crate) struct ZobristTable {
    /// 棋子哈希值 [side][kind][square]
    pieces: [[[u64; BOARD_SIZE]; 7]; 2],
    /// 走子方哈希值
    side_to_move: u64,
}

impl ZobristTable {
    fn new() -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(0xDEAD_BEEF_CAFE_1234);

        let mut pieces = [[[0u64; BOARD_SIZE]; 7]; 2];
        for side in pieces.iter_mut() {
            for kind in side.iter_mut() {
                for square in kind.iter_mut() {
                    *square = rng.gen();
                }
            }
        }

        Self {
            pieces,
            side_to_move: rng.gen(),
        }
    }

    /// 按格子编码取棋子常量，`code` 必须是合法棋子编码
    #[inline]
    pub(crate) fn piece_key(&self, code: u8, index: usize) -> u64 {
        let side = if code & Side::Red.flag() != 0 { 0 } else { 1 };
        let kind = (code & KIND_MASK) as usize - 1;
        self.pieces[side][kind][index]
    }

    /// 走子方切换常量
    #[inline]
    pub(crate) fn side_key(&self) -> u64 {
        self.side_to_move
    }
}

lazy_static! {
    /// 全局共享的 Zobrist 表
    pub(crate) static ref ZOBRIST: ZobristTable = ZobristTable::new();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{Piece, PieceKind};
    use crate::square::Square;

    #[test]
    fn test_keys_are_distinct() {
        let sq = Square::from_file_rank(4, 0).unwrap();
        let red_king = Piece::new(PieceKind::King, Side::Red).code();
        let black_king = Piece::new(PieceKind::King, Side::Black).code();

        assert_ne!(
            ZOBRIST.piece_key(red_king, sq.index()),
            ZOBRIST.piece_key(black_king, sq.index())
        );
        assert_ne!(ZOBRIST.piece_key(red_king, sq.index()), 0);
        assert_ne!(ZOBRIST.side_key(), 0);
    }

    #[test]
    fn test_keys_deterministic() {
        let table = ZobristTable::new();
        let sq = Square::from_file_rank(0, 0).unwrap();
        let code = Piece::new(PieceKind::Rook, Side::Red).code();

        assert_eq!(
            table.piece_key(code, sq.index()),
            ZOBRIST.piece_key(code, sq.index())
        );
        assert_eq!(table.side_key(), ZOBRIST.side_key());
    }
}
