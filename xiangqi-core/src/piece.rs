//! 棋子定义
//!
//! 棋盘格子用 u8 编码：低 3 位是棋子种类（1-7），
//! 第 3 位（0x08）是红方标志，第 4 位（0x10）是黑方标志。
//! 0 表示空格，界外哨兵格使用不带任何阵营标志的独立值。

use serde::{Deserialize, Serialize};

/// 空格
pub(crate) const EMPTY: u8 = 0;

/// 界外哨兵格：不带阵营标志，既不是空格也不可吃
pub(crate) const OFF_BOARD: u8 = 0x20;

/// 棋子种类编码的掩码
pub(crate) const KIND_MASK: u8 = 0x07;

/// 阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// 红方（先手，在下方）
    Red,
    /// 黑方（后手，在上方）
    Black,
}

impl Side {
    /// 获取对方阵营
    pub fn opponent(&self) -> Side {
        match self {
            Side::Red => Side::Black,
            Side::Black => Side::Red,
        }
    }

    /// 格子编码中的阵营标志位
    #[inline]
    pub(crate) fn flag(&self) -> u8 {
        match self {
            Side::Red => 0x08,
            Side::Black => 0x10,
        }
    }

    /// 数组索引（红 0，黑 1）
    #[inline]
    pub fn index(&self) -> usize {
        match self {
            Side::Red => 0,
            Side::Black => 1,
        }
    }

    /// 获取 FEN 字符
    pub fn to_fen_char(&self) -> char {
        match self {
            Side::Red => 'w',
            Side::Black => 'b',
        }
    }

    /// 从 FEN 字符解析（兼容 `r` 表示红方的写法）
    pub fn from_fen_char(c: char) -> Option<Side> {
        match c {
            'w' | 'W' | 'r' | 'R' => Some(Side::Red),
            'b' | 'B' => Some(Side::Black),
            _ => None,
        }
    }
}

/// 棋子种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    /// 将/帅
    King,
    /// 士/仕
    Advisor,
    /// 象/相
    Bishop,
    /// 马/傌
    Knight,
    /// 车/俥
    Rook,
    /// 炮/砲
    Cannon,
    /// 兵/卒
    Pawn,
}

impl PieceKind {
    /// 获取棋子的基础分值（用于 AI 评估）
    pub fn value(&self) -> i32 {
        match self {
            PieceKind::King => 10000,
            PieceKind::Rook => 900,
            PieceKind::Cannon => 450,
            PieceKind::Knight => 400,
            PieceKind::Bishop => 200,
            PieceKind::Advisor => 200,
            PieceKind::Pawn => 100,
        }
    }

    /// Zobrist/评估表索引（0-6）
    #[inline]
    pub fn index(&self) -> usize {
        match self {
            PieceKind::King => 0,
            PieceKind::Advisor => 1,
            PieceKind::Bishop => 2,
            PieceKind::Knight => 3,
            PieceKind::Rook => 4,
            PieceKind::Cannon => 5,
            PieceKind::Pawn => 6,
        }
    }

    /// 格子编码中的种类值（1-7）
    #[inline]
    pub(crate) fn code(&self) -> u8 {
        self.index() as u8 + 1
    }

    pub(crate) fn from_code(code: u8) -> Option<PieceKind> {
        match code {
            1 => Some(PieceKind::King),
            2 => Some(PieceKind::Advisor),
            3 => Some(PieceKind::Bishop),
            4 => Some(PieceKind::Knight),
            5 => Some(PieceKind::Rook),
            6 => Some(PieceKind::Cannon),
            7 => Some(PieceKind::Pawn),
            _ => None,
        }
    }

    /// 获取 FEN 字符（红方大写，黑方小写）
    pub fn to_fen_char(&self, side: Side) -> char {
        let c = match self {
            PieceKind::King => 'k',
            PieceKind::Advisor => 'a',
            PieceKind::Bishop => 'b',
            PieceKind::Knight => 'n',
            PieceKind::Rook => 'r',
            PieceKind::Cannon => 'c',
            PieceKind::Pawn => 'p',
        };
        match side {
            Side::Red => c.to_ascii_uppercase(),
            Side::Black => c,
        }
    }

    /// 从 FEN 字符解析
    pub fn from_fen_char(c: char) -> Option<(PieceKind, Side)> {
        let side = if c.is_ascii_uppercase() {
            Side::Red
        } else {
            Side::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'k' => PieceKind::King,
            'a' => PieceKind::Advisor,
            'b' => PieceKind::Bishop,
            'n' => PieceKind::Knight,
            'r' => PieceKind::Rook,
            'c' => PieceKind::Cannon,
            'p' => PieceKind::Pawn,
            _ => return None,
        };
        Some((kind, side))
    }
}

/// 棋子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub side: Side,
}

impl Piece {
    /// 创建新棋子
    pub fn new(kind: PieceKind, side: Side) -> Self {
        Self { kind, side }
    }

    /// 棋盘格子编码
    #[inline]
    pub(crate) fn code(&self) -> u8 {
        self.side.flag() | self.kind.code()
    }

    /// 从格子编码解析（空格和哨兵返回 None）
    #[inline]
    pub(crate) fn from_code(code: u8) -> Option<Piece> {
        let side = if code & Side::Red.flag() != 0 {
            Side::Red
        } else if code & Side::Black.flag() != 0 {
            Side::Black
        } else {
            return None;
        };
        PieceKind::from_code(code & KIND_MASK).map(|kind| Piece { kind, side })
    }

    /// 获取棋子显示的汉字
    pub fn display_char(&self) -> char {
        match (self.kind, self.side) {
            (PieceKind::King, Side::Red) => '帥',
            (PieceKind::King, Side::Black) => '將',
            (PieceKind::Advisor, Side::Red) => '仕',
            (PieceKind::Advisor, Side::Black) => '士',
            (PieceKind::Bishop, Side::Red) => '相',
            (PieceKind::Bishop, Side::Black) => '象',
            (PieceKind::Knight, Side::Red) => '傌',
            (PieceKind::Knight, Side::Black) => '馬',
            (PieceKind::Rook, Side::Red) => '俥',
            (PieceKind::Rook, Side::Black) => '車',
            (PieceKind::Cannon, Side::Red) => '炮',
            (PieceKind::Cannon, Side::Black) => '砲',
            (PieceKind::Pawn, Side::Red) => '兵',
            (PieceKind::Pawn, Side::Black) => '卒',
        }
    }

    /// 获取 FEN 字符
    pub fn to_fen_char(&self) -> char {
        self.kind.to_fen_char(self.side)
    }

    /// 从 FEN 字符解析
    pub fn from_fen_char(c: char) -> Option<Piece> {
        PieceKind::from_fen_char(c).map(|(kind, side)| Piece { kind, side })
    }

    /// 获取棋子分值
    pub fn value(&self) -> i32 {
        self.kind.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_display_char() {
        let red_king = Piece::new(PieceKind::King, Side::Red);
        assert_eq!(red_king.display_char(), '帥');

        let black_king = Piece::new(PieceKind::King, Side::Black);
        assert_eq!(black_king.display_char(), '將');

        let red_pawn = Piece::new(PieceKind::Pawn, Side::Red);
        assert_eq!(red_pawn.display_char(), '兵');

        let black_pawn = Piece::new(PieceKind::Pawn, Side::Black);
        assert_eq!(black_pawn.display_char(), '卒');
    }

    #[test]
    fn test_piece_fen_char() {
        let red_king = Piece::new(PieceKind::King, Side::Red);
        assert_eq!(red_king.to_fen_char(), 'K');

        let black_king = Piece::new(PieceKind::King, Side::Black);
        assert_eq!(black_king.to_fen_char(), 'k');

        assert_eq!(
            Piece::from_fen_char('R'),
            Some(Piece::new(PieceKind::Rook, Side::Red))
        );
        assert_eq!(
            Piece::from_fen_char('n'),
            Some(Piece::new(PieceKind::Knight, Side::Black))
        );
    }

    #[test]
    fn test_piece_code_roundtrip() {
        for kind in [
            PieceKind::King,
            PieceKind::Advisor,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
            PieceKind::Cannon,
            PieceKind::Pawn,
        ] {
            for side in [Side::Red, Side::Black] {
                let piece = Piece::new(kind, side);
                assert_eq!(Piece::from_code(piece.code()), Some(piece));
            }
        }

        // 空格和哨兵不是棋子
        assert_eq!(Piece::from_code(EMPTY), None);
        assert_eq!(Piece::from_code(OFF_BOARD), None);
    }

    #[test]
    fn test_side_opponent() {
        assert_eq!(Side::Red.opponent(), Side::Black);
        assert_eq!(Side::Black.opponent(), Side::Red);
    }

    #[test]
    fn test_side_fen_char() {
        assert_eq!(Side::from_fen_char('w'), Some(Side::Red));
        assert_eq!(Side::from_fen_char('r'), Some(Side::Red));
        assert_eq!(Side::from_fen_char('b'), Some(Side::Black));
        assert_eq!(Side::from_fen_char('x'), None);
    }
}
