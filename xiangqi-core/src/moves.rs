//! 走法编码
//!
//! 走法打包成一个 u32 值类型：
//! 位 0-7 起点邮箱索引，位 8-15 终点邮箱索引，
//! 位 16-20 走子编码，位 21-25 被吃子编码，位 26 吃子标志。
//! 走法创建后不可修改；0 保留为空走法。

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::piece::{Piece, EMPTY};
use crate::square::Square;

/// 走法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move(u32);

const CAPTURE_FLAG: u32 = 1 << 26;

impl Move {
    /// 空走法
    pub const NONE: Move = Move(0);

    /// 创建走法；`captured` 为 0 表示没有吃子
    pub(crate) fn new(from: Square, to: Square, moved: u8, captured: u8) -> Move {
        let mut bits = from.index() as u32
            | (to.index() as u32) << 8
            | (moved as u32) << 16
            | (captured as u32) << 21;
        if captured != EMPTY {
            bits |= CAPTURE_FLAG;
        }
        Move(bits)
    }

    /// 起点
    #[inline]
    pub fn from(&self) -> Square {
        Square::from_index((self.0 & 0xFF) as usize)
    }

    /// 终点
    #[inline]
    pub fn to(&self) -> Square {
        Square::from_index((self.0 >> 8 & 0xFF) as usize)
    }

    /// 走子的格子编码
    #[inline]
    pub(crate) fn moved_code(&self) -> u8 {
        (self.0 >> 16 & 0x1F) as u8
    }

    /// 被吃子的格子编码（0 表示没有吃子）
    #[inline]
    pub(crate) fn captured_code(&self) -> u8 {
        (self.0 >> 21 & 0x1F) as u8
    }

    /// 走动的棋子
    pub fn moved_piece(&self) -> Option<Piece> {
        Piece::from_code(self.moved_code())
    }

    /// 被吃的棋子
    pub fn captured_piece(&self) -> Option<Piece> {
        Piece::from_code(self.captured_code())
    }

    /// 是否是吃子走法
    #[inline]
    pub fn is_capture(&self) -> bool {
        self.0 & CAPTURE_FLAG != 0
    }

    /// 是否是空走法
    #[inline]
    pub fn is_none(&self) -> bool {
        self.0 == 0
    }

    /// 四字符坐标表示（如 `h2e2`）
    pub fn coord(&self) -> String {
        format!("{}{}", self.from(), self.to())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "(none)")
        } else {
            write!(f, "{}", self.coord())
        }
    }
}

/// 解析四字符坐标走法，语法错误或越界返回 None
pub fn parse_coord(text: &str) -> Option<(Square, Square)> {
    if text.len() != 4 || !text.is_ascii() {
        return None;
    }
    let from = Square::from_coord(&text[..2])?;
    let to = Square::from_coord(&text[2..])?;
    Some((from, to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{PieceKind, Side};

    #[test]
    fn test_move_accessors() {
        let from = Square::from_coord("h2").unwrap();
        let to = Square::from_coord("e2").unwrap();
        let cannon = Piece::new(PieceKind::Cannon, Side::Red);
        let mv = Move::new(from, to, cannon.code(), EMPTY);

        assert_eq!(mv.from(), from);
        assert_eq!(mv.to(), to);
        assert_eq!(mv.moved_piece(), Some(cannon));
        assert_eq!(mv.captured_piece(), None);
        assert!(!mv.is_capture());
        assert_eq!(mv.coord(), "h2e2");
    }

    #[test]
    fn test_capture_move() {
        let from = Square::from_coord("a0").unwrap();
        let to = Square::from_coord("a9").unwrap();
        let rook = Piece::new(PieceKind::Rook, Side::Red);
        let victim = Piece::new(PieceKind::Rook, Side::Black);
        let mv = Move::new(from, to, rook.code(), victim.code());

        assert!(mv.is_capture());
        assert_eq!(mv.captured_piece(), Some(victim));
    }

    #[test]
    fn test_none_move() {
        assert!(Move::NONE.is_none());
        assert_eq!(Move::NONE.to_string(), "(none)");
    }

    #[test]
    fn test_move_serde_roundtrip() {
        let from = Square::from_coord("b2").unwrap();
        let to = Square::from_coord("e2").unwrap();
        let cannon = Piece::new(PieceKind::Cannon, Side::Red);
        let mv = Move::new(from, to, cannon.code(), EMPTY);

        let json = serde_json::to_string(&mv).unwrap();
        let back: Move = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mv);

        let sq_json = serde_json::to_string(&from).unwrap();
        let sq_back: Square = serde_json::from_str(&sq_json).unwrap();
        assert_eq!(sq_back, from);
    }

    #[test]
    fn test_parse_coord() {
        let (from, to) = parse_coord("h2e2").unwrap();
        assert_eq!(from.to_string(), "h2");
        assert_eq!(to.to_string(), "e2");

        assert!(parse_coord("h2e").is_none());
        assert!(parse_coord("h2e2x").is_none());
        assert!(parse_coord("z2e2").is_none());
        assert!(parse_coord("炮2平5").is_none());
    }
}
