//! 中文纵线表示法
//!
//! 红方：从右往左数，使用中文数字（一二三四五六七八九）
//! 黑方：从左往右数，使用阿拉伯数字（1-9）
//!
//! 格式：<棋子><起始列><动作><目标>
//! - 动作：进（向前）、退（向后）、平（横走）
//! - 目标：平移时为目标列，进退时为步数

use crate::board::Position;
use crate::moves::Move;
use crate::piece::Side;
use crate::square::{Square, RANK_COUNT};

/// 中文数字
const CHINESE_NUMBERS: [char; 9] = ['一', '二', '三', '四', '五', '六', '七', '八', '九'];

/// 纵线表示法
pub struct Notation;

impl Notation {
    /// 将走法转换为中文纵线表示法
    pub fn to_chinese(pos: &Position, mv: Move) -> Option<String> {
        let piece = pos.piece_on(mv.from())?;
        let side = piece.side;

        // 获取棋子名称
        let piece_char = piece.display_char();

        // 计算起始列（红方从右往左，黑方从左往右）
        let from_col = Self::column_notation(mv.from().file(), side)?;

        // 判断动作类型
        let (action, target) = Self::action_and_target(mv, side)?;

        Some(format!("{}{}{}{}", piece_char, from_col, action, target))
    }

    /// 获取列的表示
    fn column_notation(file: u8, side: Side) -> Option<char> {
        match side {
            Side::Red => {
                // 红方从右往左：file=8 是一，file=0 是九
                Some(CHINESE_NUMBERS[(8 - file) as usize])
            }
            Side::Black => {
                // 黑方从左往右：file=0 是 1，file=8 是 9
                char::from_digit((file + 1) as u32, 10)
            }
        }
    }

    /// 获取动作和目标
    fn action_and_target(mv: Move, side: Side) -> Option<(char, char)> {
        let dx = mv.to().file() as i8 - mv.from().file() as i8;
        let dy = mv.to().rank() as i8 - mv.from().rank() as i8;

        // 红方：行数增加是进，减少是退
        // 黑方：行数减少是进，增加是退
        let forward = match side {
            Side::Red => dy > 0,
            Side::Black => dy < 0,
        };

        if dy == 0 {
            // 平移
            let target_col = Self::column_notation(mv.to().file(), side)?;
            Some(('平', target_col))
        } else if dx == 0 {
            // 直线进退
            let steps = dy.unsigned_abs();
            let target = match side {
                Side::Red => CHINESE_NUMBERS[(steps - 1) as usize],
                Side::Black => char::from_digit(steps as u32, 10)?,
            };
            let action = if forward { '進' } else { '退' };
            Some((action, target))
        } else {
            // 斜线移动（马、象、士）
            let target_col = Self::column_notation(mv.to().file(), side)?;
            let action = if forward { '進' } else { '退' };
            Some((action, target_col))
        }
    }

    /// 处理同列多子的情况（前/后/中）
    /// 返回完整的棋谱记录
    pub fn to_chinese_with_disambiguation(pos: &Position, mv: Move) -> Option<String> {
        let piece = pos.piece_on(mv.from())?;
        let side = piece.side;
        let file = mv.from().file();

        // 查找同列同类型的棋子
        let same_file_pieces: Vec<Square> = (0..RANK_COUNT as u8)
            .filter_map(|rank| {
                let sq = Square::from_file_rank(file, rank)?;
                let p = pos.piece_on(sq)?;
                (p.kind == piece.kind && p.side == side).then_some(sq)
            })
            .collect();

        if same_file_pieces.len() <= 1 {
            // 没有同列同类型棋子，使用普通表示法
            return Self::to_chinese(pos, mv);
        }

        // 需要消歧义
        let piece_char = piece.display_char();
        let (action, target) = Self::action_and_target(mv, side)?;

        // 按行排序（红方从下到上，黑方从上到下）
        let mut sorted = same_file_pieces.clone();
        match side {
            Side::Red => sorted.sort_by_key(|sq| sq.rank()),
            Side::Black => sorted.sort_by_key(|sq| std::cmp::Reverse(sq.rank())),
        }

        let position_idx = sorted.iter().position(|&sq| sq == mv.from())?;
        let position_char = if same_file_pieces.len() == 2 {
            if position_idx == 0 {
                '後'
            } else {
                '前'
            }
        } else {
            match position_idx {
                0 => '後',
                i if i == sorted.len() - 1 => '前',
                _ => '中',
            }
        };

        Some(format!("{}{}{}{}", position_char, piece_char, action, target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find_move(pos: &Position, coord: &str) -> Move {
        pos.pseudo_legal_moves()
            .into_iter()
            .find(|m| m.coord() == coord)
            .unwrap_or_else(|| panic!("no pseudo-legal move {}", coord))
    }

    #[test]
    fn test_cannon_notation() {
        let pos = Position::startpos();

        // 炮二平五（红方右边的炮平到中间）
        let mv = find_move(&pos, "h2e2");
        assert_eq!(Notation::to_chinese(&pos, mv).unwrap(), "炮二平五");
    }

    #[test]
    fn test_pawn_notation() {
        let pos = Position::startpos();

        // 兵七进一
        let mv = find_move(&pos, "c3c4");
        assert_eq!(Notation::to_chinese(&pos, mv).unwrap(), "兵七進一");
    }

    #[test]
    fn test_knight_notation() {
        let pos = Position::startpos();

        // 马二进三（红方右边的马）
        let mv = find_move(&pos, "h0g2");
        assert_eq!(Notation::to_chinese(&pos, mv).unwrap(), "傌二進三");
    }

    #[test]
    fn test_black_notation() {
        // 黑方走子：馬2進3
        let fen = "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR b - - 0 1";
        let pos = Position::from_fen(fen).unwrap();
        let mv = find_move(&pos, "b9c7");
        assert_eq!(Notation::to_chinese(&pos, mv).unwrap(), "馬2進3");
    }

    #[test]
    fn test_column_notation() {
        // 红方：file=8 是一，file=0 是九
        assert_eq!(Notation::column_notation(8, Side::Red), Some('一'));
        assert_eq!(Notation::column_notation(4, Side::Red), Some('五'));
        assert_eq!(Notation::column_notation(0, Side::Red), Some('九'));

        // 黑方：file=0 是 1，file=8 是 9
        assert_eq!(Notation::column_notation(0, Side::Black), Some('1'));
        assert_eq!(Notation::column_notation(4, Side::Black), Some('5'));
        assert_eq!(Notation::column_notation(8, Side::Black), Some('9'));
    }

    #[test]
    fn test_rook_retreat() {
        // 车九退三
        let pos = Position::from_fen("9/9/9/9/R8/9/9/9/9/9 w - - 0 1").unwrap();
        let mv = find_move(&pos, "a5a2");
        assert_eq!(Notation::to_chinese(&pos, mv).unwrap(), "俥九退三");
    }

    #[test]
    fn test_advisor_diagonal() {
        // 仕五進六
        let pos = Position::from_fen("9/9/9/9/9/9/9/9/4A4/9 w - - 0 1").unwrap();
        let mv = find_move(&pos, "e1d2");
        assert_eq!(Notation::to_chinese(&pos, mv).unwrap(), "仕五進六");
    }

    #[test]
    fn test_bishop_diagonal() {
        // 相七進五
        let pos = Position::from_fen("9/9/9/9/9/9/9/9/9/2B6 w - - 0 1").unwrap();
        let mv = find_move(&pos, "c0e2");
        assert_eq!(Notation::to_chinese(&pos, mv).unwrap(), "相七進五");
    }

    #[test]
    fn test_disambiguation_two_pieces() {
        // 同列两个兵
        let pos = Position::from_fen("9/9/4P4/9/4P4/9/9/9/9/9 w - - 0 1").unwrap();

        let mv = find_move(&pos, "e7e8");
        assert_eq!(
            Notation::to_chinese_with_disambiguation(&pos, mv).unwrap(),
            "前兵進一"
        );

        let mv2 = find_move(&pos, "e5e6");
        assert_eq!(
            Notation::to_chinese_with_disambiguation(&pos, mv2).unwrap(),
            "後兵進一"
        );
    }

    #[test]
    fn test_disambiguation_three_pieces() {
        // 同列三个兵，走中间那个
        let pos = Position::from_fen("9/9/4P4/9/4P4/9/4P4/9/9/9 w - - 0 1").unwrap();
        let mv = find_move(&pos, "e5e6");
        assert_eq!(
            Notation::to_chinese_with_disambiguation(&pos, mv).unwrap(),
            "中兵進一"
        );
    }

    #[test]
    fn test_black_rook_advance() {
        // 車1進5
        let pos = Position::from_fen("r8/9/9/9/9/9/9/9/9/9 b - - 0 1").unwrap();
        let mv = find_move(&pos, "a9a4");
        assert_eq!(Notation::to_chinese(&pos, mv).unwrap(), "車1進5");
    }

    #[test]
    fn test_black_cannon_horizontal() {
        // 砲2平5
        let pos = Position::from_fen("9/9/1c7/9/9/9/9/9/9/9 b - - 0 1").unwrap();
        let mv = find_move(&pos, "b7e7");
        assert_eq!(Notation::to_chinese(&pos, mv).unwrap(), "砲2平5");
    }

    #[test]
    fn test_no_disambiguation_needed() {
        // 只有一个棋子，返回普通表示法
        let pos = Position::from_fen("9/9/9/9/4P4/9/9/9/9/9 w - - 0 1").unwrap();
        let mv = find_move(&pos, "e5e6");
        assert_eq!(
            Notation::to_chinese_with_disambiguation(&pos, mv).unwrap(),
            "兵五進一"
        );
    }

    #[test]
    fn test_black_knight_retreat() {
        // 馬3退2
        let pos = Position::from_fen("9/9/2n6/9/9/9/9/9/9/9 b - - 0 1").unwrap();
        let mv = find_move(&pos, "c7b9");
        assert_eq!(Notation::to_chinese(&pos, mv).unwrap(), "馬3退2");
    }

    #[test]
    fn test_pawn_horizontal_after_river() {
        // 兵五平六
        let pos = Position::from_fen("9/9/9/4P4/9/9/9/9/9/9 w - - 0 1").unwrap();
        let mv = find_move(&pos, "e6d6");
        assert_eq!(Notation::to_chinese(&pos, mv).unwrap(), "兵五平六");
    }
}
