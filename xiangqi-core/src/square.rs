//! 棋盘坐标
//!
//! 棋盘采用 11×14 的哨兵邮箱布局：可走区域是 9×10（列 1-9，行 2-11），
//! 四周由界外格包围。马走 ±2 行，所以上下各留两行界外格；
//! 列方向由于索引折行会落到相邻行的界外列上，左右各一列即可。
//! 走法生成沿方向偏移量直接寻址，不需要单独的边界检查。

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::piece::Side;

/// 棋盘列数
pub const FILE_COUNT: usize = 9;

/// 棋盘行数
pub const RANK_COUNT: usize = 10;

/// 邮箱宽度
pub(crate) const BOARD_WIDTH: usize = 11;

/// 邮箱高度
pub(crate) const BOARD_HEIGHT: usize = 14;

/// 邮箱格子总数
pub(crate) const BOARD_SIZE: usize = BOARD_WIDTH * BOARD_HEIGHT;

/// 可走区域在邮箱中的列偏移
const FILE_BASE: usize = 1;

/// 可走区域在邮箱中的行偏移
const RANK_BASE: usize = 2;

/// 区域掩码位：红方九宫
const RED_PALACE: u8 = 0x01;
/// 区域掩码位：黑方九宫
const BLACK_PALACE: u8 = 0x02;
/// 区域掩码位：红方半边
const RED_HALF: u8 = 0x04;
/// 区域掩码位：黑方半边
const BLACK_HALF: u8 = 0x08;

/// 每格的区域掩码，九宫和半边的判定都查这张表
static ZONE: [u8; BOARD_SIZE] = build_zone();

const fn build_zone() -> [u8; BOARD_SIZE] {
    let mut zone = [0u8; BOARD_SIZE];
    let mut rank = 0;
    while rank < RANK_COUNT {
        let mut file = 0;
        while file < FILE_COUNT {
            let idx = (rank + RANK_BASE) * BOARD_WIDTH + file + FILE_BASE;
            let mut mask = if rank < 5 { RED_HALF } else { BLACK_HALF };
            if file >= 3 && file <= 5 {
                if rank <= 2 {
                    mask |= RED_PALACE;
                }
                if rank >= 7 {
                    mask |= BLACK_PALACE;
                }
            }
            zone[idx] = mask;
            file += 1;
        }
        rank += 1;
    }
    zone
}

/// 棋盘坐标（邮箱索引的包装）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square(u8);

impl Square {
    /// 从列（0-8）和行（0-9，红方在行 0 一侧）创建
    pub fn from_file_rank(file: u8, rank: u8) -> Option<Square> {
        if (file as usize) < FILE_COUNT && (rank as usize) < RANK_COUNT {
            Some(Square(
                ((rank as usize + RANK_BASE) * BOARD_WIDTH + file as usize + FILE_BASE) as u8,
            ))
        } else {
            None
        }
    }

    /// 从邮箱索引创建（内部使用，调用方保证索引在可走区域内）
    #[inline]
    pub(crate) fn from_index(index: usize) -> Square {
        debug_assert!(index < BOARD_SIZE);
        Square(index as u8)
    }

    /// 邮箱索引
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }

    /// 列（0-8）
    #[inline]
    pub fn file(&self) -> u8 {
        (self.0 as usize % BOARD_WIDTH - FILE_BASE) as u8
    }

    /// 行（0-9）
    #[inline]
    pub fn rank(&self) -> u8 {
        (self.0 as usize / BOARD_WIDTH - RANK_BASE) as u8
    }

    /// 是否在指定阵营的九宫内
    #[inline]
    pub fn in_palace(&self, side: Side) -> bool {
        let bit = match side {
            Side::Red => RED_PALACE,
            Side::Black => BLACK_PALACE,
        };
        ZONE[self.index()] & bit != 0
    }

    /// 是否在指定阵营自己的半边
    #[inline]
    pub fn in_own_half(&self, side: Side) -> bool {
        let bit = match side {
            Side::Red => RED_HALF,
            Side::Black => BLACK_HALF,
        };
        ZONE[self.index()] & bit != 0
    }

    /// 按邮箱索引查询区域（界外格掩码为 0）
    #[inline]
    pub(crate) fn zone_at(index: usize) -> u8 {
        ZONE[index]
    }

    /// 指定阵营九宫的掩码位
    #[inline]
    pub(crate) fn palace_bit(side: Side) -> u8 {
        match side {
            Side::Red => RED_PALACE,
            Side::Black => BLACK_PALACE,
        }
    }

    /// 指定阵营半边的掩码位
    #[inline]
    pub(crate) fn half_bit(side: Side) -> u8 {
        match side {
            Side::Red => RED_HALF,
            Side::Black => BLACK_HALF,
        }
    }

    /// 解析两字符坐标（列字母 a-i + 行数字 0-9）
    pub fn from_coord(text: &str) -> Option<Square> {
        let mut chars = text.chars();
        let file_char = chars.next()?;
        let rank_char = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        if !('a'..='i').contains(&file_char) || !rank_char.is_ascii_digit() {
            return None;
        }
        let file = file_char as u8 - b'a';
        let rank = rank_char as u8 - b'0';
        Square::from_file_rank(file, rank)
    }

    /// 遍历所有可走格（行优先，从红方底线开始）
    pub fn all() -> impl Iterator<Item = Square> {
        (0..RANK_COUNT).flat_map(|rank| {
            (0..FILE_COUNT).map(move |file| {
                Square(((rank + RANK_BASE) * BOARD_WIDTH + file + FILE_BASE) as u8)
            })
        })
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file()) as char, self.rank())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_file_rank() {
        assert!(Square::from_file_rank(0, 0).is_some());
        assert!(Square::from_file_rank(8, 9).is_some());
        assert!(Square::from_file_rank(9, 0).is_none());
        assert!(Square::from_file_rank(0, 10).is_none());
    }

    #[test]
    fn test_file_rank_roundtrip() {
        for sq in Square::all() {
            let again = Square::from_file_rank(sq.file(), sq.rank()).unwrap();
            assert_eq!(sq, again);
        }
    }

    #[test]
    fn test_palace() {
        // 红方九宫
        assert!(Square::from_file_rank(4, 0).unwrap().in_palace(Side::Red));
        assert!(Square::from_file_rank(4, 2).unwrap().in_palace(Side::Red));
        assert!(!Square::from_file_rank(4, 3).unwrap().in_palace(Side::Red));
        assert!(!Square::from_file_rank(2, 0).unwrap().in_palace(Side::Red));

        // 黑方九宫
        assert!(Square::from_file_rank(4, 9).unwrap().in_palace(Side::Black));
        assert!(Square::from_file_rank(4, 7).unwrap().in_palace(Side::Black));
        assert!(!Square::from_file_rank(4, 6).unwrap().in_palace(Side::Black));
    }

    #[test]
    fn test_river() {
        assert!(Square::from_file_rank(0, 4).unwrap().in_own_half(Side::Red));
        assert!(!Square::from_file_rank(0, 5).unwrap().in_own_half(Side::Red));
        assert!(Square::from_file_rank(0, 5).unwrap().in_own_half(Side::Black));
        assert!(!Square::from_file_rank(0, 4).unwrap().in_own_half(Side::Black));
    }

    #[test]
    fn test_coord_parse() {
        let sq = Square::from_coord("e2").unwrap();
        assert_eq!(sq.file(), 4);
        assert_eq!(sq.rank(), 2);
        assert_eq!(sq.to_string(), "e2");

        assert!(Square::from_coord("j0").is_none());
        assert!(Square::from_coord("a").is_none());
        assert!(Square::from_coord("a10").is_none());
        assert!(Square::from_coord("4e").is_none());
    }

    #[test]
    fn test_all_count() {
        assert_eq!(Square::all().count(), FILE_COUNT * RANK_COUNT);
    }
}
