//! 棋盘状态
//!
//! `Position` 是引擎唯一的可变棋盘：哨兵邮箱数组、走子方、
//! 将帅位置缓存、增量维护的 Zobrist 哈希、无吃子计数和撤销栈。
//! 哈希只在加载局面时整体重算一次，之后全部走增量更新。
//!
//! 中国象棋 FEN 格式：
//! `<棋盘> <走子方> - - <无吃子步数> <回合数>`
//!
//! 示例：
//! `rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR w - - 0 1`

use crate::error::FenError;
use crate::moves::{parse_coord, Move};
use crate::piece::{Piece, PieceKind, Side, EMPTY, OFF_BOARD};
use crate::square::{Square, BOARD_SIZE, FILE_COUNT, RANK_COUNT};
use crate::zobrist::ZOBRIST;

/// 初始局面 FEN
pub const INITIAL_FEN: &str =
    "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR w - - 0 1";

/// 撤销记录：走法、走子前的哈希和无吃子计数
///
/// 空走法（`Move::NONE`）表示一次空着（null move）。
#[derive(Debug, Clone, Copy)]
struct Undo {
    mv: Move,
    hash: u64,
    quiet_plies: u32,
}

/// 棋盘状态
#[derive(Debug, Clone)]
pub struct Position {
    /// 邮箱格子数组，可走区域外是哨兵
    squares: [u8; BOARD_SIZE],
    /// 当前走子方
    side: Side,
    /// 将帅位置缓存（邮箱索引，0 表示不在场）
    kings: [u8; 2],
    /// 增量维护的 Zobrist 哈希
    hash: u64,
    /// 无吃子半回合数（和棋判定）
    quiet_plies: u32,
    /// 完整回合数（黑方走完后 +1）
    round: u32,
    /// 撤销栈
    undo: Vec<Undo>,
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.squares == other.squares
            && self.side == other.side
            && self.kings == other.kings
            && self.hash == other.hash
            && self.quiet_plies == other.quiet_plies
    }
}

impl Eq for Position {}

impl Position {
    fn empty() -> Self {
        let mut squares = [OFF_BOARD; BOARD_SIZE];
        for sq in Square::all() {
            squares[sq.index()] = EMPTY;
        }
        Self {
            squares,
            side: Side::Red,
            kings: [0, 0],
            hash: 0,
            quiet_plies: 0,
            round: 1,
            undo: Vec::with_capacity(64),
        }
    }

    /// 初始局面
    pub fn startpos() -> Self {
        Self::from_fen(INITIAL_FEN).expect("initial FEN is valid")
    }

    /// 解析 FEN 字符串
    ///
    /// 走子方接受 `w`/`r`（红）和 `b`（黑）；占位字段 `-` 可省略；
    /// 之后的两个数字依次是无吃子步数和回合数。
    pub fn from_fen(fen: &str) -> Result<Position, FenError> {
        let mut parts = fen.split_whitespace();
        let board_str = parts.next().ok_or(FenError::Empty)?;

        let mut pos = Self::empty();

        let rows: Vec<&str> = board_str.split('/').collect();
        if rows.len() != RANK_COUNT {
            return Err(FenError::BadRankCount(rows.len()));
        }

        // FEN 从上到下是行 9 到行 0
        for (row_idx, row) in rows.iter().enumerate() {
            let rank = (RANK_COUNT - 1 - row_idx) as u8;
            let mut file = 0u8;

            for c in row.chars() {
                if file >= FILE_COUNT as u8 {
                    return Err(FenError::BadFileCount {
                        rank: row_idx,
                        files: file + 1,
                    });
                }

                if let Some(run) = c.to_digit(10) {
                    file += run as u8;
                } else if let Some(piece) = Piece::from_fen_char(c) {
                    let sq = Square::from_file_rank(file, rank).ok_or(FenError::BadFileCount {
                        rank: row_idx,
                        files: file,
                    })?;
                    pos.squares[sq.index()] = piece.code();
                    if piece.kind == PieceKind::King {
                        pos.kings[piece.side.index()] = sq.index() as u8;
                    }
                    file += 1;
                } else {
                    return Err(FenError::InvalidPiece(c));
                }
            }

            if file != FILE_COUNT as u8 {
                return Err(FenError::BadFileCount {
                    rank: row_idx,
                    files: file,
                });
            }
        }

        // 走子方（默认红方）
        if let Some(token) = parts.next() {
            let c = token.chars().next().unwrap_or('w');
            pos.side = Side::from_fen_char(c).ok_or(FenError::InvalidSide(c))?;
        }

        // 跳过占位字段，然后是无吃子步数和回合数
        let mut numbers = parts.filter(|t| *t != "-");
        if let Some(token) = numbers.next() {
            pos.quiet_plies = token.parse().unwrap_or(0);
        }
        if let Some(token) = numbers.next() {
            pos.round = token.parse().unwrap_or(1);
        }

        pos.hash = pos.full_hash();
        Ok(pos)
    }

    /// 生成 FEN 字符串
    pub fn to_fen(&self) -> String {
        let mut rows = Vec::with_capacity(RANK_COUNT);

        for rank in (0..RANK_COUNT as u8).rev() {
            let mut row = String::new();
            let mut empty_run = 0;

            for file in 0..FILE_COUNT as u8 {
                let sq = Square::from_file_rank(file, rank).expect("on-board coordinates");
                if let Some(piece) = self.piece_on(sq) {
                    if empty_run > 0 {
                        row.push_str(&empty_run.to_string());
                        empty_run = 0;
                    }
                    row.push(piece.to_fen_char());
                } else {
                    empty_run += 1;
                }
            }

            if empty_run > 0 {
                row.push_str(&empty_run.to_string());
            }
            rows.push(row);
        }

        format!(
            "{} {} - - {} {}",
            rows.join("/"),
            self.side.to_fen_char(),
            self.quiet_plies,
            self.round
        )
    }

    /// 获取指定格上的棋子
    #[inline]
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        Piece::from_code(self.squares[sq.index()])
    }

    /// 按邮箱索引取格子编码（含空格和哨兵）
    #[inline]
    pub(crate) fn cell(&self, index: usize) -> u8 {
        self.squares[index]
    }

    /// 当前走子方
    #[inline]
    pub fn side_to_move(&self) -> Side {
        self.side
    }

    /// 指定阵营将帅的位置
    #[inline]
    pub fn king_square(&self, side: Side) -> Option<Square> {
        let idx = self.kings[side.index()];
        if idx == 0 {
            None
        } else {
            Some(Square::from_index(idx as usize))
        }
    }

    /// 当前局面的 Zobrist 哈希
    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// 无吃子半回合数
    #[inline]
    pub fn quiet_plies(&self) -> u32 {
        self.quiet_plies
    }

    /// 完整回合数
    #[inline]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// 从当前棋盘整体重算哈希（加载局面和一致性测试用）
    pub fn full_hash(&self) -> u64 {
        let mut hash = 0u64;
        for sq in Square::all() {
            let code = self.squares[sq.index()];
            if code != EMPTY {
                hash ^= ZOBRIST.piece_key(code, sq.index());
            }
        }
        if self.side == Side::Black {
            hash ^= ZOBRIST.side_key();
        }
        hash
    }

    /// 把四字符坐标解析为完整走法
    ///
    /// 起点必须有当前走子方的棋子，终点不能是己方棋子；
    /// 是否送将等规则合法性由 `make_move` 判定。
    pub fn move_from_coord(&self, text: &str) -> Option<Move> {
        let (from, to) = parse_coord(text)?;
        let moved = self.piece_on(from)?;
        if moved.side != self.side {
            return None;
        }
        let captured = match self.piece_on(to) {
            Some(p) if p.side == self.side => return None,
            Some(p) => p.code(),
            None => EMPTY,
        };
        Some(Move::new(from, to, moved.code(), captured))
    }

    /// 执行走法，返回是否合法
    ///
    /// 先走子再检查自己的将是否被攻击：牵制和飞将导致的非法走法
    /// 只有在局面真正改变之后才能判定。非法走法会被立即撤销，
    /// 棋盘恢复原状，返回 false。
    pub fn make_move(&mut self, mv: Move) -> bool {
        let mover = self.side;
        let from = mv.from().index();
        let to = mv.to().index();
        let moved = mv.moved_code();
        let captured = mv.captured_code();

        self.undo.push(Undo {
            mv,
            hash: self.hash,
            quiet_plies: self.quiet_plies,
        });

        self.hash ^= ZOBRIST.piece_key(moved, from);
        if captured != EMPTY {
            self.hash ^= ZOBRIST.piece_key(captured, to);
        }
        self.hash ^= ZOBRIST.piece_key(moved, to);
        self.hash ^= ZOBRIST.side_key();

        self.squares[from] = EMPTY;
        self.squares[to] = moved;
        if mv.moved_piece().map(|p| p.kind) == Some(PieceKind::King) {
            self.kings[mover.index()] = to as u8;
        }

        self.quiet_plies = if mv.is_capture() {
            0
        } else {
            self.quiet_plies + 1
        };

        self.side = mover.opponent();
        if self.side == Side::Red {
            self.round += 1;
        }

        if self.in_check(mover) {
            self.unmake_move();
            return false;
        }
        true
    }

    /// 撤销最近一步走法
    ///
    /// 棋盘、将帅缓存、走子方、哈希和无吃子计数全部从撤销记录恢复，
    /// 不做任何重算。
    pub fn unmake_move(&mut self) {
        let undo = match self.undo.pop() {
            Some(u) => u,
            None => return,
        };
        debug_assert!(!undo.mv.is_none(), "null move must be unmade with unmake_null_move");

        if self.side == Side::Red {
            self.round -= 1;
        }
        self.side = self.side.opponent();

        let from = undo.mv.from().index();
        let to = undo.mv.to().index();
        self.squares[from] = undo.mv.moved_code();
        self.squares[to] = undo.mv.captured_code();
        if undo.mv.moved_piece().map(|p| p.kind) == Some(PieceKind::King) {
            self.kings[self.side.index()] = from as u8;
        }

        self.hash = undo.hash;
        self.quiet_plies = undo.quiet_plies;
    }

    /// 空着：只切换走子方（空着裁剪用）
    pub fn make_null_move(&mut self) {
        self.undo.push(Undo {
            mv: Move::NONE,
            hash: self.hash,
            quiet_plies: self.quiet_plies,
        });
        self.hash ^= ZOBRIST.side_key();
        self.side = self.side.opponent();
        self.quiet_plies += 1;
    }

    /// 撤销空着
    pub fn unmake_null_move(&mut self) {
        let undo = match self.undo.pop() {
            Some(u) => u,
            None => return,
        };
        debug_assert!(undo.mv.is_none());
        self.side = self.side.opponent();
        self.hash = undo.hash;
        self.quiet_plies = undo.quiet_plies;
    }

    /// 当前局面是否与本局先前局面重复
    ///
    /// 沿撤销栈从上往下扫描连续的安静走法段，比较记录的走子前哈希；
    /// 吃子或空着之后的局面不可能再现，扫描到即停止。
    pub fn is_repetition(&self) -> bool {
        for undo in self.undo.iter().rev() {
            if undo.mv.is_none() || undo.mv.is_capture() {
                break;
            }
            if undo.hash == self.hash {
                return true;
            }
        }
        false
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}
