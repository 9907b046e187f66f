//! 错误类型定义

use thiserror::Error;

/// FEN 解析错误
///
/// 解析失败时棋盘状态不会被修改，调用方需重新提供合法输入。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// 空字符串
    #[error("Empty FEN string")]
    Empty,

    /// 行数不对
    #[error("Expected 10 ranks, got {0}")]
    BadRankCount(usize),

    /// 某一行的列数不对
    #[error("Rank {rank} has {files} files, expected 9")]
    BadFileCount { rank: usize, files: u8 },

    /// 无效的棋子字符
    #[error("Invalid piece character: {0}")]
    InvalidPiece(char),

    /// 无效的走子方
    #[error("Invalid side to move: {0}")]
    InvalidSide(char),
}
