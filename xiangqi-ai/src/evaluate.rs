//! 棋局评估函数

use xiangqi_core::{Piece, PieceKind, Position, Side, Square};

/// 评估器
pub struct Evaluator;

/// 棋子位置分值表（红方视角，黑方需要镜像）
/// 索引为 rank * 9 + file
mod position_tables {
    /// 兵的位置分值
    pub const PAWN: [i32; 90] = [
        0,  0,  0,  0,  0,  0,  0,  0,  0,
        0,  0,  0,  0,  0,  0,  0,  0,  0,
        0,  0,  0,  0,  0,  0,  0,  0,  0,
        0,  0,  0,  0,  0,  0,  0,  0,  0,
        2,  6,  8, 12, 14, 12,  8,  6,  2,  // 过河后价值提升
       10, 20, 30, 40, 50, 40, 30, 20, 10,
       20, 40, 60, 80, 90, 80, 60, 40, 20,
       30, 60, 90,110,120,110, 90, 60, 30,
       40, 80,100,120,130,120,100, 80, 40,
        0,  0,  0,  0,  0,  0,  0,  0,  0,  // 不可能到达
    ];

    /// 马的位置分值
    pub const KNIGHT: [i32; 90] = [
        0, 10, 20, 30, 30, 30, 20, 10,  0,
       10, 30, 40, 50, 50, 50, 40, 30, 10,
       20, 40, 60, 70, 70, 70, 60, 40, 20,
       30, 50, 70, 80, 80, 80, 70, 50, 30,
       40, 60, 80, 90, 90, 90, 80, 60, 40,
       40, 60, 80, 90, 90, 90, 80, 60, 40,
       30, 50, 70, 80, 80, 80, 70, 50, 30,
       20, 40, 60, 70, 70, 70, 60, 40, 20,
       10, 30, 40, 50, 50, 50, 40, 30, 10,
        0, 10, 20, 30, 30, 30, 20, 10,  0,
    ];

    /// 炮的位置分值
    pub const CANNON: [i32; 90] = [
       10, 10, 10, 20, 30, 20, 10, 10, 10,
       10, 20, 30, 40, 50, 40, 30, 20, 10,
       10, 20, 30, 40, 50, 40, 30, 20, 10,
       10, 30, 40, 50, 60, 50, 40, 30, 10,
       10, 40, 50, 60, 70, 60, 50, 40, 10,
       10, 40, 50, 60, 70, 60, 50, 40, 10,
       10, 30, 40, 50, 60, 50, 40, 30, 10,
       10, 20, 30, 40, 50, 40, 30, 20, 10,
       10, 20, 30, 40, 50, 40, 30, 20, 10,
       10, 10, 10, 20, 30, 20, 10, 10, 10,
    ];

    /// 车的位置分值
    pub const ROOK: [i32; 90] = [
       10, 20, 20, 40, 50, 40, 20, 20, 10,
       20, 40, 50, 60, 70, 60, 50, 40, 20,
       20, 40, 50, 60, 70, 60, 50, 40, 20,
       30, 50, 60, 70, 80, 70, 60, 50, 30,
       40, 60, 70, 80, 90, 80, 70, 60, 40,
       40, 60, 70, 80, 90, 80, 70, 60, 40,
       30, 50, 60, 70, 80, 70, 60, 50, 30,
       20, 40, 50, 60, 70, 60, 50, 40, 20,
       20, 40, 50, 60, 70, 60, 50, 40, 20,
       10, 20, 20, 40, 50, 40, 20, 20, 10,
    ];
}

impl Evaluator {
    /// 评估棋局（当前走子方视角，负值搜索约定）
    pub fn evaluate(pos: &Position) -> i32 {
        let score = Self::evaluate_red(pos);
        match pos.side_to_move() {
            Side::Red => score,
            Side::Black => -score,
        }
    }

    /// 评估棋局（红方视角，正值对红方有利）
    fn evaluate_red(pos: &Position) -> i32 {
        let mut score = 0;

        for sq in Square::all() {
            if let Some(piece) = pos.piece_on(sq) {
                let piece_score = Self::evaluate_piece(sq, piece);
                match piece.side {
                    Side::Red => score += piece_score,
                    Side::Black => score -= piece_score,
                }
            }
        }

        score
    }

    /// 评估单个棋子的价值（包括位置分）
    fn evaluate_piece(sq: Square, piece: Piece) -> i32 {
        piece.kind.value() + Self::position_bonus(sq, piece)
    }

    /// 获取位置加成分
    fn position_bonus(sq: Square, piece: Piece) -> i32 {
        let index = match piece.side {
            Side::Red => sq.rank() as usize * 9 + sq.file() as usize,
            // 黑方需要镜像（行坐标翻转）
            Side::Black => (9 - sq.rank() as usize) * 9 + sq.file() as usize,
        };

        match piece.kind {
            PieceKind::Pawn => position_tables::PAWN[index],
            PieceKind::Knight => position_tables::KNIGHT[index],
            PieceKind::Cannon => position_tables::CANNON[index],
            PieceKind::Rook => position_tables::ROOK[index],
            // 其他棋子暂时不加位置分
            _ => 0,
        }
    }

    /// 快速评估（仅计算子力差，红方视角）
    pub fn evaluate_material(pos: &Position) -> i32 {
        let mut score = 0;
        for sq in Square::all() {
            if let Some(piece) = pos.piece_on(sq) {
                match piece.side {
                    Side::Red => score += piece.kind.value(),
                    Side::Black => score -= piece.kind.value(),
                }
            }
        }
        score
    }
}
