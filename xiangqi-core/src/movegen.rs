//! 攻击检测与走法生成
//!
//! 所有方向都用邮箱偏移量表达：上下是 ±11，左右是 ±1。
//! 生成的是伪合法走法，送将的过滤在 `make_move` 里完成。

use crate::board::Position;
use crate::moves::Move;
use crate::piece::{PieceKind, Side, EMPTY, KIND_MASK, OFF_BOARD};
use crate::square::{Square, BOARD_SIZE};

/// 直线方向偏移
const ORTHO: [i32; 4] = [11, -11, 1, -1];

/// 斜线方向偏移
const DIAG: [i32; 4] = [12, 10, -12, -10];

/// 马的走法偏移与对应的蹩马腿偏移
const KNIGHT: [(i32, i32); 8] = [
    (23, 11),
    (21, 11),
    (-21, -11),
    (-23, -11),
    (13, 1),
    (-9, 1),
    (9, -1),
    (-13, -1),
];

/// 象的走法偏移与对应的象眼偏移
const ELEPHANT: [(i32, i32); 4] = [(24, 12), (20, 10), (-24, -12), (-20, -10)];

/// 兵的前进方向
#[inline]
fn forward(side: Side) -> i32 {
    match side {
        Side::Red => 11,
        Side::Black => -11,
    }
}

impl Position {
    /// 检查指定格是否被某一方攻击
    ///
    /// 依次测试马（蹩马腿须为空）、直线上的车/将/炮（将的分支
    /// 同时覆盖飞将；炮需要恰好一个炮架）、以及兵。
    /// 这是所有将军判定的唯一入口，本身不改动棋盘。
    pub fn is_square_attacked(&self, sq: Square, by: Side) -> bool {
        let s = sq.index() as i32;
        let flag = by.flag();
        let pawn = flag | PieceKind::Pawn.code();
        let knight = flag | PieceKind::Knight.code();
        let rook = flag | PieceKind::Rook.code();
        let cannon = flag | PieceKind::Cannon.code();
        let king = flag | PieceKind::King.code();

        // 马：从 8 个来源格反查，蹩马腿在马的那一侧
        for (d, leg) in KNIGHT {
            let o = s - d;
            if !(0..BOARD_SIZE as i32).contains(&o) {
                continue;
            }
            if self.cell(o as usize) == knight && self.cell((o + leg) as usize) == EMPTY {
                return true;
            }
        }

        // 车 / 将 / 炮：沿直线扫描。第一个障碍是敌方车或将即被攻击
        // （将的分支覆盖飞将和贴身将），隔一个炮架后的敌炮也算。
        for d in ORTHO {
            let mut t = s + d;
            loop {
                let c = self.cell(t as usize);
                if c == EMPTY {
                    t += d;
                    continue;
                }
                if c == OFF_BOARD {
                    break;
                }
                if c == rook || c == king {
                    return true;
                }
                t += d;
                loop {
                    let c2 = self.cell(t as usize);
                    if c2 == EMPTY {
                        t += d;
                        continue;
                    }
                    if c2 == cannon {
                        return true;
                    }
                    break;
                }
                break;
            }
        }

        // 兵：正前方一格的敌兵始终攻击，过河的敌兵还攻击左右
        if self.cell((s - forward(by)) as usize) == pawn {
            return true;
        }
        for d in [1, -1] {
            let t = (s + d) as usize;
            if self.cell(t) == pawn && Square::zone_at(t) & Square::half_bit(by) == 0 {
                return true;
            }
        }

        false
    }

    /// 指定阵营是否被将军
    pub fn in_check(&self, side: Side) -> bool {
        match self.king_square(side) {
            Some(king) => self.is_square_attacked(king, side.opponent()),
            None => false,
        }
    }

    /// 生成当前走子方的所有伪合法走法
    pub fn pseudo_legal_moves(&self) -> Vec<Move> {
        self.generate(false)
    }

    /// 只生成吃子走法（静态搜索用）
    pub fn capture_moves(&self) -> Vec<Move> {
        self.generate(true)
    }

    /// 生成当前走子方的所有合法走法
    pub fn legal_moves(&mut self) -> Vec<Move> {
        let pseudo = self.pseudo_legal_moves();
        let mut legal = Vec::with_capacity(pseudo.len());
        for mv in pseudo {
            if self.make_move(mv) {
                self.unmake_move();
                legal.push(mv);
            }
        }
        legal
    }

    /// 是否被将死
    pub fn is_checkmate(&mut self) -> bool {
        self.in_check(self.side_to_move()) && self.legal_moves().is_empty()
    }

    /// 是否困毙（无子可动但未被将军）
    pub fn is_stalemate(&mut self) -> bool {
        !self.in_check(self.side_to_move()) && self.legal_moves().is_empty()
    }

    fn generate(&self, captures_only: bool) -> Vec<Move> {
        let side = self.side_to_move();
        let own = side.flag();
        let enemy = side.opponent().flag();
        let mut moves = Vec::with_capacity(64);

        for from_sq in Square::all() {
            let from = from_sq.index();
            let code = self.cell(from);
            if code & own == 0 {
                continue;
            }
            let s = from as i32;

            match PieceKind::from_code(code & KIND_MASK) {
                Some(PieceKind::King) => {
                    let palace = Square::palace_bit(side);
                    for d in ORTHO {
                        let t = s + d;
                        if Square::zone_at(t as usize) & palace == 0 {
                            continue;
                        }
                        self.push_step(&mut moves, from, t, code, enemy, captures_only);
                    }
                }
                Some(PieceKind::Advisor) => {
                    let palace = Square::palace_bit(side);
                    for d in DIAG {
                        let t = s + d;
                        if Square::zone_at(t as usize) & palace == 0 {
                            continue;
                        }
                        self.push_step(&mut moves, from, t, code, enemy, captures_only);
                    }
                }
                Some(PieceKind::Bishop) => {
                    let half = Square::half_bit(side);
                    for (d, eye) in ELEPHANT {
                        let t = s + d;
                        if !(0..BOARD_SIZE as i32).contains(&t) {
                            continue;
                        }
                        // 不能过河，象眼不能被堵
                        if Square::zone_at(t as usize) & half == 0 {
                            continue;
                        }
                        if self.cell((s + eye) as usize) != EMPTY {
                            continue;
                        }
                        self.push_step(&mut moves, from, t, code, enemy, captures_only);
                    }
                }
                Some(PieceKind::Knight) => {
                    for (d, leg) in KNIGHT {
                        if self.cell((s + leg) as usize) != EMPTY {
                            continue;
                        }
                        self.push_step(&mut moves, from, s + d, code, enemy, captures_only);
                    }
                }
                Some(PieceKind::Rook) => {
                    for d in ORTHO {
                        let mut t = s + d;
                        loop {
                            let c = self.cell(t as usize);
                            if c == EMPTY {
                                if !captures_only {
                                    self.push_quiet(&mut moves, from, t, code);
                                }
                                t += d;
                                continue;
                            }
                            if c & enemy != 0 {
                                self.push_capture(&mut moves, from, t, code, c);
                            }
                            break;
                        }
                    }
                }
                Some(PieceKind::Cannon) => {
                    for d in ORTHO {
                        let mut t = s + d;
                        loop {
                            let c = self.cell(t as usize);
                            if c == EMPTY {
                                if !captures_only {
                                    self.push_quiet(&mut moves, from, t, code);
                                }
                                t += d;
                                continue;
                            }
                            if c == OFF_BOARD {
                                break;
                            }
                            // 第一个障碍作炮架，隔着它找吃子目标
                            t += d;
                            loop {
                                let c2 = self.cell(t as usize);
                                if c2 == EMPTY {
                                    t += d;
                                    continue;
                                }
                                if c2 & enemy != 0 {
                                    self.push_capture(&mut moves, from, t, code, c2);
                                }
                                break;
                            }
                            break;
                        }
                    }
                }
                Some(PieceKind::Pawn) => {
                    self.push_step(&mut moves, from, s + forward(side), code, enemy, captures_only);
                    if !from_sq.in_own_half(side) {
                        // 过河后可以左右移动
                        self.push_step(&mut moves, from, s + 1, code, enemy, captures_only);
                        self.push_step(&mut moves, from, s - 1, code, enemy, captures_only);
                    }
                }
                None => {}
            }
        }

        moves
    }

    /// 单步走法：目标是敌子则吃，空格则走（哨兵格两者都不是）
    #[inline]
    fn push_step(
        &self,
        moves: &mut Vec<Move>,
        from: usize,
        to: i32,
        moved: u8,
        enemy: u8,
        captures_only: bool,
    ) {
        let c = self.cell(to as usize);
        if c & enemy != 0 {
            self.push_capture(moves, from, to, moved, c);
        } else if c == EMPTY && !captures_only {
            self.push_quiet(moves, from, to, moved);
        }
    }

    #[inline]
    fn push_quiet(&self, moves: &mut Vec<Move>, from: usize, to: i32, moved: u8) {
        moves.push(Move::new(
            Square::from_index(from),
            Square::from_index(to as usize),
            moved,
            EMPTY,
        ));
    }

    #[inline]
    fn push_capture(&self, moves: &mut Vec<Move>, from: usize, to: i32, moved: u8, captured: u8) {
        moves.push(Move::new(
            Square::from_index(from),
            Square::from_index(to as usize),
            moved,
            captured,
        ));
    }
}

/// 统计指定深度可达的合法叶子局面数
pub fn perft(pos: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut nodes = 0;
    for mv in pos.pseudo_legal_moves() {
        if !pos.make_move(mv) {
            continue;
        }
        nodes += if depth == 1 { 1 } else { perft(pos, depth - 1) };
        pos.unmake_move();
    }
    nodes
}
