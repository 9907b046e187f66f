//! 搜索引擎
//!
//! 负值极大 Alpha-Beta + 静态搜索 + 迭代加深。
//! 裁剪手段：置换表、空着裁剪、静态边际裁剪、Razoring、
//! 无望走法裁剪、延迟走法缩减（LMR）和主变窗口搜索（PVS）。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use xiangqi_core::{FenError, Move, PieceKind, Position, Side, Square};

use crate::evaluate::Evaluator;
use crate::transposition::{Bound, TTStats, TranspositionTable};

/// 杀棋基准分
pub const MATE_VALUE: i32 = 10_000;
/// 搜索窗口边界
pub const INFINITY: i32 = 11_000;
/// 超过该绝对值的分数视为杀棋分
pub const MATE_BOUND: i32 = MATE_VALUE - 256;

/// 搜索树的最大层数
const MAX_PLY: usize = 64;
/// 只给时间不给深度时的内部深度上限
const INTERNAL_DEPTH_CAP: u8 = 32;
/// 每搜索这么多节点检查一次时钟（必须是 2 的幂）
const TIME_CHECK_INTERVAL: u64 = 2048;

/// 空着裁剪的深度缩减量
const NULL_MOVE_REDUCTION: i32 = 2;
/// 静态边际裁剪：每层深度的边际
const STATIC_PRUNE_MARGIN: i32 = 80;
/// Razoring 每层深度的边际
const RAZOR_MARGIN: i32 = 400;
/// 无望走法裁剪每层深度的边际
const FUTILITY_MARGIN: i32 = 120;
/// 前几个走法不做缩减
const LMR_FULL_DEPTH_MOVES: usize = 4;
/// 低于该深度不做缩减
const LMR_DEPTH_LIMIT: i32 = 3;

/// 走法排序分值：主变走法
const SCORE_PV: i32 = 2_000_000;
/// 走法排序分值：置换表走法
const SCORE_TT: i32 = 1_500_000;
/// 走法排序分值：吃子走法的基准
const SCORE_CAPTURE: i32 = 1_000_000;
/// 走法排序分值：第一杀手走法
const SCORE_KILLER_1: i32 = 900_000;
/// 走法排序分值：第二杀手走法
const SCORE_KILLER_2: i32 = 800_000;
/// 历史分超过该值时整表减半，保证不会盖过杀手走法
const HISTORY_LIMIT: i32 = 700_000;

/// 难度等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// AI 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    pub difficulty: Difficulty,
    /// 最大搜索深度；缺省时只按时间停
    pub max_depth: Option<u8>,
    /// 时间预算；缺省时只按深度停
    pub time_limit_ms: Option<u64>,
    /// 置换表大小（MB）
    pub tt_size_mb: usize,
    /// 重复局面的评分（默认一个炮的子力损失）
    pub repetition_score: i32,
    /// 连续无吃子多少个半回合判和
    pub draw_move_limit: u32,
}

impl AiConfig {
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self {
                difficulty,
                max_depth: Some(3),
                time_limit_ms: Some(1000),
                ..Self::base()
            },
            Difficulty::Medium => Self {
                difficulty,
                max_depth: Some(4),
                time_limit_ms: Some(3000),
                ..Self::base()
            },
            Difficulty::Hard => Self {
                difficulty,
                max_depth: Some(6),
                time_limit_ms: Some(5000),
                ..Self::base()
            },
        }
    }

    fn base() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            max_depth: None,
            time_limit_ms: None,
            tt_size_mb: 64,
            repetition_score: -PieceKind::Cannon.value(),
            draw_move_limit: 120,
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self::from_difficulty(Difficulty::Medium)
    }
}

/// 一次搜索的结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchReport {
    pub best_move: Move,
    /// 当前走子方视角的分数
    pub score: i32,
    /// 完成的最深迭代
    pub depth: u8,
    pub nodes: u64,
}

/// 判断分数是否属于杀棋分
pub fn is_mate_score(score: i32) -> bool {
    score.abs() > MATE_BOUND
}

/// 杀棋分存入置换表前按当前层数归一化
fn value_to_tt(score: i32, ply: usize) -> i32 {
    if score > MATE_BOUND {
        score + ply as i32
    } else if score < -MATE_BOUND {
        score - ply as i32
    } else {
        score
    }
}

/// 从置换表取出的杀棋分还原为当前层数视角
fn value_from_tt(score: i32, ply: usize) -> i32 {
    if score > MATE_BOUND {
        score - ply as i32
    } else if score < -MATE_BOUND {
        score + ply as i32
    } else {
        score
    }
}

/// AI 引擎
///
/// 持有棋盘和全部搜索状态。并发搜索需要各自独立的实例。
pub struct AiEngine {
    config: AiConfig,
    position: Position,
    tt: TranspositionTable,
    /// 每层两个杀手走法
    killers: [[Move; 2]; MAX_PLY],
    /// 历史启发表，按（棋子、目标格）索引
    history: [[i32; 90]; 14],
    /// 三角主变表
    pv_table: [[Move; MAX_PLY]; MAX_PLY],
    pv_length: [usize; MAX_PLY],
    /// 当前是否还在沿上一迭代的主变走
    follow_pv: bool,
    score_pv: bool,
    ply: usize,
    nodes: u64,
    stopped: bool,
    deadline: Option<Instant>,
    stop: Arc<AtomicBool>,
}

impl AiEngine {
    /// 创建新的 AI 引擎，初始局面为开局
    pub fn new(config: AiConfig) -> Self {
        let tt = TranspositionTable::new(config.tt_size_mb);
        Self {
            config,
            position: Position::startpos(),
            tt,
            killers: [[Move::NONE; 2]; MAX_PLY],
            history: [[0; 90]; 14],
            pv_table: [[Move::NONE; MAX_PLY]; MAX_PLY],
            pv_length: [0; MAX_PLY],
            follow_pv: false,
            score_pv: false,
            ply: 0,
            nodes: 0,
            stopped: false,
            deadline: None,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// 从难度创建
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self::new(AiConfig::from_difficulty(difficulty))
    }

    /// 设置要搜索的局面
    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// 从 FEN 设置局面；解析失败时原局面不变
    pub fn load_fen(&mut self, fen: &str) -> Result<(), FenError> {
        self.position = Position::from_fen(fen)?;
        Ok(())
    }

    /// 当前局面
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// 外部停止句柄；置位后搜索在下一次检查点返回
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// 获取搜索的节点数
    pub fn nodes_searched(&self) -> u64 {
        self.nodes
    }

    /// 置换表统计
    pub fn tt_stats(&self) -> TTStats {
        self.tt.stats()
    }

    /// 搜索最佳走法
    ///
    /// 迭代加深直到深度或时间预算用尽，返回最深一次完成迭代的
    /// 结果。只有在当前走子方没有合法走法时返回 `None`（调用方
    /// 用 `Position::in_check` 区分将死和困毙）。
    pub fn search(&mut self) -> Option<SearchReport> {
        self.nodes = 0;
        self.stopped = false;
        self.stop.store(false, Ordering::Relaxed);
        self.ply = 0;
        self.tt.clear();
        self.killers = [[Move::NONE; 2]; MAX_PLY];
        self.history = [[0; 90]; 14];
        self.pv_table = [[Move::NONE; MAX_PLY]; MAX_PLY];
        self.pv_length = [0; MAX_PLY];

        let legal = self.position.legal_moves();
        if legal.is_empty() {
            return None;
        }

        // 唯一的合法走法不值得搜索
        if legal.len() == 1 {
            return Some(SearchReport {
                best_move: legal[0],
                score: Evaluator::evaluate(&self.position),
                depth: 0,
                nodes: 0,
            });
        }

        self.deadline = self
            .config
            .time_limit_ms
            .map(|ms| Instant::now() + Duration::from_millis(ms));

        let max_depth = self
            .config
            .max_depth
            .unwrap_or(INTERNAL_DEPTH_CAP)
            .min(MAX_PLY as u8 - 1);

        let mut best_move = legal[0];
        // 一层都没搜完时回退到静态评估，避免报出假杀分
        let mut best_score = Evaluator::evaluate(&self.position);
        let mut completed = 0u8;

        for depth in 1..=max_depth {
            self.follow_pv = true;
            let score = self.negamax(-INFINITY, INFINITY, depth as i32, false);

            // 被打断的迭代不可信，丢弃
            if self.stopped {
                break;
            }

            best_score = score;
            completed = depth;
            if self.pv_length[0] > 0 {
                best_move = self.pv_table[0][0];
            }

            tracing::debug!(
                depth,
                score,
                nodes = self.nodes,
                pv = %self.pv_line(),
                "completed iteration"
            );

            // 已经找到杀棋，更深的迭代不会改变结论
            if is_mate_score(score) {
                break;
            }
        }

        Some(SearchReport {
            best_move,
            score: best_score,
            depth: completed,
            nodes: self.nodes,
        })
    }

    fn negamax(&mut self, mut alpha: i32, beta: i32, depth: i32, allow_null: bool) -> i32 {
        if self.nodes & (TIME_CHECK_INTERVAL - 1) == 0 {
            self.poll_stop();
        }
        if self.stopped {
            return 0;
        }

        self.pv_length[self.ply] = self.ply;
        let is_pv = beta - alpha > 1;
        let side = self.position.side_to_move();

        if self.ply > 0 {
            if self.position.is_repetition() {
                return self.config.repetition_score;
            }
            if self.position.quiet_plies() >= self.config.draw_move_limit {
                return 0;
            }
            if self.ply >= MAX_PLY - 1 {
                return Evaluator::evaluate(&self.position);
            }
        }

        // 被将军时多搜一层，必须在进入静态搜索前判断
        let in_check = self.position.in_check(side);
        let depth = if in_check { depth + 1 } else { depth };

        if depth <= 0 {
            return self.quiescence(alpha, beta);
        }

        self.nodes += 1;

        let mut tt_move = Move::NONE;
        if let Some(entry) = self.tt.probe(self.position.hash()) {
            tt_move = entry.best_move;
            if self.ply > 0 && !is_pv && entry.depth >= depth {
                let score = value_from_tt(entry.score, self.ply);
                match entry.bound {
                    Bound::Exact => return score,
                    Bound::Lower if score >= beta => return score,
                    Bound::Upper if score <= alpha => return score,
                    _ => {}
                }
            }
        }

        let static_eval = Evaluator::evaluate(&self.position);

        if !in_check && !is_pv {
            // 静态边际裁剪：评估值减去边际仍然超过 beta
            if depth <= 3
                && beta.abs() < MATE_BOUND
                && static_eval - STATIC_PRUNE_MARGIN * depth >= beta
            {
                return static_eval - STATIC_PRUNE_MARGIN * depth;
            }

            // 空着裁剪：让一手后缩减深度仍然超过 beta。
            // 残局大子不足时跳过，避免被迫移动（Zugzwang）误剪
            if allow_null && depth >= 3 && static_eval >= beta && self.has_major_pieces(side) {
                self.position.make_null_move();
                self.ply += 1;
                let score = -self.negamax(-beta, -beta + 1, depth - 1 - NULL_MOVE_REDUCTION, false);
                self.ply -= 1;
                self.position.unmake_null_move();
                if self.stopped {
                    return 0;
                }
                if score >= beta {
                    return beta;
                }
            }

            // Razoring：评估值加上边际都到不了 beta，直接用静态搜索验证
            if depth <= 3 && static_eval + RAZOR_MARGIN * depth < beta {
                let score = self.quiescence(alpha, beta);
                if score < beta {
                    return score;
                }
            }
        }

        let mut moves = self.position.pseudo_legal_moves();

        // 上一迭代的主变还跟得上时给它最高排序分
        if self.follow_pv {
            self.follow_pv = false;
            let pv_move = self.pv_table[0][self.ply];
            if !pv_move.is_none() && moves.contains(&pv_move) {
                self.follow_pv = true;
                self.score_pv = true;
            }
        }

        let mut scores: Vec<i32> = moves.iter().map(|&mv| self.score_move(mv, tt_move)).collect();

        let mut legal = 0usize;
        let mut bound = Bound::Upper;
        let mut best_move = Move::NONE;

        for i in 0..moves.len() {
            self.pick_move(&mut moves, &mut scores, i);
            let mv = moves[i];

            if !self.position.make_move(mv) {
                continue;
            }
            self.ply += 1;

            let gives_check = self.position.in_check(self.position.side_to_move());

            // 无望走法裁剪：近叶层评估值加边际都到不了 alpha 的静着
            if legal > 0
                && !is_pv
                && !in_check
                && !gives_check
                && !mv.is_capture()
                && depth <= 2
                && static_eval + FUTILITY_MARGIN * depth <= alpha
            {
                self.ply -= 1;
                self.position.unmake_move();
                continue;
            }

            let score = if legal == 0 {
                -self.negamax(-beta, -alpha, depth - 1, true)
            } else {
                // 排序靠后的静着先用缩减深度的零窗口试探
                let mut score = if legal >= LMR_FULL_DEPTH_MOVES
                    && depth >= LMR_DEPTH_LIMIT
                    && !in_check
                    && !gives_check
                    && !mv.is_capture()
                {
                    -self.negamax(-alpha - 1, -alpha, depth - 2, true)
                } else {
                    alpha + 1
                };

                // PVS：试探超过 alpha 再用零窗口全深度验证，
                // 落在窗口里才做全窗口重搜
                if score > alpha {
                    score = -self.negamax(-alpha - 1, -alpha, depth - 1, true);
                    if score > alpha && score < beta {
                        score = -self.negamax(-beta, -alpha, depth - 1, true);
                    }
                }
                score
            };

            self.ply -= 1;
            self.position.unmake_move();
            if self.stopped {
                return 0;
            }

            legal += 1;

            if score > alpha {
                alpha = score;
                bound = Bound::Exact;
                best_move = mv;

                // 记录主变
                self.pv_table[self.ply][self.ply] = mv;
                for next in self.ply + 1..self.pv_length[self.ply + 1] {
                    self.pv_table[self.ply][next] = self.pv_table[self.ply + 1][next];
                }
                self.pv_length[self.ply] = self.pv_length[self.ply + 1];

                if score >= beta {
                    if !mv.is_capture() {
                        self.record_cutoff(mv, depth);
                    }
                    self.tt.store(
                        self.position.hash(),
                        value_to_tt(beta, self.ply),
                        depth,
                        Bound::Lower,
                        mv,
                    );
                    return beta;
                }
            }
        }

        // 无子可走：将死和困毙在象棋里都判负，越早的杀棋分数越高
        if legal == 0 {
            return self.ply as i32 - MATE_VALUE;
        }

        self.tt.store(
            self.position.hash(),
            value_to_tt(alpha, self.ply),
            depth,
            bound,
            best_move,
        );

        alpha
    }

    /// 静态搜索：只展开吃子走法，直到局面安静
    fn quiescence(&mut self, mut alpha: i32, beta: i32) -> i32 {
        if self.nodes & (TIME_CHECK_INTERVAL - 1) == 0 {
            self.poll_stop();
        }
        if self.stopped {
            return 0;
        }

        self.nodes += 1;

        let stand_pat = Evaluator::evaluate(&self.position);
        if self.ply >= MAX_PLY - 1 {
            return stand_pat;
        }
        if stand_pat >= beta {
            return beta;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        let mut moves = self.position.capture_moves();
        let mut scores: Vec<i32> = moves.iter().map(|&mv| self.score_move(mv, Move::NONE)).collect();

        for i in 0..moves.len() {
            self.pick_move(&mut moves, &mut scores, i);
            let mv = moves[i];

            if !self.position.make_move(mv) {
                continue;
            }
            self.ply += 1;
            let score = -self.quiescence(-beta, -alpha);
            self.ply -= 1;
            self.position.unmake_move();
            if self.stopped {
                return 0;
            }

            if score >= beta {
                return beta;
            }
            if score > alpha {
                alpha = score;
            }
        }

        alpha
    }

    /// 把第 `i` 个之后分数最高的走法换到第 `i` 位（选择排序一步）
    fn pick_move(&self, moves: &mut [Move], scores: &mut [i32], i: usize) {
        let mut best = i;
        for j in i + 1..moves.len() {
            if scores[j] > scores[best] {
                best = j;
            }
        }
        moves.swap(i, best);
        scores.swap(i, best);
    }

    /// 走法排序分：主变 > 置换表 > 吃子（MVV-LVA）> 杀手 > 历史
    fn score_move(&mut self, mv: Move, tt_move: Move) -> i32 {
        if self.score_pv && mv == self.pv_table[0][self.ply] {
            self.score_pv = false;
            return SCORE_PV;
        }
        if !tt_move.is_none() && mv == tt_move {
            return SCORE_TT;
        }
        if let Some(victim) = mv.captured_piece() {
            let attacker = mv.moved_piece().map_or(0, |p| p.kind.value());
            return SCORE_CAPTURE + victim.kind.value() * 10 - attacker;
        }
        if mv == self.killers[self.ply][0] {
            return SCORE_KILLER_1;
        }
        if mv == self.killers[self.ply][1] {
            return SCORE_KILLER_2;
        }
        match Self::history_index(mv) {
            Some((piece, to)) => self.history[piece][to],
            None => 0,
        }
    }

    /// 静着引发截断时记录杀手走法并累加历史分
    fn record_cutoff(&mut self, mv: Move, depth: i32) {
        if mv != self.killers[self.ply][0] {
            self.killers[self.ply][1] = self.killers[self.ply][0];
            self.killers[self.ply][0] = mv;
        }

        if let Some((piece, to)) = Self::history_index(mv) {
            self.history[piece][to] += depth * depth;
            if self.history[piece][to] > HISTORY_LIMIT {
                for row in self.history.iter_mut() {
                    for value in row.iter_mut() {
                        *value /= 2;
                    }
                }
            }
        }
    }

    fn history_index(mv: Move) -> Option<(usize, usize)> {
        let piece = mv.moved_piece()?;
        let to = mv.to();
        Some((
            piece.side.index() * 7 + piece.kind.index(),
            to.rank() as usize * 9 + to.file() as usize,
        ))
    }

    /// 走子方是否还有车马炮，空着裁剪的先决条件
    fn has_major_pieces(&self, side: Side) -> bool {
        Square::all().any(|sq| {
            self.position.piece_on(sq).is_some_and(|p| {
                p.side == side
                    && matches!(
                        p.kind,
                        PieceKind::Rook | PieceKind::Cannon | PieceKind::Knight
                    )
            })
        })
    }

    fn poll_stop(&mut self) {
        if self.stop.load(Ordering::Relaxed) {
            self.stopped = true;
            return;
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                self.stopped = true;
            }
        }
    }

    fn pv_line(&self) -> String {
        self.pv_table[0][..self.pv_length[0]]
            .iter()
            .map(|mv| mv.coord())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
