//! 中国象棋 AI 引擎
//!
//! 基于 `xiangqi-core` 的负值极大 Alpha-Beta 搜索：
//! 迭代加深、置换表、静态搜索和一整套裁剪与排序启发。

pub mod evaluate;
pub mod search;
pub mod transposition;

pub use evaluate::Evaluator;
pub use search::{is_mate_score, AiConfig, AiEngine, Difficulty, SearchReport};
pub use transposition::{Bound, TTEntry, TTStats, TranspositionTable};
