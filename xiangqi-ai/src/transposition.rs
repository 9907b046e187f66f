//! 置换表
//!
//! 用于缓存已搜索过的局面，避免重复计算。
//! 替换策略是无条件覆盖：同一槽位后写入的条目总是生效。

use std::sync::atomic::{AtomicU64, Ordering};

use xiangqi_core::Move;

/// 置换表条目类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// 精确值
    Exact,
    /// 下界（Beta 截断）
    Lower,
    /// 上界（没有走法超过 Alpha）
    Upper,
}

/// 置换表条目
#[derive(Debug, Clone, Copy)]
pub struct TTEntry {
    /// 完整的 Zobrist 哈希，用于验证
    pub key: u64,
    /// 评估分数（杀棋分已按层数归一化）
    pub score: i32,
    /// 搜索深度
    pub depth: i32,
    /// 条目类型
    pub bound: Bound,
    /// 最佳走法，没有时为空走法
    pub best_move: Move,
}

/// 置换表
///
/// 固定大小的哈希表，索引为哈希对表长取模
pub struct TranspositionTable {
    /// 条目数组
    entries: Vec<Option<TTEntry>>,
    /// 表大小（条目数）
    size: usize,
    /// 命中次数
    hits: AtomicU64,
    /// 查询次数
    probes: AtomicU64,
}

impl TranspositionTable {
    /// 创建指定大小的置换表
    ///
    /// # Arguments
    /// * `size_mb` - 表大小（MB）
    pub fn new(size_mb: usize) -> Self {
        let entry_size = std::mem::size_of::<Option<TTEntry>>();
        let size = ((size_mb * 1024 * 1024) / entry_size).max(1);

        Self {
            entries: vec![None; size],
            size,
            hits: AtomicU64::new(0),
            probes: AtomicU64::new(0),
        }
    }

    /// 计算索引
    #[inline]
    fn index(&self, hash: u64) -> usize {
        (hash as usize) % self.size
    }

    /// 查询条目
    pub fn probe(&self, hash: u64) -> Option<&TTEntry> {
        self.probes.fetch_add(1, Ordering::Relaxed);

        match &self.entries[self.index(hash)] {
            Some(entry) if entry.key == hash => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry)
            }
            _ => None,
        }
    }

    /// 存储条目，无条件覆盖旧条目
    pub fn store(&mut self, hash: u64, score: i32, depth: i32, bound: Bound, best_move: Move) {
        let index = self.index(hash);
        self.entries[index] = Some(TTEntry {
            key: hash,
            score,
            depth,
            bound,
            best_move,
        });
    }

    /// 清空表
    pub fn clear(&mut self) {
        self.entries.fill(None);
        self.hits.store(0, Ordering::Relaxed);
        self.probes.store(0, Ordering::Relaxed);
    }

    /// 获取统计信息
    pub fn stats(&self) -> TTStats {
        TTStats {
            entries: self.size,
            used: self.entries.iter().filter(|e| e.is_some()).count(),
            hits: self.hits.load(Ordering::Relaxed),
            probes: self.probes.load(Ordering::Relaxed),
        }
    }
}

/// 置换表统计信息
#[derive(Debug, Clone)]
pub struct TTStats {
    pub entries: usize,
    pub used: usize,
    pub hits: u64,
    pub probes: u64,
}

impl TTStats {
    pub fn hit_rate(&self) -> f64 {
        if self.probes == 0 {
            0.0
        } else {
            self.hits as f64 / self.probes as f64
        }
    }

    pub fn usage(&self) -> f64 {
        self.used as f64 / self.entries as f64
    }
}
