//! 编辑历史管理（线性模型）
//!
//! 每个文件一条独立的时间线：`past ++ [current] ++ future`。
//! - 历史只保存文本副本，与文件树中的实时内容解耦
//! - Undo 之后的新提交会丢弃 `future`
//! - 条目在首次编辑时惰性创建，文件删除时随之丢弃

use super::file_tree::NodeId;
use rustc_hash::FxHashMap;
use std::collections::VecDeque;

/// 每个文件最多保留的 `past` 条目数
pub const DEFAULT_HISTORY_LIMIT: usize = 500;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryEntry {
    past: Vec<String>,
    future: VecDeque<String>,
}

impl HistoryEntry {
    pub fn past(&self) -> &[String] {
        &self.past
    }

    pub fn future(&self) -> &VecDeque<String> {
        &self.future
    }

    /// 时间线长度：`len(past) + len(future) + 1`
    pub fn timeline_len(&self) -> usize {
        self.past.len() + self.future.len() + 1
    }
}

#[derive(Debug)]
pub struct HistoryStore {
    entries: FxHashMap<NodeId, HistoryEntry>,
    limit: usize,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: FxHashMap::default(),
            limit: limit.max(1),
        }
    }

    /// 在新内容生效之前记录即将被覆盖的内容
    pub fn commit(&mut self, file: NodeId, prior: String) {
        let entry = self.entries.entry(file).or_default();
        entry.past.push(prior);
        entry.future.clear();

        if entry.past.len() > self.limit {
            let overflow = entry.past.len() - self.limit;
            entry.past.drain(..overflow);
        }
    }

    /// 返回需要恢复的内容；`past` 为空时为 `None`
    pub fn undo(&mut self, file: NodeId, current: String) -> Option<String> {
        let entry = self.entries.get_mut(&file)?;
        let restore = entry.past.pop()?;
        entry.future.push_front(current);
        Some(restore)
    }

    pub fn redo(&mut self, file: NodeId, current: String) -> Option<String> {
        let entry = self.entries.get_mut(&file)?;
        let restore = entry.future.pop_front()?;
        entry.past.push(current);
        Some(restore)
    }

    pub fn can_undo(&self, file: NodeId) -> bool {
        self.entries
            .get(&file)
            .map(|e| !e.past.is_empty())
            .unwrap_or(false)
    }

    pub fn can_redo(&self, file: NodeId) -> bool {
        self.entries
            .get(&file)
            .map(|e| !e.future.is_empty())
            .unwrap_or(false)
    }

    pub fn entry(&self, file: NodeId) -> Option<&HistoryEntry> {
        self.entries.get(&file)
    }

    /// 文件被删除时丢弃其历史
    pub fn discard(&mut self, file: NodeId) -> bool {
        self.entries.remove(&file).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/edit_history.rs"]
mod tests;
