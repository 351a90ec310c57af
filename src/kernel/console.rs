//! 预览日志
//!
//! 只追加、按到达顺序保存；只有用户显式清空（或开始新一次运行）才会清除。

use crate::kernel::services::bus::Severity;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleEntry {
    pub id: u64,
    pub severity: Severity,
    pub text: String,
    pub timestamp_ms: u64,
}

#[derive(Debug, Default)]
pub struct ConsoleState {
    entries: Vec<ConsoleEntry>,
    next_id: u64,
    open: bool,
    unread: bool,
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

impl ConsoleState {
    pub fn entries(&self) -> &[ConsoleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn unread(&self) -> bool {
        self.unread
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|e| e.severity == Severity::Error)
    }

    /// 追加一条日志；错误会自动打开控制台，面板关闭时标记未读
    pub fn push(&mut self, severity: Severity, text: String) -> &ConsoleEntry {
        self.next_id += 1;
        if !self.open {
            self.unread = true;
        }
        if severity == Severity::Error {
            self.open = true;
        }
        self.entries.push(ConsoleEntry {
            id: self.next_id,
            severity,
            text,
            timestamp_ms: now_ms(),
        });
        &self.entries[self.entries.len() - 1]
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.entries.is_empty() || self.unread;
        self.entries.clear();
        self.unread = false;
        changed
    }

    pub fn set_open(&mut self, open: bool) -> bool {
        let changed = self.open != open || (open && self.unread);
        self.open = open;
        if open {
            self.unread = false;
        }
        changed
    }
}
