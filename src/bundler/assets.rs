//! 资源引用替换
//!
//! 在脚本源码中查找带引号的字符串字面量（`"..."` 或 `'...'`，不跨行），
//! 若字面量内容恰好等于某个资源从根开始的完整路径（根目录下即为文件名），
//! 就把它替换成该资源的句柄，保留原来的引号。
//!
//! 这是逐字匹配而不是语法解析：注释里的字符串、恰好与资源同名的普通字符串
//! 都会被替换。模板字符串（反引号）不参与匹配。

use crate::models::ResourceHandle;
use regex::{Captures, Regex};
use rustc_hash::FxHashMap;
use std::borrow::Cow;
use std::sync::OnceLock;

fn literal_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#""((?:[^"\\\r\n]|\\.)*)"|'((?:[^'\\\r\n]|\\.)*)'"#)
            .expect("string literal pattern is valid")
    })
}

/// 资源路径 -> 句柄
#[derive(Debug, Default, Clone)]
pub struct AssetTable {
    by_path: FxHashMap<String, ResourceHandle>,
}

impl AssetTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: String, handle: ResourceHandle) {
        self.by_path.insert(path, handle);
    }

    pub fn get(&self, literal: &str) -> Option<&ResourceHandle> {
        self.by_path.get(literal)
    }

    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }
}

/// 替换结果与替换次数；没有命中时不分配新字符串
pub fn substitute_assets<'a>(source: &'a str, assets: &AssetTable) -> (Cow<'a, str>, usize) {
    if assets.is_empty() {
        return (Cow::Borrowed(source), 0);
    }

    let mut count = 0;
    let replaced = literal_pattern().replace_all(source, |caps: &Captures<'_>| {
        let (quote, inner) = match (caps.get(1), caps.get(2)) {
            (Some(m), _) => ('"', m.as_str()),
            (None, Some(m)) => ('\'', m.as_str()),
            (None, None) => return caps[0].to_string(),
        };
        match assets.get(inner) {
            Some(handle) => {
                count += 1;
                format!("{quote}{handle}{quote}")
            }
            None => caps[0].to_string(),
        }
    });

    (replaced, count)
}

#[cfg(test)]
#[path = "../../tests/unit/bundler/assets.rs"]
mod tests;
