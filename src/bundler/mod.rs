//! 草图打包
//!
//! 从文件树快照与入口 id 组装一次预览运行所需的完整程序：
//! 1. 按展示顺序（前序遍历，文件夹优先）收集除入口外的所有脚本
//! 2. 收集图片/视频资源，建立 路径 -> 句柄 的映射
//! 3. 对每个脚本做逐字的资源引用替换（见 [`assets`]）
//! 4. 拼接：桥接初始化、辅助脚本（附来源路径注释）、入口脚本，整体包在守卫里
//! 5. 与固定的执行外壳合成单个 HTML 文档
//!
//! 用户脚本不做任何校验，打包本身唯一的失败是入口无法解析为脚本。

pub mod assets;
pub mod harness;

use crate::models::{FileTree, NodeId, NodeKind, ResourceHandle};
pub use assets::{substitute_assets, AssetTable};
use std::fmt;

pub const DEFAULT_ORIGIN_TAG: &str = "p5-runner";
pub const DEFAULT_LIBRARY_URL: &str = "https://cdnjs.cloudflare.com/ajax/libs/p5.js/1.9.0/p5.min.js";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleError {
    EntryNotFound,
}

impl fmt::Display for BundleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BundleError::EntryNotFound => write!(f, "entry script not found"),
        }
    }
}

impl std::error::Error for BundleError {}

#[derive(Debug, Clone)]
pub struct BundleOptions {
    pub library_url: String,
    pub origin_tag: String,
}

impl Default for BundleOptions {
    fn default() -> Self {
        Self {
            library_url: DEFAULT_LIBRARY_URL.to_string(),
            origin_tag: DEFAULT_ORIGIN_TAG.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundledScript {
    pub id: NodeId,
    pub path: String,
    pub substitutions: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundledAsset {
    pub id: NodeId,
    pub path: String,
    pub kind: NodeKind,
    pub handle: ResourceHandle,
}

/// 一次运行的打包产物
#[derive(Debug, Clone)]
pub struct Bundle {
    pub entry: NodeId,
    pub origin_tag: String,
    /// 桥接初始化脚本，先于用户程序在独立的 `<script>` 中执行
    pub bridge: String,
    /// 守卫包裹后的用户程序（辅助脚本 + 入口）
    pub program: String,
    /// 自包含的 HTML 文档
    pub document: String,
    /// 执行顺序，入口在最后
    pub scripts: Vec<BundledScript>,
    pub assets: Vec<BundledAsset>,
}

pub struct SketchBundler {
    options: BundleOptions,
}

impl SketchBundler {
    pub fn new(options: BundleOptions) -> Self {
        Self { options }
    }

    pub fn build(&self, tree: &FileTree, entry: NodeId) -> Result<Bundle, BundleError> {
        let entry_source = tree.script_text(entry).ok_or(BundleError::EntryNotFound)?;
        let entry_path = tree
            .path_string(entry)
            .map_err(|_| BundleError::EntryNotFound)?;

        let mut aux = Vec::new();
        let mut assets = Vec::new();
        let mut table = AssetTable::new();

        for row in tree.walk() {
            let Some(node) = tree.node(row.id) else {
                continue;
            };
            let Ok(path) = tree.path_string(row.id) else {
                continue;
            };
            match node.kind() {
                NodeKind::Script if row.id != entry => {
                    if let Some(text) = node.script_text() {
                        aux.push((row.id, path, text));
                    }
                }
                NodeKind::Image | NodeKind::Video => {
                    if let Some(handle) = node.resource() {
                        table.insert(path.clone(), handle.clone());
                        assets.push(BundledAsset {
                            id: row.id,
                            path,
                            kind: node.kind(),
                            handle: handle.clone(),
                        });
                    }
                }
                _ => {}
            }
        }

        let bridge = harness::bridge_init(&self.options.origin_tag);
        let mut body = String::new();
        let mut scripts = Vec::with_capacity(aux.len() + 1);

        for (id, path, text) in aux.into_iter().chain(std::iter::once((
            entry,
            entry_path,
            entry_source,
        ))) {
            let (source, substitutions) = substitute_assets(text, &table);
            push_annotated(&mut body, &path, &source);
            scripts.push(BundledScript {
                id,
                path,
                substitutions,
            });
        }

        let program = harness::guard(&body);
        let document = harness::render_document(&bridge, &program, &self.options.library_url);

        tracing::info!(
            scripts = scripts.len(),
            assets = assets.len(),
            bytes = document.len(),
            "bundle built"
        );

        Ok(Bundle {
            entry,
            origin_tag: self.options.origin_tag.clone(),
            bridge,
            program,
            document,
            scripts,
            assets,
        })
    }
}

impl Default for SketchBundler {
    fn default() -> Self {
        Self::new(BundleOptions::default())
    }
}

fn push_annotated(out: &mut String, path: &str, source: &str) {
    let label: String = path
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    out.push_str("// --- ");
    out.push_str(&label);
    out.push_str(" ---\n");
    out.push_str(source);
    if !source.ends_with('\n') {
        out.push('\n');
    }
}

#[cfg(test)]
#[path = "../../tests/unit/bundler/mod.rs"]
mod tests;
