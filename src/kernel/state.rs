use crate::kernel::services::bus::{BridgeReceiver, RunId};
use crate::kernel::services::ports::SketchpadConfig;
use crate::models::{FileTree, HistoryStore, NodeId, ResourceStore};

use super::console::ConsoleState;

/// 当前预览运行；`run` 为 `None` 表示已停止
#[derive(Debug, Default)]
pub struct PreviewState {
    pub run: Option<BridgeReceiver>,
    next_run: u64,
}

impl PreviewState {
    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    pub fn current_run(&self) -> Option<RunId> {
        self.run.as_ref().map(|r| r.run())
    }

    pub(crate) fn allocate_run(&mut self) -> RunId {
        self.next_run += 1;
        RunId(self.next_run)
    }
}

#[derive(Debug)]
pub struct AppState {
    pub tree: FileTree,
    pub history: HistoryStore,
    pub resources: ResourceStore,
    pub active: NodeId,
    pub console: ConsoleState,
    pub preview: PreviewState,
    pub config: SketchpadConfig,
}

impl AppState {
    /// 只含入口脚本（默认示例程序）的新工作区
    pub fn new(config: SketchpadConfig) -> Self {
        let tree = FileTree::with_options(
            &config.entry_name,
            config.default_sketch.clone(),
            &config.script_extension,
            &config.new_script_template,
        );
        Self::from_tree(tree, ResourceStore::new(), config)
    }

    pub fn from_tree(tree: FileTree, resources: ResourceStore, config: SketchpadConfig) -> Self {
        let active = tree.entry();
        Self {
            tree,
            history: HistoryStore::with_limit(config.history_limit),
            resources,
            active,
            console: ConsoleState::default(),
            preview: PreviewState::default(),
            config,
        }
    }

    pub fn active_text(&self) -> Option<&str> {
        self.tree.script_text(self.active)
    }
}
