use std::fmt;

use crate::bundler::{BundleError, SketchBundler};
use crate::kernel::services::bus::{preview_bridge, Severity};
use crate::kernel::services::ports::{clean_generated_code, GenerationError};
use crate::models::{CreateKind, NodeContent, NodeId, TreeError, UploadError};

use super::{Action, AppState, Effect};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    Tree(TreeError),
    Bundle(BundleError),
    Upload(UploadError),
    Generation(GenerationError),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Tree(e) => write!(f, "{}", e),
            StoreError::Bundle(e) => write!(f, "{}", e),
            StoreError::Upload(e) => write!(f, "{}", e),
            StoreError::Generation(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<TreeError> for StoreError {
    fn from(e: TreeError) -> Self {
        StoreError::Tree(e)
    }
}

#[derive(Debug, Default)]
pub struct DispatchResult {
    pub effects: Vec<Effect>,
    pub state_changed: bool,
    /// 失败时状态保持调用前的样子
    pub error: Option<StoreError>,
}

impl DispatchResult {
    fn unchanged() -> Self {
        Self::default()
    }

    fn changed(state_changed: bool) -> Self {
        Self {
            state_changed,
            ..Self::default()
        }
    }

    fn effect(effect: Effect) -> Self {
        Self {
            effects: vec![effect],
            ..Self::default()
        }
    }

    fn failed(error: impl Into<StoreError>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

impl From<Result<bool, StoreError>> for DispatchResult {
    fn from(result: Result<bool, StoreError>) -> Self {
        match result {
            Ok(changed) => DispatchResult::changed(changed),
            Err(e) => DispatchResult::failed(e),
        }
    }
}

pub struct Store {
    state: AppState,
}

impl Store {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn into_state(self) -> AppState {
        self.state
    }

    pub fn dispatch(&mut self, action: Action) -> DispatchResult {
        match action {
            Action::Edit { file, content } => self.edit(file, content).into(),
            Action::EditActive { content } => self.edit(self.state.active, content).into(),
            Action::Undo => self.step_history(true),
            Action::Redo => self.step_history(false),
            Action::SelectFile(id) => self.select(id).into(),
            Action::AddNode { name, kind, parent } => self.add_node(&name, kind, parent).into(),
            Action::DeleteNode(id) => self.delete_node(id).into(),
            Action::RenameNode { id, name } => {
                let result = self.state.tree.rename(id, &name).map(|()| true);
                if result.is_ok() {
                    tracing::info!(node = ?id, name = %name, "node renamed");
                }
                result.map_err(StoreError::from).into()
            }
            Action::MoveNode { id, parent } => {
                let result = self.state.tree.move_to(id, parent).map(|()| true);
                if result.is_ok() {
                    tracing::info!(node = ?id, parent = ?parent, "node moved");
                }
                result.map_err(StoreError::from).into()
            }
            Action::RequestUpload { path, parent } => {
                if let Err(e) = self.state.tree.list_children(parent) {
                    return DispatchResult::failed(e);
                }
                DispatchResult::effect(Effect::ReadUpload { path, parent })
            }
            Action::UploadReady {
                parent,
                name,
                mime,
                bytes,
            } => self.finish_upload(parent, &name, &mime, bytes),
            Action::UploadFailed { path, error } => {
                tracing::warn!(path = %path.display(), error = %error, "upload failed");
                self.state
                    .console
                    .push(Severity::Error, format!("{}: {}", path.display(), error));
                DispatchResult {
                    state_changed: true,
                    error: Some(StoreError::Upload(error)),
                    ..DispatchResult::default()
                }
            }
            Action::RequestGeneration { prompt } => self.request_generation(prompt),
            Action::GenerationFinished { file, result } => match result {
                Ok(raw) => self.edit(file, clean_generated_code(&raw)).into(),
                Err(e) => {
                    self.state.console.push(Severity::Error, e.to_string());
                    DispatchResult {
                        state_changed: true,
                        error: Some(StoreError::Generation(e)),
                        ..DispatchResult::default()
                    }
                }
            },
            Action::Run => self.run(),
            Action::Stop => {
                let Some(run) = self.state.preview.current_run() else {
                    return DispatchResult::unchanged();
                };
                self.state.preview.run = None;
                tracing::info!(run = %run, "preview stopped");
                DispatchResult {
                    effects: vec![Effect::UnloadPreview],
                    state_changed: true,
                    error: None,
                }
            }
            Action::PollPreview => DispatchResult::changed(self.poll_preview()),
            Action::ClearConsole => DispatchResult::changed(self.state.console.clear()),
            Action::SetConsoleOpen(open) => {
                DispatchResult::changed(self.state.console.set_open(open))
            }
        }
    }

    /// 提交旧内容，再写入新内容；内容未变时不产生历史
    fn edit(&mut self, file: NodeId, content: String) -> Result<bool, StoreError> {
        let node = self.state.tree.node(file).ok_or(TreeError::NotFound)?;
        let current = node.script_text().ok_or(TreeError::NotAScript)?;
        if current == content {
            return Ok(false);
        }
        let prior = self.state.tree.update_content(file, content)?;
        self.state.history.commit(file, prior);
        Ok(true)
    }

    fn step_history(&mut self, undo: bool) -> DispatchResult {
        let file = self.state.active;
        let Some(current) = self.state.tree.script_text(file).map(str::to_string) else {
            return DispatchResult::unchanged();
        };
        let restored = if undo {
            self.state.history.undo(file, current)
        } else {
            self.state.history.redo(file, current)
        };
        let Some(content) = restored else {
            return DispatchResult::unchanged();
        };
        match self.state.tree.update_content(file, content) {
            Ok(_) => DispatchResult::changed(true),
            Err(e) => DispatchResult::failed(e),
        }
    }

    fn select(&mut self, id: NodeId) -> Result<bool, StoreError> {
        let node = self.state.tree.node(id).ok_or(TreeError::NotFound)?;
        if node.is_folder() || self.state.active == id {
            return Ok(false);
        }
        self.state.active = id;
        Ok(true)
    }

    fn add_node(
        &mut self,
        name: &str,
        kind: CreateKind,
        parent: Option<NodeId>,
    ) -> Result<bool, StoreError> {
        let id = self.state.tree.add(name, kind, parent)?;
        if kind == CreateKind::Script {
            self.state.active = id;
        }
        tracing::info!(node = ?id, name = %name, "node added");
        Ok(true)
    }

    fn delete_node(&mut self, id: NodeId) -> Result<bool, StoreError> {
        let removed = self.state.tree.delete(id)?;
        let mut released = 0usize;
        for node in &removed {
            if let NodeContent::Media(handle) = &node.content {
                if self.state.resources.release(handle) {
                    released += 1;
                }
            }
            self.state.history.discard(node.id);
            if node.id == self.state.active {
                self.state.active = self.state.tree.entry();
            }
        }
        tracing::info!(
            node = ?id,
            removed = removed.len(),
            released,
            "node deleted"
        );
        Ok(true)
    }

    fn finish_upload(
        &mut self,
        parent: Option<NodeId>,
        name: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> DispatchResult {
        let resource = match self.state.resources.acquire(name, mime, bytes) {
            Ok(resource) => resource,
            Err(e) => {
                self.state
                    .console
                    .push(Severity::Error, format!("{}: {}", name, e));
                return DispatchResult {
                    state_changed: true,
                    error: Some(StoreError::Upload(e)),
                    ..DispatchResult::default()
                };
            }
        };

        let handle = resource.handle.clone();
        match self.state.tree.upload(resource, parent) {
            Ok(id) => {
                tracing::info!(node = ?id, name = %name, handle = %handle, "media uploaded");
                DispatchResult::changed(true)
            }
            Err(e) => {
                self.state.resources.release(&handle);
                DispatchResult::failed(e)
            }
        }
    }

    fn request_generation(&mut self, prompt: String) -> DispatchResult {
        if prompt.trim().is_empty() {
            return DispatchResult::unchanged();
        }
        let file = self.state.active;
        let Some(current) = self.state.tree.script_text(file) else {
            return DispatchResult::failed(TreeError::NotAScript);
        };
        DispatchResult::effect(Effect::Generate {
            file,
            prompt,
            current: current.to_string(),
        })
    }

    /// 打包成功后才替换当前运行；打包失败不触碰预览宿主
    fn run(&mut self) -> DispatchResult {
        let bundler = SketchBundler::new(self.state.config.bundle_options());
        let bundle = match bundler.build(&self.state.tree, self.state.tree.entry()) {
            Ok(bundle) => bundle,
            Err(e) => {
                tracing::error!(error = %e, "bundle failed");
                return DispatchResult::failed(StoreError::Bundle(e));
            }
        };

        let run = self.state.preview.allocate_run();
        let (bridge, receiver) = preview_bridge(run);
        self.state.preview.run = Some(receiver);
        self.state.console.clear();

        tracing::info!(run = %run, scripts = bundle.scripts.len(), "preview started");
        DispatchResult {
            effects: vec![Effect::LoadPreview {
                bundle: Box::new(bundle),
                bridge,
            }],
            state_changed: true,
            error: None,
        }
    }

    fn poll_preview(&mut self) -> bool {
        let Some(receiver) = self.state.preview.run.as_mut() else {
            return false;
        };
        let mut changed = false;
        for envelope in receiver.drain() {
            let message = envelope.message;
            if message.origin != self.state.config.origin_tag {
                tracing::debug!(origin = %message.origin, "ignoring foreign preview message");
                continue;
            }
            self.state.console.push(message.severity, message.text);
            changed = true;
        }
        changed
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/store.rs"]
mod tests;
