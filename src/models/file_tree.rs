//! 虚拟文件树数据模型
//!
//! 所有节点存放在以 [`NodeId`] 寻址的 arena 中，父子关系通过显式的 `parent`
//! 字段与文件夹的 `children` 索引维护。删除与移动都基于显式的祖先链遍历，
//! 深度上界为 arena 的节点数，因此环检测不依赖递归。
//!
//! 每个公开的变更操作都先完成全部校验再修改状态：返回 `Err` 时树保持调用前的样子。

use super::resource::{MediaKind, Resource, ResourceHandle};
use compact_str::CompactString;
use slotmap::{new_key_type, SlotMap};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

new_key_type! { pub struct NodeId; }

pub const DEFAULT_SCRIPT_EXTENSION: &str = ".js";
pub const PATH_SEPARATOR: char = '/';

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Script,
    Image,
    Video,
    Folder,
}

impl NodeKind {
    pub fn is_media(self) -> bool {
        matches!(self, NodeKind::Image | NodeKind::Video)
    }

    pub fn label(self) -> &'static str {
        match self {
            NodeKind::Script => "script",
            NodeKind::Image => "image",
            NodeKind::Video => "video",
            NodeKind::Folder => "folder",
        }
    }
}

impl From<MediaKind> for NodeKind {
    fn from(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Image => NodeKind::Image,
            MediaKind::Video => NodeKind::Video,
        }
    }
}

/// `add` 能直接创建的节点类型；媒体节点只能通过 `upload` 产生
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CreateKind {
    Script,
    Folder,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeContent {
    Script(String),
    Media(ResourceHandle),
    Folder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    NotFound,
    CycleDetected,
    ProtectedEntry,
    NameConflict,
    InvalidName,
    NotAScript,
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::NotFound => write!(f, "node or folder not found"),
            TreeError::CycleDetected => write!(f, "cannot move a node into its own subtree"),
            TreeError::ProtectedEntry => write!(f, "the entry script cannot be changed"),
            TreeError::NameConflict => write!(f, "name already exists in folder"),
            TreeError::InvalidName => write!(f, "invalid name"),
            TreeError::NotAScript => write!(f, "only script content can be edited"),
        }
    }
}

impl std::error::Error for TreeError {}

#[derive(Debug, Clone)]
pub struct FileNode {
    kind: NodeKind,
    name: CompactString,
    parent: Option<NodeId>,
    children: Option<BTreeMap<CompactString, NodeId>>,
    content: NodeContent,
}

impl FileNode {
    fn new_script(name: CompactString, parent: Option<NodeId>, text: String) -> Self {
        Self {
            kind: NodeKind::Script,
            name,
            parent,
            children: None,
            content: NodeContent::Script(text),
        }
    }

    fn new_folder(name: CompactString, parent: Option<NodeId>) -> Self {
        Self {
            kind: NodeKind::Folder,
            name,
            parent,
            children: Some(BTreeMap::new()),
            content: NodeContent::Folder,
        }
    }

    fn new_media(resource: Resource, parent: Option<NodeId>) -> Self {
        Self {
            kind: resource.kind.into(),
            name: resource.name,
            parent,
            children: None,
            content: NodeContent::Media(resource.handle),
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `None` 表示位于根目录
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn content(&self) -> &NodeContent {
        &self.content
    }

    pub fn script_text(&self) -> Option<&str> {
        match &self.content {
            NodeContent::Script(text) => Some(text),
            _ => None,
        }
    }

    pub fn resource(&self) -> Option<&ResourceHandle> {
        match &self.content {
            NodeContent::Media(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }
}

/// 被 `delete` 摘除的节点，按后序排列（最深的后代在前）
#[derive(Debug, Clone)]
pub struct RemovedNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub name: CompactString,
    pub content: NodeContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeRow {
    pub id: NodeId,
    pub depth: u16,
}

#[derive(Debug, Clone)]
pub struct FileTree {
    arena: SlotMap<NodeId, FileNode>,
    root_children: BTreeMap<CompactString, NodeId>,
    entry: NodeId,
    script_extension: CompactString,
    script_template: String,
}

impl FileTree {
    /// 创建只含入口脚本的树
    pub fn new(entry_name: &str, entry_content: String) -> Self {
        Self::with_options(entry_name, entry_content, DEFAULT_SCRIPT_EXTENSION, "")
    }

    pub fn with_options(
        entry_name: &str,
        entry_content: String,
        script_extension: &str,
        script_template: &str,
    ) -> Self {
        let script_extension = CompactString::new(script_extension);
        let entry_name = with_extension(entry_name, &script_extension);

        let mut arena = SlotMap::with_key();
        let entry = arena.insert(FileNode::new_script(entry_name.clone(), None, entry_content));
        let mut root_children = BTreeMap::new();
        root_children.insert(entry_name, entry);

        Self {
            arena,
            root_children,
            entry,
            script_extension,
            script_template: script_template.to_string(),
        }
    }

    pub fn entry(&self) -> NodeId {
        self.entry
    }

    pub fn script_extension(&self) -> &str {
        &self.script_extension
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains_key(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&FileNode> {
        self.arena.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &FileNode)> {
        self.arena.iter()
    }

    pub fn script_text(&self, id: NodeId) -> Option<&str> {
        self.arena.get(id).and_then(FileNode::script_text)
    }

    fn children_map(&self, parent: Option<NodeId>) -> Result<&BTreeMap<CompactString, NodeId>, TreeError> {
        match parent {
            None => Ok(&self.root_children),
            Some(id) => self
                .arena
                .get(id)
                .and_then(|n| n.children.as_ref())
                .ok_or(TreeError::NotFound),
        }
    }

    fn children_map_mut(
        &mut self,
        parent: Option<NodeId>,
    ) -> Result<&mut BTreeMap<CompactString, NodeId>, TreeError> {
        match parent {
            None => Ok(&mut self.root_children),
            Some(id) => self
                .arena
                .get_mut(id)
                .and_then(|n| n.children.as_mut())
                .ok_or(TreeError::NotFound),
        }
    }

    fn insert_node(&mut self, node: FileNode) -> Result<NodeId, TreeError> {
        let parent = node.parent;
        if self.children_map(parent)?.contains_key(&node.name) {
            return Err(TreeError::NameConflict);
        }
        let name = node.name.clone();
        let id = self.arena.insert(node);
        self.children_map_mut(parent)?.insert(name, id);
        Ok(id)
    }

    /// 新建脚本或文件夹；脚本名缺少扩展名时自动补全
    pub fn add(
        &mut self,
        name: &str,
        kind: CreateKind,
        parent: Option<NodeId>,
    ) -> Result<NodeId, TreeError> {
        validate_name(name)?;
        let node = match kind {
            CreateKind::Script => FileNode::new_script(
                with_extension(name, &self.script_extension),
                parent,
                self.script_template.clone(),
            ),
            CreateKind::Folder => FileNode::new_folder(CompactString::new(name), parent),
        };
        self.insert_node(node)
    }

    /// 以已就绪的资源句柄创建媒体节点
    pub fn upload(&mut self, resource: Resource, parent: Option<NodeId>) -> Result<NodeId, TreeError> {
        validate_name(&resource.name)?;
        self.insert_node(FileNode::new_media(resource, parent))
    }

    /// 替换脚本内容，返回旧内容
    pub fn update_content(&mut self, id: NodeId, content: String) -> Result<String, TreeError> {
        let node = self.arena.get_mut(id).ok_or(TreeError::NotFound)?;
        match &mut node.content {
            NodeContent::Script(text) => Ok(std::mem::replace(text, content)),
            _ => Err(TreeError::NotAScript),
        }
    }

    /// 删除以 `id` 为根的子树，后序摘除（最深的后代先于祖先）
    pub fn delete(&mut self, id: NodeId) -> Result<Vec<RemovedNode>, TreeError> {
        if id == self.entry {
            return Err(TreeError::ProtectedEntry);
        }
        if !self.arena.contains_key(id) {
            return Err(TreeError::NotFound);
        }

        let mut order = self.subtree_preorder(id);
        order.reverse();

        let mut removed = Vec::with_capacity(order.len());
        for node_id in order {
            let Some(node) = self.arena.remove(node_id) else {
                continue;
            };
            if let Ok(siblings) = self.children_map_mut(node.parent) {
                siblings.remove(&node.name);
            }
            removed.push(RemovedNode {
                id: node_id,
                kind: node.kind,
                name: node.name,
                content: node.content,
            });
        }
        Ok(removed)
    }

    pub fn rename(&mut self, id: NodeId, new_name: &str) -> Result<(), TreeError> {
        if id == self.entry {
            return Err(TreeError::ProtectedEntry);
        }
        let (parent, old_name) = {
            let node = self.arena.get(id).ok_or(TreeError::NotFound)?;
            (node.parent, node.name.clone())
        };
        validate_name(new_name)?;

        if old_name == new_name {
            return Ok(());
        }

        let new_name = CompactString::new(new_name);
        let siblings = self.children_map_mut(parent)?;
        if siblings.contains_key(&new_name) {
            return Err(TreeError::NameConflict);
        }
        siblings.remove(&old_name);
        siblings.insert(new_name.clone(), id);

        if let Some(node) = self.arena.get_mut(id) {
            node.name = new_name;
        }
        Ok(())
    }

    pub fn move_to(&mut self, id: NodeId, new_parent: Option<NodeId>) -> Result<(), TreeError> {
        let (name, old_parent) = {
            let node = self.arena.get(id).ok_or(TreeError::NotFound)?;
            (node.name.clone(), node.parent)
        };
        if id == self.entry {
            return Err(TreeError::ProtectedEntry);
        }

        if let Some(target) = new_parent {
            if target == id {
                return Err(TreeError::CycleDetected);
            }
            if !self.arena.contains_key(target) {
                return Err(TreeError::NotFound);
            }
            if self.ancestors(target)?.contains(&id) {
                return Err(TreeError::CycleDetected);
            }
        }

        let target_children = self.children_map(new_parent)?;
        if old_parent == new_parent {
            return Ok(());
        }
        if target_children.contains_key(&name) {
            return Err(TreeError::NameConflict);
        }

        self.children_map_mut(old_parent)?.remove(&name);
        self.children_map_mut(new_parent)?.insert(name, id);
        if let Some(node) = self.arena.get_mut(id) {
            node.parent = new_parent;
        }
        Ok(())
    }

    /// 从 `id` 的父节点一直走到根的祖先链（由近及远）
    ///
    /// 步数超过节点总数说明存在环，返回 `CycleDetected`。
    pub fn ancestors(&self, id: NodeId) -> Result<Vec<NodeId>, TreeError> {
        let mut chain = Vec::new();
        let mut current = self.arena.get(id).ok_or(TreeError::NotFound)?.parent;
        while let Some(parent) = current {
            if chain.len() >= self.arena.len() {
                return Err(TreeError::CycleDetected);
            }
            chain.push(parent);
            current = self.arena.get(parent).ok_or(TreeError::NotFound)?.parent;
        }
        Ok(chain)
    }

    pub fn is_descendant_of(&self, id: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(id)
            .map(|chain| chain.contains(&ancestor))
            .unwrap_or(false)
    }

    /// 从根到 `id` 的名称序列
    pub fn resolve_path(&self, id: NodeId) -> Result<Vec<CompactString>, TreeError> {
        let node = self.arena.get(id).ok_or(TreeError::NotFound)?;
        let mut names = vec![node.name.clone()];
        for ancestor in self.ancestors(id)? {
            if let Some(n) = self.arena.get(ancestor) {
                names.push(n.name.clone());
            }
        }
        names.reverse();
        Ok(names)
    }

    pub fn path_string(&self, id: NodeId) -> Result<String, TreeError> {
        let names = self.resolve_path(id)?;
        let mut path = String::new();
        for (i, name) in names.iter().enumerate() {
            if i > 0 {
                path.push(PATH_SEPARATOR);
            }
            path.push_str(name);
        }
        Ok(path)
    }

    pub fn find_by_path(&self, path: &str) -> Option<NodeId> {
        let mut parent = None;
        let mut found = None;
        for segment in path.split(PATH_SEPARATOR).filter(|s| !s.is_empty()) {
            let id = *self.children_map(parent).ok()?.get(segment)?;
            found = Some(id);
            parent = Some(id);
        }
        found
    }

    /// 文件夹在前，其余按名称忽略大小写排序（仅用于展示与遍历顺序）
    pub fn list_children(&self, parent: Option<NodeId>) -> Result<Vec<NodeId>, TreeError> {
        let mut ids: Vec<NodeId> = self.children_map(parent)?.values().copied().collect();
        ids.sort_by(|&a, &b| self.display_order(a, b));
        Ok(ids)
    }

    fn display_order(&self, a: NodeId, b: NodeId) -> Ordering {
        match (self.arena.get(a), self.arena.get(b)) {
            (Some(na), Some(nb)) => nb
                .is_folder()
                .cmp(&na.is_folder())
                .then_with(|| na.name.to_lowercase().cmp(&nb.name.to_lowercase()))
                .then_with(|| na.name.cmp(&nb.name)),
            _ => Ordering::Equal,
        }
    }

    /// 前序遍历整棵树（文件夹优先），与展示顺序一致
    pub fn walk(&self) -> Vec<TreeRow> {
        let mut result = Vec::with_capacity(self.arena.len());
        let mut stack: Vec<(NodeId, u16)> = Vec::new();

        if let Ok(top) = self.list_children(None) {
            for id in top.into_iter().rev() {
                stack.push((id, 0));
            }
        }

        while let Some((id, depth)) = stack.pop() {
            result.push(TreeRow { id, depth });
            if let Ok(children) = self.list_children(Some(id)) {
                for child in children.into_iter().rev() {
                    stack.push((child, depth.saturating_add(1)));
                }
            }
        }

        result
    }

    fn subtree_preorder(&self, id: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(node_id) = stack.pop() {
            order.push(node_id);
            if let Some(children) = self.arena.get(node_id).and_then(|n| n.children.as_ref()) {
                stack.extend(children.values().copied());
            }
        }
        order
    }
}

fn validate_name(name: &str) -> Result<(), TreeError> {
    if name.is_empty() || name == "." || name == ".." || name.contains(PATH_SEPARATOR) {
        return Err(TreeError::InvalidName);
    }
    Ok(())
}

fn with_extension(name: &str, extension: &str) -> CompactString {
    let mut name = CompactString::new(name);
    if !extension.is_empty() && !name.ends_with(extension) {
        name.push_str(extension);
    }
    name
}

#[cfg(test)]
#[path = "../../tests/unit/models/file_tree.rs"]
mod tests;
