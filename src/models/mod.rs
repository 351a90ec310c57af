//! 数据模型层

pub mod edit_history;
pub mod file_tree;
pub mod resource;

pub use edit_history::{HistoryEntry, HistoryStore, DEFAULT_HISTORY_LIMIT};
pub use file_tree::{
    CreateKind, FileNode, FileTree, NodeContent, NodeId, NodeKind, RemovedNode, TreeError,
    TreeRow, PATH_SEPARATOR,
};
pub use resource::{
    mime_from_path, MediaKind, Resource, ResourceHandle, ResourceStore, StoredResource,
    UploadError,
};
