use std::path::PathBuf;

use crate::kernel::services::ports::GenerationError;
use crate::models::{CreateKind, NodeId, UploadError};

#[derive(Debug, Clone)]
pub enum Action {
    /// 编辑器 `onChange`：先提交旧内容，再接受新内容
    Edit {
        file: NodeId,
        content: String,
    },
    EditActive {
        content: String,
    },
    Undo,
    Redo,
    SelectFile(NodeId),
    AddNode {
        name: String,
        kind: CreateKind,
        parent: Option<NodeId>,
    },
    DeleteNode(NodeId),
    RenameNode {
        id: NodeId,
        name: String,
    },
    MoveNode {
        id: NodeId,
        parent: Option<NodeId>,
    },
    RequestUpload {
        path: PathBuf,
        parent: Option<NodeId>,
    },
    UploadReady {
        parent: Option<NodeId>,
        name: String,
        mime: String,
        bytes: Vec<u8>,
    },
    UploadFailed {
        path: PathBuf,
        error: UploadError,
    },
    RequestGeneration {
        prompt: String,
    },
    GenerationFinished {
        file: NodeId,
        result: Result<String, GenerationError>,
    },
    Run,
    Stop,
    /// 取出桥接通道上的所有待处理消息
    PollPreview,
    ClearConsole,
    SetConsoleOpen(bool),
}
