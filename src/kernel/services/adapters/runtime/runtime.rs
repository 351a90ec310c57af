use super::message::AppMessage;
use crate::kernel::services::ports::CodeGenerator;
use crate::models::{mime_from_path, NodeId, UploadError};
use std::io;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::sync::Arc;

/// 在后台执行 IO 与生成请求，结果以 [`AppMessage`] 发回主线程
///
/// 任务一经提交不可取消；结果的应用（插入节点、提交历史）总在主线程同步完成。
pub struct AsyncRuntime {
    runtime: tokio::runtime::Runtime,
    tx: Sender<AppMessage>,
}

impl AsyncRuntime {
    pub fn new(tx: Sender<AppMessage>) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .or_else(|e| {
                tracing::error!(
                    error = %e,
                    "Failed to create multi-thread tokio runtime, falling back to current-thread"
                );
                tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
            })?;
        Ok(Self { runtime, tx })
    }

    /// 读取待上传的文件；节点在收到 `UploadRead` 后才插入文件树
    pub fn read_upload(&self, path: PathBuf, parent: Option<NodeId>) {
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let Some(mime) = mime_from_path(&path) else {
                let ext = path
                    .extension()
                    .map(|e| e.to_string_lossy().to_string())
                    .unwrap_or_default();
                let _ = tx.send(AppMessage::UploadFailed {
                    path,
                    error: UploadError::UnsupportedMedia(ext),
                });
                return;
            };

            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();

            match tokio::fs::read(&path).await {
                Ok(bytes) => {
                    let _ = tx.send(AppMessage::UploadRead {
                        path,
                        parent,
                        name,
                        mime: mime.to_string(),
                        bytes,
                    });
                }
                Err(e) => {
                    let _ = tx.send(AppMessage::UploadFailed {
                        path,
                        error: UploadError::Io(e.to_string()),
                    });
                }
            }
        });
    }

    pub fn generate(
        &self,
        generator: Arc<dyn CodeGenerator>,
        file: NodeId,
        prompt: String,
        current: String,
    ) {
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = generator.generate(prompt, current).await;
            if let Err(e) = &result {
                tracing::warn!(error = %e, "code generation failed");
            }
            let _ = tx.send(AppMessage::GenerationFinished { file, result });
        });
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/runtime/runtime.rs"]
mod tests;
