use super::{AppError, Sketchpad, MAX_MESSAGE_DRAIN_PER_TICK};
use crate::kernel::services::adapters::AppMessage;
use crate::kernel::Action;
use std::sync::mpsc::{RecvTimeoutError, TryRecvError};
use std::time::Duration;

impl Sketchpad {
    /// 处理后台消息并拉取预览日志（由主循环调用）
    pub fn tick(&mut self) -> bool {
        let mut changed = false;
        for _ in 0..MAX_MESSAGE_DRAIN_PER_TICK {
            match self.rx.try_recv() {
                Ok(msg) => changed |= self.handle_message_logged(msg),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        changed |= self.poll_preview();
        changed
    }

    /// 阻塞等待一条后台消息；超时返回 `Ok(None)`
    pub fn wait_message(&mut self, timeout: Duration) -> Result<Option<bool>, AppError> {
        match self.rx.recv_timeout(timeout) {
            Ok(msg) => self.handle_message(msg).map(Some),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => Ok(None),
        }
    }

    pub fn handle_message(&mut self, msg: AppMessage) -> Result<bool, AppError> {
        match msg {
            AppMessage::UploadRead {
                path,
                parent,
                name,
                mime,
                bytes,
            } => {
                tracing::debug!(path = %path.display(), size = bytes.len(), "upload read");
                self.dispatch(Action::UploadReady {
                    parent,
                    name,
                    mime,
                    bytes,
                })
            }
            AppMessage::UploadFailed { path, error } => {
                self.dispatch(Action::UploadFailed { path, error })
            }
            AppMessage::GenerationFinished { file, result } => {
                self.dispatch(Action::GenerationFinished { file, result })
            }
        }
    }

    fn handle_message_logged(&mut self, msg: AppMessage) -> bool {
        match self.handle_message(msg) {
            Ok(changed) => changed,
            Err(e) => {
                tracing::warn!(error = %e, "background message rejected");
                true
            }
        }
    }

    fn poll_preview(&mut self) -> bool {
        self.dispatch(Action::PollPreview).unwrap_or(false)
    }
}
