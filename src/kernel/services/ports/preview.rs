use crate::bundler::Bundle;
use crate::kernel::services::bus::BridgeSender;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewError {
    Io(String),
}

impl fmt::Display for PreviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreviewError::Io(e) => write!(f, "preview failed: {}", e),
        }
    }
}

impl std::error::Error for PreviewError {}

/// 隔离执行环境
///
/// `load` 接收打包产物与本次运行的桥接发送端；宿主在隔离上下文中执行文档，
/// 并把沙箱发出的每条消息经 `bridge` 转交给 Store。宿主从不阻塞调用方。
pub trait PreviewHost {
    fn load(&mut self, bundle: &Bundle, bridge: BridgeSender) -> Result<(), PreviewError>;

    /// 立即销毁当前上下文
    fn unload(&mut self);
}
