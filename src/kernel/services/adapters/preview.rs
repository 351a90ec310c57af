//! 将打包文档写到磁盘的预览宿主
//!
//! 写出的 `index.html` 交给外部浏览器执行；宿主本身不运行脚本，
//! 因此桥接发送端只保留到下一次 `unload`。

use crate::bundler::Bundle;
use crate::kernel::services::bus::BridgeSender;
use crate::kernel::services::ports::{PreviewError, PreviewHost};
use std::path::{Path, PathBuf};

const DOCUMENT_NAME: &str = "index.html";

pub struct FilePreviewHost {
    dir: PathBuf,
    bridge: Option<BridgeSender>,
    loaded: Option<PathBuf>,
}

impl FilePreviewHost {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            bridge: None,
            loaded: None,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 当前已写出的文档路径
    pub fn loaded(&self) -> Option<&Path> {
        self.loaded.as_deref()
    }

    pub fn bridge(&self) -> Option<&BridgeSender> {
        self.bridge.as_ref()
    }
}

impl PreviewHost for FilePreviewHost {
    fn load(&mut self, bundle: &Bundle, bridge: BridgeSender) -> Result<(), PreviewError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| PreviewError::Io(e.to_string()))?;
        let path = self.dir.join(DOCUMENT_NAME);
        std::fs::write(&path, &bundle.document).map_err(|e| PreviewError::Io(e.to_string()))?;

        tracing::info!(path = %path.display(), run = %bridge.run(), "preview document written");
        self.bridge = Some(bridge);
        self.loaded = Some(path);
        Ok(())
    }

    fn unload(&mut self) {
        self.bridge = None;
        self.loaded = None;
    }
}
