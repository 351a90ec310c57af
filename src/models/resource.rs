//! 上传资源：句柄分配与释放
//!
//! 媒体文件的二进制内容不进入文件树，树节点只持有一个不可变的 [`ResourceHandle`]。
//! 句柄在整个预览会话期间保持稳定，节点删除时必须调用 [`ResourceStore::release`]。

use compact_str::CompactString;
use rustc_hash::FxHashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

const HANDLE_SCHEME: &str = "blob:sketchpad/";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// `video/*` 为视频，`image/*` 为图片，其余类型不接受
    pub fn from_mime(mime: &str) -> Option<Self> {
        let mime = mime.trim().to_ascii_lowercase();
        if mime.starts_with("video/") {
            Some(Self::Video)
        } else if mime.starts_with("image/") {
            Some(Self::Image)
        } else {
            None
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

/// 按扩展名推断 MIME 类型（用于从磁盘读取的上传）
pub fn mime_from_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "ogv" => "video/ogg",
        _ => return None,
    };
    Some(mime)
}

/// 可解引用的资源句柄，形如 `blob:sketchpad/3`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResourceHandle(CompactString);

impl ResourceHandle {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 一次上传的结果：交给 `FileTree::upload` 的不透明资源
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resource {
    pub name: CompactString,
    pub kind: MediaKind,
    pub handle: ResourceHandle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    Io(String),
    UnsupportedMedia(String),
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadError::Io(e) => write!(f, "upload failed: {}", e),
            UploadError::UnsupportedMedia(mime) => {
                write!(f, "unsupported media type: {}", mime)
            }
        }
    }
}

impl std::error::Error for UploadError {}

#[derive(Debug, Clone)]
pub struct StoredResource {
    pub name: CompactString,
    pub mime: CompactString,
    pub bytes: Arc<[u8]>,
}

/// 宿主侧资源表
#[derive(Debug, Default)]
pub struct ResourceStore {
    entries: FxHashMap<ResourceHandle, StoredResource>,
    next_id: u64,
}

impl ResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(
        &mut self,
        name: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> Result<Resource, UploadError> {
        let kind = MediaKind::from_mime(mime)
            .ok_or_else(|| UploadError::UnsupportedMedia(mime.to_string()))?;

        self.next_id += 1;
        let handle = ResourceHandle(compact_str::format_compact!(
            "{}{}",
            HANDLE_SCHEME,
            self.next_id
        ));
        self.entries.insert(
            handle.clone(),
            StoredResource {
                name: CompactString::new(name),
                mime: CompactString::new(mime),
                bytes: Arc::from(bytes),
            },
        );

        tracing::debug!(handle = %handle, kind = kind.label(), "resource acquired");
        Ok(Resource {
            name: CompactString::new(name),
            kind,
            handle,
        })
    }

    pub fn get(&self, handle: &ResourceHandle) -> Option<&StoredResource> {
        self.entries.get(handle)
    }

    /// 释放句柄；重复释放返回 false
    pub fn release(&mut self, handle: &ResourceHandle) -> bool {
        let released = self.entries.remove(handle).is_some();
        if released {
            tracing::debug!(handle = %handle, "resource released");
        }
        released
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/resource.rs"]
mod tests;
