//! 从磁盘目录导入项目
//!
//! 脚本（按扩展名识别）成为脚本节点，图片/视频作为上传资源导入，
//! 根目录下与入口同名的脚本作为入口内容；与入口同名的目录、
//! 以及其余无法识别的文件跳过并记录。

use crate::kernel::services::ports::SketchpadConfig;
use crate::models::{mime_from_path, CreateKind, FileTree, NodeId, ResourceStore, TreeError};
use std::io;
use std::path::{Path, PathBuf};

pub fn should_ignore(name: &str) -> bool {
    matches!(
        name,
        ".DS_Store"
            | ".Spotlight-V100"
            | ".Trashes"
            | ".fseventsd"
            | ".TemporaryItems"
            | "Thumbs.db"
            | "desktop.ini"
            | ".git"
            | "node_modules"
    )
}

pub struct ImportedProject {
    pub tree: FileTree,
    pub skipped: Vec<PathBuf>,
}

fn tree_err(e: TreeError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, e)
}

fn load_dir_entries(path: &Path) -> io::Result<Vec<(String, PathBuf, bool)>> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if should_ignore(&name) {
            continue;
        }
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        entries.push((name, entry.path(), is_dir));
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(entries)
}

pub fn import_project(
    root: &Path,
    config: &SketchpadConfig,
    resources: &mut ResourceStore,
) -> io::Result<ImportedProject> {
    let mut tree = FileTree::with_options(
        &config.entry_name,
        config.default_sketch.clone(),
        &config.script_extension,
        &config.new_script_template,
    );
    // 入口名已按脚本扩展名规范化，磁盘上按同一名称查找
    let entry_name = tree
        .node(tree.entry())
        .map(|n| n.name().to_string())
        .unwrap_or_default();
    let entry_path = root.join(&entry_name);
    if entry_path.is_file() {
        let text = std::fs::read_to_string(&entry_path)?;
        tree.update_content(tree.entry(), text).map_err(tree_err)?;
    }

    let mut skipped = Vec::new();
    let mut stack: Vec<(PathBuf, Option<NodeId>)> = vec![(root.to_path_buf(), None)];

    while let Some((dir, parent)) = stack.pop() {
        for (name, path, is_dir) in load_dir_entries(&dir)? {
            if is_dir {
                match tree.add(&name, CreateKind::Folder, parent) {
                    Ok(id) => stack.push((path, Some(id))),
                    Err(TreeError::NameConflict) => {
                        tracing::warn!(path = %path.display(), "folder name conflicts with entry");
                        skipped.push(path);
                    }
                    Err(e) => return Err(tree_err(e)),
                }
                continue;
            }

            if parent.is_none() && name == entry_name {
                continue;
            }

            if name.ends_with(tree.script_extension()) {
                let Ok(text) = std::fs::read_to_string(&path) else {
                    skipped.push(path);
                    continue;
                };
                let id = tree.add(&name, CreateKind::Script, parent).map_err(tree_err)?;
                tree.update_content(id, text).map_err(tree_err)?;
            } else if let Some(mime) = mime_from_path(&path) {
                let bytes = std::fs::read(&path)?;
                let resource = resources
                    .acquire(&name, mime, bytes)
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
                let handle = resource.handle.clone();
                if let Err(e) = tree.upload(resource, parent) {
                    resources.release(&handle);
                    return Err(tree_err(e));
                }
            } else {
                skipped.push(path);
            }
        }
    }

    tracing::info!(
        root = %root.display(),
        nodes = tree.len(),
        skipped = skipped.len(),
        "project imported"
    );
    Ok(ImportedProject { tree, skipped })
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/project.rs"]
mod tests;
