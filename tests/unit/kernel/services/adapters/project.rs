use super::*;
use crate::models::NodeKind;
use tempfile::tempdir;

#[test]
fn test_import_project_builds_tree() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    std::fs::write(root.join("sketch.js"), "function setup() {}").unwrap();
    std::fs::write(root.join("util.js"), "function util() {}").unwrap();
    std::fs::write(root.join("img.png"), [0u8, 1]).unwrap();
    std::fs::write(root.join("README.md"), "docs").unwrap();
    std::fs::create_dir_all(root.join("lib")).unwrap();
    std::fs::write(root.join("lib").join("a.js"), "var a = 1;").unwrap();
    std::fs::create_dir_all(root.join(".git")).unwrap();
    std::fs::write(root.join(".git").join("HEAD"), "ref").unwrap();

    let mut resources = ResourceStore::new();
    let imported = import_project(root, &SketchpadConfig::default(), &mut resources).unwrap();
    let tree = &imported.tree;

    assert_eq!(tree.script_text(tree.entry()), Some("function setup() {}"));
    let util = tree.find_by_path("util.js").unwrap();
    assert_eq!(tree.script_text(util), Some("function util() {}"));
    let nested = tree.find_by_path("lib/a.js").unwrap();
    assert_eq!(tree.script_text(nested), Some("var a = 1;"));

    let img = tree.find_by_path("img.png").unwrap();
    assert_eq!(tree.node(img).unwrap().kind(), NodeKind::Image);
    assert_eq!(resources.len(), 1);

    assert!(tree.find_by_path(".git").is_none());
    assert_eq!(imported.skipped, vec![root.join("README.md")]);
    // entry + util + img + lib + lib/a
    assert_eq!(tree.len(), 5);
}

#[test]
fn test_import_without_entry_uses_default_sketch() {
    let dir = tempdir().unwrap();
    let mut resources = ResourceStore::new();
    let config = SketchpadConfig::default();

    let imported = import_project(dir.path(), &config, &mut resources).unwrap();
    assert_eq!(
        imported.tree.script_text(imported.tree.entry()),
        Some(config.default_sketch.as_str())
    );
    assert_eq!(imported.tree.len(), 1);
}

#[test]
fn test_import_entry_name_without_extension() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    std::fs::write(root.join("main.js"), "function draw() {}").unwrap();
    std::fs::write(root.join("util.js"), "var u = 1;").unwrap();

    let config = SketchpadConfig {
        entry_name: "main".to_string(),
        ..SketchpadConfig::default()
    };
    let mut resources = ResourceStore::new();
    let imported = import_project(root, &config, &mut resources).unwrap();
    let tree = &imported.tree;

    assert_eq!(tree.node(tree.entry()).unwrap().name(), "main.js");
    assert_eq!(tree.script_text(tree.entry()), Some("function draw() {}"));
    assert_eq!(tree.find_by_path("main.js"), Some(tree.entry()));
    // entry + util
    assert_eq!(tree.len(), 2);
    assert!(imported.skipped.is_empty());
}

#[test]
fn test_root_folder_named_like_entry_is_skipped() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    std::fs::create_dir_all(root.join("sketch.js")).unwrap();
    std::fs::write(root.join("sketch.js").join("inner.js"), "var i = 0;").unwrap();
    std::fs::write(root.join("util.js"), "var u = 1;").unwrap();

    let config = SketchpadConfig::default();
    let mut resources = ResourceStore::new();
    let imported = import_project(root, &config, &mut resources).unwrap();
    let tree = &imported.tree;

    assert_eq!(
        tree.script_text(tree.entry()),
        Some(config.default_sketch.as_str())
    );
    assert!(tree.find_by_path("sketch.js/inner.js").is_none());
    assert!(tree.find_by_path("util.js").is_some());
    assert_eq!(imported.skipped, vec![root.join("sketch.js")]);
}
