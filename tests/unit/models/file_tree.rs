use super::*;
use crate::models::resource::ResourceStore;

fn tree() -> FileTree {
    FileTree::with_options("sketch.js", "function setup() {}".to_string(), ".js", "// New file")
}

fn names(tree: &FileTree, ids: &[NodeId]) -> Vec<String> {
    ids.iter()
        .map(|&id| tree.node(id).unwrap().name().to_string())
        .collect()
}

#[test]
fn test_new_tree_has_only_entry() {
    let tree = tree();
    assert_eq!(tree.len(), 1);
    let entry = tree.node(tree.entry()).unwrap();
    assert_eq!(entry.name(), "sketch.js");
    assert_eq!(entry.kind(), NodeKind::Script);
    assert_eq!(entry.parent(), None);
    assert_eq!(entry.script_text(), Some("function setup() {}"));
}

#[test]
fn test_add_appends_script_extension() {
    let mut tree = tree();
    let id = tree.add("helpers", CreateKind::Script, None).unwrap();
    assert_eq!(tree.node(id).unwrap().name(), "helpers.js");
    assert_eq!(tree.script_text(id), Some("// New file"));

    let kept = tree.add("util.js", CreateKind::Script, None).unwrap();
    assert_eq!(tree.node(kept).unwrap().name(), "util.js");

    let dir = tree.add("lib", CreateKind::Folder, None).unwrap();
    assert_eq!(tree.node(dir).unwrap().name(), "lib");
    assert!(tree.node(dir).unwrap().is_folder());
}

#[test]
fn test_add_rejects_sibling_name_conflict() {
    let mut tree = tree();
    assert_eq!(
        tree.add("sketch", CreateKind::Script, None),
        Err(TreeError::NameConflict)
    );

    let dir = tree.add("lib", CreateKind::Folder, None).unwrap();
    tree.add("a.js", CreateKind::Script, Some(dir)).unwrap();
    assert_eq!(
        tree.add("a", CreateKind::Script, Some(dir)),
        Err(TreeError::NameConflict)
    );
    // 不同父目录下允许同名
    tree.add("a", CreateKind::Script, None).unwrap();
    assert_eq!(tree.len(), 4);
}

#[test]
fn test_add_rejects_invalid_names_and_parents() {
    let mut tree = tree();
    assert_eq!(tree.add("", CreateKind::Folder, None), Err(TreeError::InvalidName));
    assert_eq!(tree.add("a/b", CreateKind::Folder, None), Err(TreeError::InvalidName));
    assert_eq!(tree.add("..", CreateKind::Folder, None), Err(TreeError::InvalidName));

    let entry = tree.entry();
    assert_eq!(
        tree.add("x", CreateKind::Script, Some(entry)),
        Err(TreeError::NotFound)
    );
    assert_eq!(tree.len(), 1);
}

#[test]
fn test_upload_infers_kind_from_resource() {
    let mut store = ResourceStore::new();
    let mut tree = tree();

    let img = store.acquire("img.png", "image/png", vec![1]).unwrap();
    let vid = store.acquire("clip.mp4", "video/mp4", vec![2]).unwrap();
    let handle = img.handle.clone();

    let img_id = tree.upload(img, None).unwrap();
    let vid_id = tree.upload(vid, None).unwrap();

    assert_eq!(tree.node(img_id).unwrap().kind(), NodeKind::Image);
    assert_eq!(tree.node(vid_id).unwrap().kind(), NodeKind::Video);
    assert_eq!(tree.node(img_id).unwrap().resource(), Some(&handle));
    assert_eq!(tree.update_content(img_id, "x".into()), Err(TreeError::NotAScript));
}

#[test]
fn test_update_content_returns_previous() {
    let mut tree = tree();
    let entry = tree.entry();
    let prev = tree.update_content(entry, "draw();".to_string()).unwrap();
    assert_eq!(prev, "function setup() {}");
    assert_eq!(tree.script_text(entry), Some("draw();"));
}

#[test]
fn test_delete_entry_is_protected() {
    let mut tree = tree();
    let entry = tree.entry();
    assert_eq!(tree.delete(entry).unwrap_err(), TreeError::ProtectedEntry);
    assert_eq!(tree.rename(entry, "main.js"), Err(TreeError::ProtectedEntry));
    assert_eq!(tree.move_to(entry, None), Err(TreeError::ProtectedEntry));
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.node(entry).unwrap().name(), "sketch.js");
}

#[test]
fn test_delete_missing_node() {
    let mut tree = tree();
    let id = tree.add("a", CreateKind::Script, None).unwrap();
    tree.delete(id).unwrap();
    assert_eq!(tree.delete(id).unwrap_err(), TreeError::NotFound);
}

#[test]
fn test_delete_folder_removes_exact_subtree_in_post_order() {
    let mut tree = tree();
    let lib = tree.add("lib", CreateKind::Folder, None).unwrap();
    let inner = tree.add("inner", CreateKind::Folder, Some(lib)).unwrap();
    let deep = tree.add("deep", CreateKind::Script, Some(inner)).unwrap();
    let a = tree.add("a", CreateKind::Script, Some(lib)).unwrap();
    let sibling = tree.add("other", CreateKind::Folder, None).unwrap();
    let sibling_child = tree.add("keep", CreateKind::Script, Some(sibling)).unwrap();

    let removed = tree.delete(lib).unwrap();
    let removed_ids: Vec<NodeId> = removed.iter().map(|r| r.id).collect();

    assert_eq!(removed_ids.len(), 4);
    for id in [lib, inner, deep, a] {
        assert!(removed_ids.contains(&id));
        assert!(!tree.contains(id));
    }
    // 后代总是先于祖先被摘除
    let pos = |id| removed_ids.iter().position(|&r| r == id).unwrap();
    assert!(pos(deep) < pos(inner));
    assert!(pos(inner) < pos(lib));
    assert!(pos(a) < pos(lib));
    assert_eq!(*removed_ids.last().unwrap(), lib);

    assert!(tree.contains(sibling));
    assert!(tree.contains(sibling_child));
    assert_eq!(tree.node(sibling_child).unwrap().parent(), Some(sibling));
    assert_eq!(tree.len(), 3);
    assert_eq!(tree.find_by_path("lib"), None);
}

#[test]
fn test_rename_in_place() {
    let mut tree = tree();
    let dir = tree.add("lib", CreateKind::Folder, None).unwrap();
    let id = tree.add("old", CreateKind::Script, Some(dir)).unwrap();
    tree.add("taken.js", CreateKind::Script, Some(dir)).unwrap();

    tree.rename(id, "new.js").unwrap();
    assert_eq!(tree.node(id).unwrap().name(), "new.js");
    assert_eq!(tree.find_by_path("lib/new.js"), Some(id));
    assert_eq!(tree.find_by_path("lib/old.js"), None);

    assert_eq!(tree.rename(id, "taken.js"), Err(TreeError::NameConflict));
    assert_eq!(tree.node(id).unwrap().name(), "new.js");
    tree.rename(id, "new.js").unwrap();
}

#[test]
fn test_move_reparents_node() {
    let mut tree = tree();
    let a = tree.add("a", CreateKind::Folder, None).unwrap();
    let b = tree.add("b", CreateKind::Folder, None).unwrap();
    let file = tree.add("f", CreateKind::Script, Some(a)).unwrap();

    tree.move_to(file, Some(b)).unwrap();
    assert_eq!(tree.node(file).unwrap().parent(), Some(b));
    assert_eq!(tree.list_children(Some(a)).unwrap(), Vec::<NodeId>::new());
    assert_eq!(tree.path_string(file).unwrap(), "b/f.js");

    tree.move_to(file, None).unwrap();
    assert_eq!(tree.node(file).unwrap().parent(), None);
    assert_eq!(tree.path_string(file).unwrap(), "f.js");
}

#[test]
fn test_move_cycle_detection() {
    let mut tree = tree();
    let a = tree.add("a", CreateKind::Folder, None).unwrap();
    let b = tree.add("b", CreateKind::Folder, Some(a)).unwrap();
    let c = tree.add("c", CreateKind::Folder, Some(b)).unwrap();

    assert_eq!(tree.move_to(a, Some(a)), Err(TreeError::CycleDetected));
    assert_eq!(tree.move_to(a, Some(b)), Err(TreeError::CycleDetected));
    assert_eq!(tree.move_to(a, Some(c)), Err(TreeError::CycleDetected));
    assert_eq!(tree.node(a).unwrap().parent(), None);

    tree.move_to(c, None).unwrap();
    tree.move_to(a, Some(c)).unwrap();
    assert_eq!(tree.resolve_path(b).unwrap(), vec!["c", "a", "b"]);
}

#[test]
fn test_move_into_missing_or_file_target() {
    let mut tree = tree();
    let a = tree.add("a", CreateKind::Folder, None).unwrap();
    let file = tree.add("f", CreateKind::Script, None).unwrap();
    let gone = tree.add("gone", CreateKind::Folder, None).unwrap();
    tree.delete(gone).unwrap();

    assert_eq!(tree.move_to(a, Some(file)), Err(TreeError::NotFound));
    assert_eq!(tree.move_to(a, Some(gone)), Err(TreeError::NotFound));
    assert_eq!(tree.move_to(gone, None), Err(TreeError::NotFound));
}

#[test]
fn test_move_rejects_name_conflict() {
    let mut tree = tree();
    let a = tree.add("a", CreateKind::Folder, None).unwrap();
    let inner = tree.add("x", CreateKind::Script, Some(a)).unwrap();
    tree.add("x", CreateKind::Script, None).unwrap();

    assert_eq!(tree.move_to(inner, None), Err(TreeError::NameConflict));
    assert_eq!(tree.node(inner).unwrap().parent(), Some(a));
}

#[test]
fn test_list_children_orders_folders_first_case_insensitive() {
    let mut tree = tree();
    tree.add("beta", CreateKind::Script, None).unwrap();
    tree.add("Alpha", CreateKind::Script, None).unwrap();
    tree.add("zeta", CreateKind::Folder, None).unwrap();
    tree.add("Assets", CreateKind::Folder, None).unwrap();

    let ids = tree.list_children(None).unwrap();
    assert_eq!(
        names(&tree, &ids),
        vec!["Assets", "zeta", "Alpha.js", "beta.js", "sketch.js"]
    );
}

#[test]
fn test_walk_is_preorder_folders_first() {
    let mut tree = tree();
    let lib = tree.add("lib", CreateKind::Folder, None).unwrap();
    tree.add("z", CreateKind::Script, Some(lib)).unwrap();
    let sub = tree.add("sub", CreateKind::Folder, Some(lib)).unwrap();
    tree.add("y", CreateKind::Script, Some(sub)).unwrap();
    tree.add("a", CreateKind::Script, None).unwrap();

    let rows = tree.walk();
    let ids: Vec<NodeId> = rows.iter().map(|r| r.id).collect();
    assert_eq!(
        names(&tree, &ids),
        vec!["lib", "sub", "y.js", "z.js", "a.js", "sketch.js"]
    );
    let depths: Vec<u16> = rows.iter().map(|r| r.depth).collect();
    assert_eq!(depths, vec![0, 1, 2, 1, 0, 0]);
}

#[test]
fn test_random_mutations_keep_tree_acyclic() {
    let mut tree = tree();
    let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = move || {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        seed
    };

    for step in 0..400 {
        let ids: Vec<NodeId> = tree.iter().map(|(id, _)| id).collect();
        let folders: Vec<NodeId> = tree
            .iter()
            .filter(|(_, n)| n.is_folder())
            .map(|(id, _)| id)
            .collect();
        let pick_parent = |r: u64| -> Option<NodeId> {
            if folders.is_empty() || r % 3 == 0 {
                None
            } else {
                Some(folders[(r as usize) % folders.len()])
            }
        };

        let r = next();
        match r % 4 {
            0 => {
                let _ = tree.add(&format!("d{}", step), CreateKind::Folder, pick_parent(next()));
            }
            1 => {
                let _ = tree.add(&format!("s{}", step), CreateKind::Script, pick_parent(next()));
            }
            2 => {
                let id = ids[(next() as usize) % ids.len()];
                let target = pick_parent(next());
                let expect_cycle =
                    target.is_some_and(|t| t == id || tree.is_descendant_of(t, id));
                let result = tree.move_to(id, target);
                if expect_cycle && id != tree.entry() {
                    assert_eq!(result, Err(TreeError::CycleDetected));
                }
            }
            _ => {
                if next() % 4 == 0 {
                    let id = ids[(next() as usize) % ids.len()];
                    let _ = tree.delete(id);
                }
            }
        }

        let total = tree.len();
        for (id, node) in tree.iter() {
            let depth = tree.ancestors(id).unwrap().len();
            assert!(depth < total);
            if let Some(parent) = node.parent() {
                assert!(tree.node(parent).unwrap().is_folder());
            }
        }
        assert!(tree.contains(tree.entry()));
        assert_eq!(tree.node(tree.entry()).unwrap().parent(), None);
        assert_eq!(tree.walk().len(), total);
    }
}
