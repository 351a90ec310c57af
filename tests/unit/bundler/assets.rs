use super::*;
use crate::models::ResourceStore;

fn table(paths: &[&str]) -> (AssetTable, Vec<ResourceHandle>) {
    let mut store = ResourceStore::new();
    let mut table = AssetTable::new();
    let mut handles = Vec::new();
    for path in paths {
        let res = store.acquire(path, "image/png", Vec::new()).unwrap();
        table.insert(path.to_string(), res.handle.clone());
        handles.push(res.handle);
    }
    (table, handles)
}

#[test]
fn test_replaces_double_and_single_quoted_literals() {
    let (table, handles) = table(&["img.png"]);
    let src = r#"let a = loadImage("img.png"); let b = loadImage('img.png');"#;

    let (out, count) = substitute_assets(src, &table);
    assert_eq!(count, 2);
    assert_eq!(
        out,
        format!(
            r#"let a = loadImage("{h}"); let b = loadImage('{h}');"#,
            h = handles[0]
        )
    );
}

#[test]
fn test_leaves_other_literals_untouched() {
    let (table, _) = table(&["img.png"]);
    let src = r#"text("hello", 10, 10); let p = "img.png.bak"; let q = "assets/img.png";"#;

    let (out, count) = substitute_assets(src, &table);
    assert_eq!(count, 0);
    assert_eq!(out, src);
}

#[test]
fn test_matches_full_nested_path() {
    let (table, handles) = table(&["assets/sprites/hero.png"]);
    let src = r#"loadImage("assets/sprites/hero.png"); loadImage("hero.png");"#;

    let (out, count) = substitute_assets(src, &table);
    assert_eq!(count, 1);
    assert_eq!(
        out,
        format!(r#"loadImage("{}"); loadImage("hero.png");"#, handles[0])
    );
}

#[test]
fn test_escaped_quotes_stay_inside_literal() {
    let (table, _) = table(&["a.png"]);
    let src = r#"let s = "say \"a.png\""; "#;

    let (out, count) = substitute_assets(src, &table);
    assert_eq!(count, 0);
    assert_eq!(out, src);
}

#[test]
fn test_coincidental_match_is_replaced() {
    // 逐字匹配：与资源同名的普通字符串同样会被替换
    let (table, handles) = table(&["logo.png"]);
    let src = r#"console.log('logo.png');"#;

    let (out, count) = substitute_assets(src, &table);
    assert_eq!(count, 1);
    assert_eq!(out, format!("console.log('{}');", handles[0]));
}

#[test]
fn test_empty_table_borrows_source() {
    let table = AssetTable::new();
    let (out, count) = substitute_assets("\"x\"", &table);
    assert_eq!(count, 0);
    assert!(matches!(out, Cow::Borrowed(_)));
}
