use super::*;

#[test]
fn test_media_kind_from_mime() {
    assert_eq!(MediaKind::from_mime("image/png"), Some(MediaKind::Image));
    assert_eq!(MediaKind::from_mime("Video/MP4"), Some(MediaKind::Video));
    assert_eq!(MediaKind::from_mime("text/plain"), None);
}

#[test]
fn test_mime_from_path() {
    assert_eq!(mime_from_path(Path::new("a/b/cat.PNG")), Some("image/png"));
    assert_eq!(mime_from_path(Path::new("clip.webm")), Some("video/webm"));
    assert_eq!(mime_from_path(Path::new("sketch.js")), None);
    assert_eq!(mime_from_path(Path::new("README")), None);
}

#[test]
fn test_acquire_allocates_distinct_handles() {
    let mut store = ResourceStore::new();
    let a = store.acquire("a.png", "image/png", vec![1, 2, 3]).unwrap();
    let b = store.acquire("a.png", "image/png", vec![4]).unwrap();

    assert_ne!(a.handle, b.handle);
    assert!(a.handle.as_str().starts_with("blob:sketchpad/"));
    assert_eq!(a.kind, MediaKind::Image);
    assert_eq!(store.len(), 2);
    assert_eq!(&*store.get(&a.handle).unwrap().bytes, &[1, 2, 3]);
}

#[test]
fn test_acquire_rejects_unsupported_media() {
    let mut store = ResourceStore::new();
    let err = store.acquire("notes.txt", "text/plain", Vec::new()).unwrap_err();
    assert_eq!(err, UploadError::UnsupportedMedia("text/plain".to_string()));
    assert!(store.is_empty());
}

#[test]
fn test_release_is_idempotent() {
    let mut store = ResourceStore::new();
    let res = store.acquire("v.mp4", "video/mp4", vec![0]).unwrap();

    assert!(store.release(&res.handle));
    assert!(!store.release(&res.handle));
    assert!(store.get(&res.handle).is_none());
}
