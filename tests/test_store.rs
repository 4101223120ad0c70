use std::sync::Arc;

use filament::store::{ContentStore, DirStore, LockedStore, MemoryStore, StoreError};

#[tokio::test]
async fn test_dir_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = DirStore::new(dir.path());

    store.write("a.txt", b"hello").await.unwrap();

    assert_eq!(store.read("a.txt").await.unwrap(), b"hello");
    assert_eq!(std::fs::read(dir.path().join("a.txt")).unwrap(), b"hello");
}

#[tokio::test]
async fn test_dir_store_names_reduce_to_basename() {
    let dir = tempfile::tempdir().unwrap();
    let store = DirStore::new(dir.path());

    store.write("../../escape.txt", b"x").await.unwrap();

    assert!(dir.path().join("escape.txt").exists());
    assert_eq!(store.read("/some/dir/escape.txt").await.unwrap(), b"x");
}

#[tokio::test]
async fn test_dir_store_list_is_sorted_and_skips_hidden() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("b.txt"), b"b").unwrap();
    std::fs::write(dir.path().join(".hidden"), b"h").unwrap();
    std::fs::create_dir(dir.path().join("js")).unwrap();
    std::fs::write(dir.path().join("js/a.js"), b"a").unwrap();

    let store = DirStore::new(dir.path());

    assert_eq!(store.list().await.unwrap(), vec!["a.js", "b.txt"]);
}

#[tokio::test]
async fn test_dir_store_missing_entry() {
    let dir = tempfile::tempdir().unwrap();
    let store = DirStore::new(dir.path());

    assert!(matches!(store.read("nope").await, Err(StoreError::NotFound(_))));
    assert!(matches!(store.delete("nope").await, Err(StoreError::NotFound(_))));
}

#[tokio::test]
async fn test_dir_store_delete_nested() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("img")).unwrap();
    std::fs::write(dir.path().join("img/logo.png"), b"png").unwrap();

    let store = DirStore::new(dir.path());
    store.delete("logo.png").await.unwrap();

    assert!(!dir.path().join("img/logo.png").exists());
}

#[tokio::test]
async fn test_dir_store_overwrite_nested_then_delete() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("css")).unwrap();
    std::fs::write(dir.path().join("css/site.css"), b"old").unwrap();

    let store = DirStore::new(dir.path());
    store.write("site.css", b"new").await.unwrap();

    assert_eq!(store.read("site.css").await.unwrap(), b"new");
    assert!(!dir.path().join("site.css").exists());

    store.delete("site.css").await.unwrap();
    assert!(matches!(store.read("site.css").await, Err(StoreError::NotFound(_))));
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_dir_store_delete_removes_every_copy() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("a")).unwrap();
    std::fs::create_dir(dir.path().join("b")).unwrap();
    std::fs::write(dir.path().join("a/dup.txt"), b"1").unwrap();
    std::fs::write(dir.path().join("b/dup.txt"), b"2").unwrap();
    std::fs::write(dir.path().join("dup.txt"), b"3").unwrap();

    let store = DirStore::new(dir.path());
    store.delete("dup.txt").await.unwrap();

    assert!(matches!(store.read("dup.txt").await, Err(StoreError::NotFound(_))));
    assert!(matches!(store.delete("dup.txt").await, Err(StoreError::NotFound(_))));
}

#[tokio::test]
async fn test_dir_store_rejects_hidden_write() {
    let dir = tempfile::tempdir().unwrap();
    let store = DirStore::new(dir.path());

    assert!(matches!(
        store.write(".env", b"x").await,
        Err(StoreError::InvalidName(_))
    ));
}

#[tokio::test]
async fn test_dir_store_open_creates_root() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("resources");

    let store = DirStore::open(&root).await.unwrap();

    assert!(root.is_dir());
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_memory_store_operations() {
    let store = MemoryStore::with_entries([("index.html", "<p>home</p>")]);

    store.write("b.bin", &[1, 2, 3]).await.unwrap();

    assert_eq!(store.list().await.unwrap(), vec!["b.bin", "index.html"]);
    assert_eq!(store.read("/x/index.html").await.unwrap(), b"<p>home</p>");

    store.delete("b.bin").await.unwrap();
    assert!(matches!(store.delete("b.bin").await, Err(StoreError::NotFound(_))));
    assert!(matches!(store.write("", b"").await, Err(StoreError::InvalidName(_))));
}

#[tokio::test]
async fn test_memory_store_rejects_hidden_write() {
    let store = MemoryStore::new();

    for name in [".env", "conf/.secret"] {
        assert!(
            matches!(store.write(name, b"x").await, Err(StoreError::InvalidName(_))),
            "{name}"
        );
    }
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_locked_store_passes_through() {
    let store = LockedStore::new(MemoryStore::new());

    store.write("a.txt", b"1").await.unwrap();
    assert_eq!(store.read("a.txt").await.unwrap(), b"1");
    assert_eq!(store.inner().list().await.unwrap(), vec!["a.txt"]);

    store.delete("a.txt").await.unwrap();
    assert!(matches!(store.read("a.txt").await, Err(StoreError::NotFound(_))));
    assert_eq!(store.tracked_names(), 0);
}

#[tokio::test]
async fn test_locked_store_forgets_idle_names() {
    let store = LockedStore::new(MemoryStore::new());

    for i in 0..1000 {
        let name = format!("missing-{i}.txt");
        assert!(matches!(store.read(&name).await, Err(StoreError::NotFound(_))));
        assert!(store.delete(&name).await.is_err());
    }

    assert_eq!(store.tracked_names(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_locked_store_concurrent_writes_never_tear() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(LockedStore::new(DirStore::new(dir.path())));

    let blobs: Vec<Vec<u8>> = (0..8u8).map(|i| vec![b'a' + i; 64 * 1024]).collect();

    let mut tasks = Vec::new();
    for blob in blobs.clone() {
        let store = Arc::clone(&store);
        tasks.push(tokio::spawn(async move {
            for _ in 0..5 {
                store.write("shared.bin", &blob).await.unwrap();
                let seen = store.read("shared.bin").await.unwrap();
                assert_eq!(seen.len(), blob.len());
                assert!(seen.iter().all(|b| *b == seen[0]));
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let last = store.read("shared.bin").await.unwrap();
    assert!(blobs.contains(&last));
    assert_eq!(store.list().await.unwrap(), vec!["shared.bin"]);
    assert_eq!(store.tracked_names(), 0);
}
