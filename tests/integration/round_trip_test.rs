// tests/integration/round_trip_test.rs

//! End-to-end store/probe/invalidate/clear flows against a real filesystem.

use super::test_helpers::{TestContext, http_key, https_key};
use bytes::Bytes;
use flate2::read::GzDecoder;
use std::io::Read;
use std::sync::Arc;

#[tokio::test]
async fn test_store_then_exists_round_trip() {
    let ctx = TestContext::new();
    let key = http_key("example.com", "/a/b");
    let content = Bytes::from_static(b"<html><body>rendered page</body></html>");

    ctx.cache.store(&key, content.clone()).await.unwrap();
    assert!(ctx.cache.exists(&key).await.unwrap());

    // The plain file is the original bytes plus the signature trailer.
    let html_path = ctx.root.join("example.com/a/b/index.html");
    let plain = std::fs::read(&html_path).unwrap();
    assert!(plain.starts_with(&content));
    let trailer = &plain[content.len()..];
    let trailer_text = std::str::from_utf8(trailer).unwrap();
    assert!(trailer_text.starts_with("\n\n<!-- Peridot v"));
    assert!(trailer_text.ends_with(" -->"));

    // Decompressing the gzip twin yields the identical bytes.
    let gz = std::fs::read(ctx.root.join("example.com/a/b/index.html.gz")).unwrap();
    let mut decoder = GzDecoder::new(gz.as_slice());
    let mut decompressed = Vec::new();
    decoder.read_to_end(&mut decompressed).unwrap();
    assert_eq!(decompressed, plain);
}

#[tokio::test]
async fn test_scheme_isolation() {
    let ctx = TestContext::new();
    let secure = https_key("example.com", "/x");
    let plain = http_key("example.com", "/x");

    ctx.cache
        .store(&secure, Bytes::from_static(b"secure page"))
        .await
        .unwrap();

    assert!(ctx.cache.exists(&secure).await.unwrap());
    assert!(!ctx.cache.exists(&plain).await.unwrap());

    ctx.cache
        .store(&plain, Bytes::from_static(b"plain page"))
        .await
        .unwrap();

    // Two distinct directories, never a shared one.
    assert!(ctx.root.join("https-example.com/x/index.html").is_file());
    assert!(ctx.root.join("example.com/x/index.html").is_file());
}

#[tokio::test]
async fn test_invalidate_parent_removes_descendants() {
    let ctx = TestContext::new();
    let parent = http_key("example.com", "/a");
    let child = http_key("example.com", "/a/b");

    ctx.cache
        .store(&parent, Bytes::from_static(b"parent page"))
        .await
        .unwrap();
    ctx.cache
        .store(&child, Bytes::from_static(b"child page"))
        .await
        .unwrap();

    ctx.cache.invalidate(&parent).await.unwrap();

    // The child entry lives under the parent's directory, so it goes too.
    assert!(!ctx.cache.exists(&parent).await.unwrap());
    assert!(!ctx.cache.exists(&child).await.unwrap());
    assert!(!ctx.root.join("example.com/a").exists());
}

#[tokio::test]
async fn test_invalidate_by_url() {
    let ctx = TestContext::new();
    let key = https_key("example.com", "/post/1");

    ctx.cache
        .store(&key, Bytes::from_static(b"post one"))
        .await
        .unwrap();
    assert!(ctx.cache.exists(&key).await.unwrap());

    // The query string does not participate in resolution.
    ctx.cache
        .invalidate_url("https://EXAMPLE.com/post/1?utm_source=feed")
        .await
        .unwrap();

    assert!(!ctx.cache.exists(&key).await.unwrap());
}

#[tokio::test]
async fn test_full_clear_is_idempotent() {
    let ctx = TestContext::new();

    for path in ["/", "/a", "/a/b", "/c"] {
        ctx.cache
            .store(&http_key("example.com", path), Bytes::from_static(b"page"))
            .await
            .unwrap();
    }

    ctx.cache.clear().await.unwrap();
    assert!(!ctx.root.exists());

    // Second clear finds no directory and is a silent no-op.
    ctx.cache.clear().await.unwrap();

    // The root is recreated lazily by the next store.
    let key = http_key("example.com", "/a");
    ctx.cache
        .store(&key, Bytes::from_static(b"fresh page"))
        .await
        .unwrap();
    assert!(ctx.cache.exists(&key).await.unwrap());
}

#[tokio::test]
async fn test_size_aggregation_is_exact() {
    let ctx = TestContext::new();

    let keys = [
        http_key("example.com", "/"),
        http_key("example.com", "/a/b"),
        https_key("other.org", "/deep/nested/page"),
    ];
    for (i, key) in keys.iter().enumerate() {
        let body = "x".repeat(100 * (i + 1));
        ctx.cache.store(key, Bytes::from(body)).await.unwrap();
    }

    // Independently sum the six files the three entries consist of.
    let mut expected = 0;
    for dir in [
        "example.com",
        "example.com/a/b",
        "https-other.org/deep/nested/page",
    ] {
        for file in ["index.html", "index.html.gz"] {
            expected += std::fs::metadata(ctx.root.join(dir).join(file))
                .unwrap()
                .len();
        }
    }

    assert_eq!(ctx.cache.size().await, Some(expected));
    assert_eq!(ctx.cache.stats().await.disk_usage_bytes, expected);
}

#[tokio::test]
async fn test_concurrent_stores_for_same_key() {
    let ctx = Arc::new(TestContext::new());
    let key = http_key("example.com", "/contended");

    let mut handles = Vec::new();
    for i in 0..8 {
        let ctx = Arc::clone(&ctx);
        let key = key.clone();
        handles.push(tokio::spawn(async move {
            let body = format!("<html>version {i}</html>");
            ctx.cache.store(&key, Bytes::from(body)).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // Writers serialized per entry: both files present and the plain file
    // holds exactly one complete version.
    assert!(ctx.cache.exists(&key).await.unwrap());
    let plain = std::fs::read(ctx.root.join("example.com/contended/index.html")).unwrap();
    let text = std::str::from_utf8(&plain).unwrap();
    assert!(text.starts_with("<html>version "));
    assert_eq!(text.matches("<html>").count(), 1);
}

#[tokio::test]
async fn test_stats_counters() {
    let ctx = TestContext::new();
    let key = http_key("example.com", "/counted");

    ctx.cache
        .store(&key, Bytes::from_static(b"counted page"))
        .await
        .unwrap();
    assert!(ctx.cache.exists(&key).await.unwrap());
    assert!(!ctx.cache.exists(&http_key("example.com", "/absent")).await.unwrap());
    ctx.cache.invalidate(&key).await.unwrap();
    ctx.cache.clear().await.unwrap();

    let stats = ctx.cache.stats().await;
    assert_eq!(stats.stores, 1);
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.invalidations, 1);
    assert_eq!(stats.full_clears, 1);
    assert_eq!(stats.disk_usage_bytes, 0);
}
