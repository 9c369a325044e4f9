//! Integration tests for book loading and caching

use std::sync::Arc;
use std::time::Duration;
use storystream_library::{BookLoader, BookParser, LibraryError};

fn book_json(chapters: usize) -> String {
    let chapters: Vec<String> = (1..=chapters)
        .map(|n| {
            format!(
                r#"{{"chapter_number": {n}, "title": "Chapter {n}", "key_point": "Point {n}",
                    "audio_file_name": "ch{n}.mp3", "duration": {d}, "content": "Text {n}"}}"#,
                n = n,
                d = 290 + n * 10
            )
        })
        .collect();
    format!(
        r#"{{"title": "The Great Gatsby", "author": "F. Scott Fitzgerald", "published_in": 1925,
            "cover_file_name": "greatgatsby.jpg", "chapters": [{}]}}"#,
        chapters.join(",")
    )
}

#[tokio::test]
async fn test_load_through_trait_object() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("gatsby.json"), book_json(2)).expect("write failed");

    let loader: Arc<dyn BookLoader> = Arc::new(BookParser::new(dir.path()));
    let book = loader.load_book("gatsby").await.expect("load failed");

    assert_eq!(book.chapters.len(), 2);
    assert_eq!(book.chapters[0].duration, 300.0);
    assert_eq!(book.chapters[1].duration, 310.0);
    assert_eq!(book.chapters[1].chapter_number, 2);
}

#[tokio::test]
async fn test_missing_book() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let parser = BookParser::new(dir.path());

    let err = parser.load_book("nothing_here").await.unwrap_err();
    assert_eq!(
        err,
        LibraryError::NotFound {
            identifier: "nothing_here".to_string()
        }
    );
}

#[tokio::test]
async fn test_abandoned_request_still_fills_cache() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("gatsby.json"), book_json(3)).expect("write failed");
    let parser = BookParser::new(dir.path());

    // Start a load and drop the caller right away.
    let pending = {
        let parser = parser.clone();
        tokio::spawn(async move { parser.load_book("gatsby").await })
    };
    for _ in 0..3 {
        tokio::task::yield_now().await;
    }
    pending.abort();

    let mut cached = false;
    for _ in 0..100 {
        if parser.is_cached("gatsby").await {
            cached = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    // Either the abort landed after the load finished, or the detached task finished it.
    assert!(cached, "book never reached the cache");
}

#[tokio::test]
async fn test_concurrent_loads_agree() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("gatsby.json"), book_json(4)).expect("write failed");
    let parser = BookParser::new(dir.path());

    let (a, b) = tokio::join!(parser.load_book("gatsby"), parser.load_book("gatsby"));
    assert_eq!(a.expect("first load failed"), b.expect("second load failed"));
}
