// FILE: crates/library/src/parser.rs

use crate::error::{LibraryError, LibraryResult};
use crate::loader::BookLoader;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use storystream_config::LibraryConfig;
use storystream_core::{Book, Validator};
use tokio::sync::Mutex;

/// Loads `<identifier>.json` book records from a resource directory
///
/// Decoded books are cached by identifier. The read and the cache insert run
/// on a spawned task, so a caller that stops waiting still leaves the result
/// in the cache for the next request.
#[derive(Clone)]
pub struct BookParser {
    resource_dir: PathBuf,
    cache: Arc<Mutex<HashMap<String, Book>>>,
}

impl BookParser {
    pub fn new(resource_dir: impl Into<PathBuf>) -> Self {
        Self {
            resource_dir: resource_dir.into(),
            cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn from_config(config: &LibraryConfig) -> Self {
        Self::new(config.resource_dir.clone())
    }

    pub fn resource_dir(&self) -> &Path {
        &self.resource_dir
    }

    pub async fn is_cached(&self, identifier: &str) -> bool {
        self.cache.lock().await.contains_key(identifier)
    }

    pub async fn clear_cache(&self) {
        self.cache.lock().await.clear();
    }

    fn book_path(&self, identifier: &str) -> LibraryResult<PathBuf> {
        let valid = !identifier.trim().is_empty()
            && !identifier.contains(['/', '\\'])
            && identifier != ".."
            && identifier != ".";
        if !valid {
            return Err(LibraryError::InvalidData(format!(
                "Invalid book identifier: {:?}",
                identifier
            )));
        }
        Ok(self.resource_dir.join(format!("{}.json", identifier)))
    }
}

#[async_trait]
impl BookLoader for BookParser {
    async fn load_book(&self, identifier: &str) -> LibraryResult<Book> {
        if let Some(book) = self.cache.lock().await.get(identifier) {
            log::debug!("Book cache hit: {}", identifier);
            return Ok(book.clone());
        }

        let path = self.book_path(identifier)?;
        let cache = Arc::clone(&self.cache);
        let identifier = identifier.to_string();

        let task = tokio::spawn(async move {
            let book = read_book(&path, &identifier).await?;
            log::info!(
                "Loaded \"{}\" ({} chapters) from {}",
                book.title,
                book.chapters.len(),
                path.display()
            );
            cache.lock().await.insert(identifier, book.clone());
            Ok(book)
        });

        task.await
            .map_err(|e| LibraryError::InvalidData(format!("Load task failed: {}", e)))?
    }
}

async fn read_book(path: &Path, identifier: &str) -> LibraryResult<Book> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(LibraryError::NotFound {
                identifier: identifier.to_string(),
            });
        }
        Err(e) => return Err(LibraryError::InvalidData(e.to_string())),
    };

    let book: Book =
        serde_json::from_slice(&bytes).map_err(|e| LibraryError::Decode(e.to_string()))?;

    book.validate()
        .map_err(|errors| LibraryError::InvalidData(errors.join("; ")))?;

    Ok(book)
}
