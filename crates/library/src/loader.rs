//! The book loading interface the player drives

use crate::LibraryResult;
use async_trait::async_trait;
use storystream_core::Book;

/// Produces a fully populated book for a catalog identifier
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait BookLoader: Send + Sync {
    async fn load_book(&self, identifier: &str) -> LibraryResult<Book>;
}
