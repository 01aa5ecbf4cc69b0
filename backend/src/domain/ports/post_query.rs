//! Driving port for reading posts.

use async_trait::async_trait;

use crate::domain::{Error, Post, PostId};

/// Domain use-case port for post lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostQuery: Send + Sync {
    /// Fetch a post together with its writer.
    async fn get_by_id(&self, id: PostId) -> Result<Post, Error>;
}
