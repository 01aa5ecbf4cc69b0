//! Driving port for post mutations.

use async_trait::async_trait;

use crate::domain::{Error, Post, PostCreate, PostId, PostUpdate};

/// Domain use-case port for writing posts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostCommand: Send + Sync {
    /// Publish a post for an existing writer.
    async fn create(&self, request: PostCreate) -> Result<Post, Error>;

    /// Replace the content of an existing post.
    async fn update(&self, id: PostId, update: PostUpdate) -> Result<Post, Error>;
}
