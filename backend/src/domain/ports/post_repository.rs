//! Driven port for post persistence.
use async_trait::async_trait;

use crate::domain::{NewPost, Post, PostId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by post repository adapters.
    pub enum PostPersistenceError {
        /// Repository connection could not be established.
        Connection {
            /// Adapter-supplied detail.
            message: String,
        } => "post repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query {
            /// Adapter-supplied detail.
            message: String,
        } => "post repository query failed: {message}",
    }
}

/// Storage for posts. Reads always resolve the writer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a post and return it with its assigned identifier.
    async fn create(&self, post: &NewPost) -> Result<Post, PostPersistenceError>;

    /// Fetch a post and its writer.
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostPersistenceError>;

    /// Persist content and modification time of an existing post.
    async fn save(&self, post: &Post) -> Result<Post, PostPersistenceError>;
}
