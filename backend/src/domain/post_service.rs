//! Post service implementing [`PostCommand`] and [`PostQuery`].

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    PostCommand, PostPersistenceError, PostQuery, PostRepository, UserPersistenceError,
    UserRepository,
};
use crate::domain::{Error, NewPost, Post, PostCreate, PostId, PostUpdate};

/// Domain service for writing and reading posts.
#[derive(Clone)]
pub struct PostService<P, U> {
    posts: Arc<P>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<P, U> PostService<P, U> {
    /// Create a service over the post and user stores.
    pub fn new(posts: Arc<P>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            posts,
            users,
            clock,
        }
    }
}

fn map_post_error(error: PostPersistenceError) -> Error {
    match error {
        PostPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("post repository unavailable: {message}"))
        }
        PostPersistenceError::Query { message } => {
            Error::internal(format!("post repository error: {message}"))
        }
    }
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { email } => {
            Error::internal(format!("unexpected email conflict for {email}"))
        }
    }
}

fn not_found(resource: &str, id: i64) -> Error {
    Error::not_found(format!("{resource} {id} not found"))
        .with_details(json!({ "resource": resource, "key": id.to_string() }))
}

impl<P, U> PostService<P, U>
where
    P: PostRepository,
    U: UserRepository,
{
    async fn fetch(&self, id: PostId) -> Result<Post, Error> {
        self.posts
            .find_by_id(id)
            .await
            .map_err(map_post_error)?
            .ok_or_else(|| not_found("posts", id.get()))
    }
}

#[async_trait]
impl<P, U> PostCommand for PostService<P, U>
where
    P: PostRepository,
    U: UserRepository,
{
    async fn create(&self, request: PostCreate) -> Result<Post, Error> {
        let PostCreate { writer_id, content } = request;
        // Writers may still be pending verification.
        let writer = self
            .users
            .find_by_id(writer_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| not_found("users", writer_id.get()))?;

        let post = self
            .posts
            .create(&NewPost {
                content,
                writer,
                created_at: self.clock.utc(),
            })
            .await
            .map_err(map_post_error)?;
        info!(post_id = %post.id(), writer_id = %writer_id, "post created");
        Ok(post)
    }

    async fn update(&self, id: PostId, update: PostUpdate) -> Result<Post, Error> {
        let mut post = self.fetch(id).await?;
        post.edit(update, self.clock.utc());
        self.posts.save(&post).await.map_err(map_post_error)
    }
}

#[async_trait]
impl<P, U> PostQuery for PostService<P, U>
where
    P: PostRepository,
    U: UserRepository,
{
    async fn get_by_id(&self, id: PostId) -> Result<Post, Error> {
        self.fetch(id).await
    }
}
