//! PostgreSQL-backed [`PostRepository`] using Diesel.
//!
//! Reads join `users` so every returned post carries its writer.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PostPersistenceError, PostRepository};
use crate::domain::{NewPost, Post, PostId, User};

use super::diesel_basic_error_mapping::{DieselFailure, classify_diesel_error};
use super::models::{NewPostRow, PostChangeset, PostRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{posts, users};

/// Diesel-backed implementation of the [`PostRepository`] port.
#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PostPersistenceError {
    PostPersistenceError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> PostPersistenceError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => PostPersistenceError::connection(message),
        DieselFailure::Query(message) => PostPersistenceError::query(message),
        DieselFailure::UniqueViolation { .. } => {
            PostPersistenceError::query("unique constraint violated")
        }
    }
}

fn with_writer(row: PostRow, writer: User) -> Result<Post, PostPersistenceError> {
    row.into_domain(writer).map_err(PostPersistenceError::query)
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn create(&self, post: &NewPost) -> Result<Post, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewPostRow {
            content: post.content.as_ref(),
            writer_id: post.writer.id().get(),
            created_at: post.created_at,
        };

        let stored: PostRow = diesel::insert_into(posts::table)
            .values(&row)
            .returning(PostRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        with_writer(stored, post.writer.clone())
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let joined: Option<(PostRow, UserRow)> = posts::table
            .inner_join(users::table)
            .filter(posts::id.eq(id.get()))
            .select((PostRow::as_select(), UserRow::as_select()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        let Some((post, writer)) = joined else {
            return Ok(None);
        };
        let writer = writer.into_domain().map_err(PostPersistenceError::query)?;
        with_writer(post, writer).map(Some)
    }

    async fn save(&self, post: &Post) -> Result<Post, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = PostChangeset {
            content: post.content().as_ref(),
            modified_at: post.modified_at(),
        };

        let stored: Option<PostRow> = diesel::update(posts::table.find(post.id().get()))
            .set(&changes)
            .returning(PostRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        match stored {
            Some(row) => with_writer(row, post.writer().clone()),
            None => Err(PostPersistenceError::query(format!(
                "post {} vanished before save",
                post.id()
            ))),
        }
    }
}
