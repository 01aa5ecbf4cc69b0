//! Posts authored by users.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{User, UserId};

/// Maximum allowed length for post content, in characters.
pub const POST_CONTENT_MAX: usize = 10_000;

/// Validation errors for post values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostValidationError {
    /// Content was empty or whitespace only.
    EmptyContent,
    /// Content exceeded [`POST_CONTENT_MAX`].
    ContentTooLong {
        /// Maximum number of characters.
        max: usize,
    },
}

impl fmt::Display for PostValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyContent => write!(f, "content must not be empty"),
            Self::ContentTooLong { max } => {
                write!(f, "content must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for PostValidationError {}

/// Store-assigned numeric post identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(i64);

impl PostId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw identifier.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Body text of a post. Never blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostContent(String);

impl PostContent {
    /// Validate and construct post content.
    pub fn new(content: impl Into<String>) -> Result<Self, PostValidationError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(PostValidationError::EmptyContent);
        }
        if content.chars().count() > POST_CONTENT_MAX {
            return Err(PostValidationError::ContentTooLong {
                max: POST_CONTENT_MAX,
            });
        }
        Ok(Self(content))
    }
}

impl AsRef<str> for PostContent {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<PostContent> for String {
    fn from(value: PostContent) -> Self {
        value.0
    }
}

impl TryFrom<String> for PostContent {
    type Error = PostValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Request to publish a post on behalf of `writer_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostCreate {
    /// Author, resolved regardless of status.
    pub writer_id: UserId,
    /// Body text.
    pub content: PostContent,
}

/// Replacement content for an existing post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostUpdate {
    /// New body text.
    pub content: PostContent,
}

/// A post that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    /// Body text.
    pub content: PostContent,
    /// Resolved author.
    pub writer: User,
    /// Publication time taken from the service clock.
    pub created_at: DateTime<Utc>,
}

/// A stored post together with its author.
///
/// `modified_at` stays `None` until the first edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    id: PostId,
    content: PostContent,
    writer: User,
    created_at: DateTime<Utc>,
    modified_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Rehydrate a post from stored fields.
    #[must_use]
    pub fn new(
        id: PostId,
        content: PostContent,
        writer: User,
        created_at: DateTime<Utc>,
        modified_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            content,
            writer,
            created_at,
            modified_at,
        }
    }

    /// Store-assigned identifier.
    pub fn id(&self) -> PostId {
        self.id
    }

    /// Body text.
    pub fn content(&self) -> &PostContent {
        &self.content
    }

    /// Author as stored at read time.
    pub fn writer(&self) -> &User {
        &self.writer
    }

    /// Publication time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Time of the latest edit.
    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        self.modified_at
    }

    /// Replace the content and stamp the edit time.
    pub fn edit(&mut self, update: PostUpdate, at: DateTime<Utc>) {
        self.content = update.content;
        self.modified_at = Some(at);
    }
}
