//! Internal Diesel row structs.
//!
//! These types never leave the persistence layer; repositories convert them
//! into domain values and reject rows that fail domain validation.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::{
    Address, CertificationCode, Email, Nickname, Post, PostContent, PostId, User, UserId,
    UserParts, UserStatus, UserUpdate,
};

use super::schema::{posts, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub email: String,
    pub nickname: String,
    pub address: String,
    pub status: String,
    pub certification_code: String,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl UserRow {
    /// Convert into a domain user, reporting which column was invalid.
    pub(crate) fn into_domain(self) -> Result<User, String> {
        let id = self.id;
        let invalid = |column: &str, err: &dyn std::fmt::Display| {
            format!("invalid {column} stored for user {id}: {err}")
        };
        Ok(User::from_parts(UserParts {
            id: UserId::new(id),
            email: Email::new(&self.email).map_err(|err| invalid("email", &err))?,
            nickname: Nickname::new(self.nickname).map_err(|err| invalid("nickname", &err))?,
            address: Address::new(self.address).map_err(|err| invalid("address", &err))?,
            status: self
                .status
                .parse::<UserStatus>()
                .map_err(|err| invalid("status", &err))?,
            certification_code: CertificationCode::new(self.certification_code)
                .map_err(|err| invalid("certification_code", &err))?,
            last_login_at: self.last_login_at,
        }))
    }
}

/// Insertable struct for registering a user.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub email: &'a str,
    pub nickname: &'a str,
    pub address: &'a str,
    pub status: &'a str,
    pub certification_code: &'a str,
}

/// Profile columns touched by a user update.
///
/// `None` fields are left out of the `SET` clause.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct ProfileChangeset<'a> {
    pub nickname: Option<&'a str>,
    pub address: Option<&'a str>,
}

impl<'a> From<&'a UserUpdate> for ProfileChangeset<'a> {
    fn from(update: &'a UserUpdate) -> Self {
        Self {
            nickname: update.nickname.as_ref().map(|nickname| nickname.as_ref()),
            address: update.address.as_ref().map(|address| address.as_ref()),
        }
    }
}

impl ProfileChangeset<'_> {
    /// Diesel refuses to build an `UPDATE` without assignments.
    pub(crate) fn is_empty(&self) -> bool {
        self.nickname.is_none() && self.address.is_none()
    }
}

/// Row struct for reading from the posts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PostRow {
    pub id: i64,
    pub content: String,
    pub writer_id: i64,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl PostRow {
    /// Combine with the already converted writer.
    pub(crate) fn into_domain(self, writer: User) -> Result<Post, String> {
        if writer.id().get() != self.writer_id {
            return Err(format!(
                "post {} joined writer {} but references {}",
                self.id,
                writer.id(),
                self.writer_id
            ));
        }
        let content = PostContent::new(self.content)
            .map_err(|err| format!("invalid content stored for post {}: {err}", self.id))?;
        Ok(Post::new(
            PostId::new(self.id),
            content,
            writer,
            self.created_at,
            self.modified_at,
        ))
    }
}

/// Insertable struct for publishing a post.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = posts)]
pub(crate) struct NewPostRow<'a> {
    pub content: &'a str,
    pub writer_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Changeset for editing a post. The writer is never updated.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = posts)]
pub(crate) struct PostChangeset<'a> {
    pub content: &'a str,
    pub modified_at: Option<DateTime<Utc>>,
}
