//! PostgreSQL-backed [`UserRepository`] using Diesel.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Email, NewUser, User, UserId, UserStatus, UserUpdate};

use super::diesel_basic_error_mapping::{DieselFailure, classify_diesel_error};
use super::models::{NewUserRow, ProfileChangeset, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Name of the unique constraint guarding `users.email`.
const EMAIL_UNIQUE_CONSTRAINT: &str = "users_email_key";

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error, email: Option<&str>) -> UserPersistenceError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => UserPersistenceError::connection(message),
        DieselFailure::Query(message) => UserPersistenceError::query(message),
        DieselFailure::UniqueViolation { constraint } => {
            let on_email = constraint
                .as_deref()
                .is_none_or(|name| name == EMAIL_UNIQUE_CONSTRAINT);
            match (on_email, email) {
                (true, Some(email)) => UserPersistenceError::duplicate_email(email),
                _ => UserPersistenceError::query("unique constraint violated"),
            }
        }
    }
}

fn to_domain(row: UserRow) -> Result<User, UserPersistenceError> {
    row.into_domain().map_err(UserPersistenceError::query)
}

fn to_domain_opt(row: Option<UserRow>) -> Result<Option<User>, UserPersistenceError> {
    row.map(to_domain).transpose()
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            email: user.email().as_ref(),
            nickname: user.nickname().as_ref(),
            address: user.address().as_ref(),
            status: user.status().as_str(),
            certification_code: user.certification_code().as_ref(),
        };

        let stored: UserRow = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, Some(user.email().as_ref())))?;
        to_domain(stored)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::id.eq(id.get()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;
        to_domain_opt(row)
    }

    async fn find_by_id_and_status(
        &self,
        id: UserId,
        status: UserStatus,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::id.eq(id.get()))
            .filter(users::status.eq(status.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;
        to_domain_opt(row)
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;
        to_domain_opt(row)
    }

    async fn find_by_email_and_status(
        &self,
        email: &Email,
        status: UserStatus,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::email.eq(email.as_ref()))
            .filter(users::status.eq(status.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;
        to_domain_opt(row)
    }

    async fn record_login(
        &self,
        id: UserId,
        at: DateTime<Utc>,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(users::table.find(id.get()))
            .set(users::last_login_at.eq(Some(at)))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;
        to_domain_opt(row)
    }

    async fn update_profile(
        &self,
        id: UserId,
        update: &UserUpdate,
    ) -> Result<Option<User>, UserPersistenceError> {
        let changes = ProfileChangeset::from(update);
        if changes.is_empty() {
            return self.find_by_id(id).await;
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(users::table.find(id.get()))
            .set(&changes)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;
        to_domain_opt(row)
    }

    async fn activate(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let activated = diesel::update(
            users::table
                .find(id.get())
                .filter(users::status.eq(UserStatus::Pending.as_str())),
        )
        .set(users::status.eq(UserStatus::Active.as_str()))
        .returning(UserRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(|err| map_diesel_error(err, None))?;
        match activated {
            Some(row) => to_domain(row).map(Some),
            // Already active, or gone.
            None => {
                drop(conn);
                self.find_by_id(id).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Address, Nickname};
    use diesel::pg::Pg;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    fn profile_sql(update: &UserUpdate) -> String {
        let changes = ProfileChangeset::from(update);
        diesel::debug_query::<Pg, _>(&diesel::update(users::table.find(1_i64)).set(&changes))
            .to_string()
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let error = map_pool_error(PoolError::checkout("connection refused"));
        assert!(matches!(error, UserPersistenceError::Connection { .. }));
        assert!(error.to_string().contains("connection refused"));
    }

    #[rstest]
    fn unique_violation_on_insert_maps_to_duplicate_email() {
        let error = map_diesel_error(
            DieselError::DatabaseError(
                DatabaseErrorKind::UniqueViolation,
                Box::new("duplicate key value".to_owned()),
            ),
            Some("samryong@gmail.com"),
        );
        assert_eq!(
            error,
            UserPersistenceError::duplicate_email("samryong@gmail.com")
        );
    }

    #[rstest]
    fn unique_violation_without_email_context_is_a_query_error() {
        let error = map_diesel_error(
            DieselError::DatabaseError(
                DatabaseErrorKind::UniqueViolation,
                Box::new("duplicate key value".to_owned()),
            ),
            None,
        );
        assert!(matches!(error, UserPersistenceError::Query { .. }));
    }

    #[rstest]
    fn corrupt_status_rows_are_rejected() {
        let row = UserRow {
            id: 9,
            email: "samryong@gmail.com".to_owned(),
            nickname: "samryong".to_owned(),
            address: String::new(),
            status: "DELETED".to_owned(),
            certification_code: "code".to_owned(),
            last_login_at: None,
        };
        let error = to_domain(row).expect_err("unknown status");
        assert!(error.to_string().contains("status"));
    }

    #[rstest]
    fn profile_update_sets_only_supplied_columns() {
        let sql = profile_sql(&UserUpdate {
            nickname: Some(Nickname::new("renamed").expect("valid nickname")),
            address: None,
        });
        assert!(sql.contains(r#"SET "nickname" = $1"#), "{sql}");
        for untouched in [r#""address""#, r#""status""#, r#""last_login_at""#] {
            assert!(!sql.contains(untouched), "{untouched} in {sql}");
        }
    }

    #[rstest]
    fn profile_update_with_both_fields_leaves_status_alone() {
        let sql = profile_sql(&UserUpdate {
            nickname: Some(Nickname::new("renamed").expect("valid nickname")),
            address: Some(Address::new("Pangyo").expect("valid address")),
        });
        assert!(sql.contains(r#""address" = $2"#), "{sql}");
        assert!(!sql.contains(r#""status""#), "{sql}");
    }

    #[rstest]
    fn empty_profile_update_is_detected() {
        assert!(ProfileChangeset::from(&UserUpdate::default()).is_empty());
    }
}
