//! PostgreSQL-backed [`CredentialRepository`] using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CredentialRepository, CredentialRepositoryError};
use crate::domain::{HashedPassword, UserAccount, Username};

use super::diesel_basic_error_mapping::{DieselFailure, classify_diesel_error, pool_error_message};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed credential store over the `users` table.
#[derive(Clone)]
pub struct DieselCredentialRepository {
    pool: DbPool,
}

impl DieselCredentialRepository {
    /// Store accounts through `pool`.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CredentialRepositoryError {
    CredentialRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(
    error: diesel::result::Error,
    username: &Username,
) -> CredentialRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::UniqueViolation => CredentialRepositoryError::duplicate(username.as_ref()),
        DieselFailure::Connection(message) => CredentialRepositoryError::connection(message),
        DieselFailure::Query(message) => CredentialRepositoryError::query(message),
    }
}

fn row_to_account(row: UserRow) -> Result<UserAccount, CredentialRepositoryError> {
    let username = Username::new(&row.username)
        .map_err(|err| CredentialRepositoryError::query(format!("stored username: {err}")))?;
    Ok(UserAccount::new(
        username,
        HashedPassword::new(row.hashed_pass),
    ))
}

#[async_trait]
impl CredentialRepository for DieselCredentialRepository {
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserAccount>, CredentialRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::username.eq(username.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, username))?;

        row.map(row_to_account).transpose()
    }

    async fn exists(&self, username: &Username) -> Result<bool, CredentialRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let count: i64 = users::table
            .filter(users::username.eq(username.as_ref()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, username))?;

        Ok(count > 0)
    }

    async fn insert(&self, account: &UserAccount) -> Result<(), CredentialRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewUserRow {
            username: account.username().as_ref(),
            hashed_pass: account.hashed_password().as_str(),
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, account.username()))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let repo_err = map_pool_error(PoolError::checkout("connection refused"));

        assert!(matches!(repo_err, CredentialRepositoryError::Connection { .. }));
        assert!(repo_err.to_string().contains("connection refused"));
    }

    #[rstest]
    fn not_found_maps_to_query_error() {
        let username = Username::new("alice").expect("valid username");
        let repo_err = map_diesel_error(diesel::result::Error::NotFound, &username);

        assert!(matches!(repo_err, CredentialRepositoryError::Query { .. }));
    }

    #[rstest]
    fn rows_convert_to_accounts() {
        let account = row_to_account(UserRow {
            username: "alice".to_owned(),
            hashed_pass: "$2b$04$hash".to_owned(),
        })
        .expect("row converts");

        assert_eq!(account.username().as_ref(), "alice");
        assert_eq!(account.hashed_password().as_str(), "$2b$04$hash");
    }

    #[rstest]
    fn blank_stored_usernames_are_rejected() {
        let err = row_to_account(UserRow {
            username: " ".to_owned(),
            hashed_pass: "$2b$04$hash".to_owned(),
        })
        .expect_err("blank username is corrupt");

        assert!(matches!(err, CredentialRepositoryError::Query { .. }));
    }
}
