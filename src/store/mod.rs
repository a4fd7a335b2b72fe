//! Account persistence.
//!
//! Handlers never talk to a database directly; they receive a [`SharedStore`]
//! through an axum `Extension` and go through the [`AccountStore`] trait.
//! "Does not exist" is `Ok(None)`, everything else that goes wrong is a
//! [`StoreError`].

pub mod memory;
pub mod postgres;

pub use self::memory::MemoryStore;
pub use self::postgres::PgStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Store handle shared by every handler.
pub type SharedStore = Arc<dyn AccountStore>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("an account with this username or email already exists")]
    Conflict,
    #[error("account not found")]
    NotFound,
    /// Driver or connection failure. The inner message is for logs only.
    #[error("account store unavailable")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if is_unique_violation(&err) {
            Self::Conflict
        } else {
            Self::Unavailable(err.to_string())
        }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}

/// A persisted account.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// Argon2id PHC string, never the raw password.
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
}

/// Validated input for [`AccountStore::create_account`].
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// One-to-one extension of an [`Account`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub account_id: Uuid,
    pub phone: String,
    pub dob: String,
    pub gender: String,
    pub stream: String,
    pub degree: String,
    pub course: String,
    pub state: String,
    pub city: String,
    pub college: String,
    pub role: String,
    pub security_question: String,
    /// Argon2id PHC string of the normalized answer.
    pub security_answer_hash: String,
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Persist a new account with `is_active = true` and `is_staff = false`.
    async fn create_account(&self, new: NewAccount) -> Result<Account, StoreError>;

    /// Look up an account by its normalized email.
    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    async fn find_profile(&self, account_id: Uuid) -> Result<Option<Profile>, StoreError>;

    /// Create or replace the profile of an existing account.
    ///
    /// Returns [`StoreError::NotFound`] if the account does not exist.
    async fn upsert_profile(&self, profile: Profile) -> Result<(), StoreError>;

    /// Cheap reachability check used by `/health`.
    async fn ping(&self) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_display_hides_driver_message() {
        let err = StoreError::Unavailable("password authentication failed for user".to_string());
        assert_eq!(err.to_string(), "account store unavailable");
    }

    #[test]
    fn non_database_sqlx_error_is_unavailable() {
        let err = StoreError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
