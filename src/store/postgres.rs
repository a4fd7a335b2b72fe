use super::{Account, AccountStore, NewAccount, Profile, StoreError};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{
    Connection, PgPool, Row,
    postgres::{PgPoolOptions, PgRow},
};
use std::time::Duration;
use tracing::{Instrument, info_span};
use uuid::Uuid;

const ACCOUNT_COLUMNS: &str =
    "id, username, email, password_hash, is_active, is_staff, created_at";

/// PostgreSQL-backed [`AccountStore`]; schema lives in `sql/schema.sql`.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Open a pool against `dsn`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be reached.
    pub async fn connect(dsn: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .min_connections(1)
            .max_connections(max_connections)
            .max_lifetime(Duration::from_secs(60 * 2))
            .test_before_acquire(true)
            .connect(dsn)
            .await
            .context("Failed to connect to database")?;

        Ok(Self::new(pool))
    }
}

fn account_from_row(row: &PgRow) -> Account {
    Account {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        is_active: row.get("is_active"),
        is_staff: row.get("is_staff"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl AccountStore for PgStore {
    async fn create_account(&self, new: NewAccount) -> Result<Account, StoreError> {
        let query = format!(
            "INSERT INTO accounts (username, email, password_hash) VALUES ($1, $2, $3) RETURNING {ACCOUNT_COLUMNS}"
        );
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query.as_str()
        );
        let row = sqlx::query(&query)
            .bind(&new.username)
            .bind(&new.email)
            .bind(&new.password_hash)
            .fetch_one(&self.pool)
            .instrument(span)
            .await?;

        Ok(account_from_row(&row))
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let query = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1");
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query.as_str()
        );
        let row = sqlx::query(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await?;

        Ok(row.as_ref().map(account_from_row))
    }

    async fn find_profile(&self, account_id: Uuid) -> Result<Option<Profile>, StoreError> {
        let query = r"
            SELECT account_id, phone, dob, gender, stream, degree, course, state, city,
                   college, role, security_question, security_answer_hash
            FROM profiles
            WHERE account_id = $1
        ";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(account_id)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await?;

        Ok(row.map(|row| Profile {
            account_id: row.get("account_id"),
            phone: row.get("phone"),
            dob: row.get("dob"),
            gender: row.get("gender"),
            stream: row.get("stream"),
            degree: row.get("degree"),
            course: row.get("course"),
            state: row.get("state"),
            city: row.get("city"),
            college: row.get("college"),
            role: row.get("role"),
            security_question: row.get("security_question"),
            security_answer_hash: row.get("security_answer_hash"),
        }))
    }

    async fn upsert_profile(&self, profile: Profile) -> Result<(), StoreError> {
        let query = r"
            INSERT INTO profiles
                (account_id, phone, dob, gender, stream, degree, course, state, city,
                 college, role, security_question, security_answer_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (account_id) DO UPDATE SET
                phone = EXCLUDED.phone,
                dob = EXCLUDED.dob,
                gender = EXCLUDED.gender,
                stream = EXCLUDED.stream,
                degree = EXCLUDED.degree,
                course = EXCLUDED.course,
                state = EXCLUDED.state,
                city = EXCLUDED.city,
                college = EXCLUDED.college,
                role = EXCLUDED.role,
                security_question = EXCLUDED.security_question,
                security_answer_hash = EXCLUDED.security_answer_hash,
                updated_at = NOW()
        ";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        let result = sqlx::query(query)
            .bind(profile.account_id)
            .bind(&profile.phone)
            .bind(&profile.dob)
            .bind(&profile.gender)
            .bind(&profile.stream)
            .bind(&profile.degree)
            .bind(&profile.course)
            .bind(&profile.state)
            .bind(&profile.city)
            .bind(&profile.college)
            .bind(&profile.role)
            .bind(&profile.security_question)
            .bind(&profile.security_answer_hash)
            .execute(&self.pool)
            .instrument(span)
            .await;

        match result {
            Ok(_) => Ok(()),
            // foreign_key_violation: the account is gone
            Err(sqlx::Error::Database(db_err))
                if db_err.code().is_some_and(|code| code.as_ref() == "23503") =>
            {
                Err(StoreError::NotFound)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let acquire_span = info_span!(
            "db.acquire",
            db.system = "postgresql",
            db.operation = "ACQUIRE"
        );
        let mut conn = self.pool.acquire().instrument(acquire_span).await?;

        let ping_span = info_span!("db.ping", db.system = "postgresql", db.operation = "PING");
        conn.ping().instrument(ping_span).await?;

        Ok(())
    }
}
