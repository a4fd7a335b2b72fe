//! `PgStore` against a real database.
//!
//! Runs only when `GATEKEEP_TEST_DSN` points at a scratch `PostgreSQL`
//! database; the schema is applied (idempotently) before each test.

use anyhow::Result;
use gatekeep::store::{AccountStore, NewAccount, PgStore, Profile, StoreError};
use uuid::Uuid;

const SCHEMA_SQL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sql/schema.sql"));

async fn store() -> Result<Option<PgStore>> {
    let Ok(dsn) = std::env::var("GATEKEEP_TEST_DSN") else {
        eprintln!("Skipping postgres test: GATEKEEP_TEST_DSN not set");
        return Ok(None);
    };

    let store = PgStore::connect(&dsn, 2).await?;
    sqlx::raw_sql(SCHEMA_SQL).execute(store.pool()).await?;
    Ok(Some(store))
}

fn new_account() -> NewAccount {
    let suffix = Uuid::new_v4().simple().to_string();
    NewAccount {
        username: format!("user-{suffix}"),
        email: format!("{suffix}@example.com"),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
    }
}

#[tokio::test]
async fn account_lifecycle() -> Result<()> {
    let Some(store) = store().await? else {
        return Ok(());
    };

    store.ping().await?;

    let new = new_account();
    let account = store.create_account(new.clone()).await?;
    assert_eq!(account.email, new.email);
    assert!(account.is_active);
    assert!(!account.is_staff);

    let found = store.find_account_by_email(&new.email).await?;
    assert_eq!(found.map(|a| a.id), Some(account.id));

    let duplicate = store.create_account(new).await;
    assert!(matches!(duplicate, Err(StoreError::Conflict)));

    assert!(store.find_profile(account.id).await?.is_none());

    let profile = Profile {
        account_id: account.id,
        city: "Lisbon".to_string(),
        security_question: "Favorite color?".to_string(),
        security_answer_hash: "$argon2id$stub".to_string(),
        ..Profile::default()
    };
    store.upsert_profile(profile.clone()).await?;
    assert_eq!(store.find_profile(account.id).await?, Some(profile.clone()));

    let replaced = Profile {
        city: "Porto".to_string(),
        ..profile
    };
    store.upsert_profile(replaced.clone()).await?;
    assert_eq!(store.find_profile(account.id).await?, Some(replaced));
    Ok(())
}

#[tokio::test]
async fn profile_requires_account() -> Result<()> {
    let Some(store) = store().await? else {
        return Ok(());
    };

    let orphan = Profile {
        account_id: Uuid::new_v4(),
        ..Profile::default()
    };
    let result = store.upsert_profile(orphan).await;
    assert!(matches!(result, Err(StoreError::NotFound)));
    Ok(())
}
