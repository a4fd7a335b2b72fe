//! In-process store, mostly for tests and `--store memory` local runs.

use super::{Account, AccountStore, NewAccount, Profile, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
struct Tables {
    accounts: HashMap<Uuid, Account>,
    profiles: HashMap<Uuid, Profile>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts.
    pub async fn account_count(&self) -> usize {
        self.tables.read().await.accounts.len()
    }

    /// Drop an account and, like the `ON DELETE CASCADE` in the SQL schema, its profile.
    pub async fn delete_account(&self, account_id: Uuid) -> bool {
        let mut tables = self.tables.write().await;
        tables.profiles.remove(&account_id);
        tables.accounts.remove(&account_id).is_some()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn create_account(&self, new: NewAccount) -> Result<Account, StoreError> {
        let mut tables = self.tables.write().await;

        let taken = tables
            .accounts
            .values()
            .any(|account| account.username == new.username || account.email == new.email);
        if taken {
            return Err(StoreError::Conflict);
        }

        let account = Account {
            id: Uuid::new_v4(),
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            is_active: true,
            is_staff: false,
            created_at: Utc::now(),
        };
        tables.accounts.insert(account.id, account.clone());

        Ok(account)
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .accounts
            .values()
            .find(|account| account.email == email)
            .cloned())
    }

    async fn find_profile(&self, account_id: Uuid) -> Result<Option<Profile>, StoreError> {
        Ok(self.tables.read().await.profiles.get(&account_id).cloned())
    }

    async fn upsert_profile(&self, profile: Profile) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.accounts.contains_key(&profile.account_id) {
            return Err(StoreError::NotFound);
        }
        tables.profiles.insert(profile.account_id, profile);
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
