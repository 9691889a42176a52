//! In-memory storage adapter.
//!
//! [`MemoryStore`] implements every storage capability over a single mutex,
//! so multi-row mutations are atomic by construction. Ids are assigned
//! sequentially from 1, matching `BIGSERIAL` on a fresh database.
//!
//! Used by unit tests and by the test server harness.
//!
//! # Example
//!
//! ```rust,ignore
//! use sso_service::repositories::MemoryStore;
//!
//! let store = MemoryStore::new();
//! let uid = store.save_user("a@test.com", b"hash").await?;
//! store.set_unavailable(true); // every call now fails with StoreError::Database
//! ```

use super::{AppRegistry, CredentialStore, PermissionLedger};
use crate::errors::{Entity, StoreError};
use crate::models::{App, User};
use secrecy::SecretString;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

/// In-memory implementation of the storage capabilities.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryStoreInner>>,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    users: BTreeMap<i64, User>,
    apps: BTreeMap<i64, App>,
    admins: BTreeSet<(i64, i64)>,
    creators: BTreeSet<(i64, i64)>,
    next_user_id: i64,
    next_app_id: i64,
    /// When set, every operation fails as if the backend were down.
    unavailable: bool,
}

impl MemoryStoreInner {
    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable {
            return Err(StoreError::Database("store unavailable".to_string()));
        }
        Ok(())
    }

    fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users.values().find(|u| u.email == email)
    }

    fn app_by_name(&self, name: &str) -> Option<&App> {
        self.apps.values().find(|a| a.name == name)
    }

    fn require_user(&self, user_id: i64) -> Result<(), StoreError> {
        if self.users.contains_key(&user_id) {
            Ok(())
        } else {
            Err(StoreError::NotFound(Entity::User))
        }
    }

    fn require_app(&self, app_id: i64) -> Result<(), StoreError> {
        if self.apps.contains_key(&app_id) {
            Ok(())
        } else {
            Err(StoreError::NotFound(Entity::App))
        }
    }

    fn insert_app(&mut self, name: &str, secret: &SecretString) -> Result<i64, StoreError> {
        if self.app_by_name(name).is_some() {
            return Err(StoreError::AppExists);
        }
        self.next_app_id += 1;
        let id = self.next_app_id;
        self.apps.insert(
            id,
            App {
                id,
                name: name.to_string(),
                secret: secret.clone(),
            },
        );
        Ok(id)
    }
}

impl MemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail with [`StoreError::Database`]
    /// (or succeed again when `false`).
    pub fn set_unavailable(&self, unavailable: bool) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.unavailable = unavailable;
        }
    }

    /// Number of stored apps.
    pub fn app_count(&self) -> usize {
        self.inner.lock().map(|i| i.apps.len()).unwrap_or_default()
    }

    /// Number of admin relations referencing `app_id`.
    pub fn admin_count(&self, app_id: i64) -> usize {
        self.inner
            .lock()
            .map(|i| i.admins.iter().filter(|(_, a)| *a == app_id).count())
            .unwrap_or_default()
    }

    /// Number of creator relations referencing `app_id`.
    pub fn creator_count(&self, app_id: i64) -> usize {
        self.inner
            .lock()
            .map(|i| i.creators.iter().filter(|(_, a)| *a == app_id).count())
            .unwrap_or_default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryStoreInner>, StoreError> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| StoreError::Database("memory store lock poisoned".to_string()))?;
        inner.check_available()?;
        Ok(inner)
    }
}

#[async_trait::async_trait]
impl CredentialStore for MemoryStore {
    async fn save_user(&self, email: &str, pass_hash: &[u8]) -> Result<i64, StoreError> {
        let mut inner = self.lock()?;
        if inner.user_by_email(email).is_some() {
            return Err(StoreError::UserExists);
        }
        inner.next_user_id += 1;
        let id = inner.next_user_id;
        inner.users.insert(
            id,
            User {
                id,
                email: email.to_string(),
                pass_hash: pass_hash.to_vec(),
            },
        );
        Ok(id)
    }

    async fn get_user(&self, email: &str) -> Result<User, StoreError> {
        let inner = self.lock()?;
        inner
            .user_by_email(email)
            .cloned()
            .ok_or(StoreError::NotFound(Entity::User))
    }

    async fn get_user_by_id(&self, id: i64) -> Result<User, StoreError> {
        let inner = self.lock()?;
        inner
            .users
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(Entity::User))
    }
}

#[async_trait::async_trait]
impl AppRegistry for MemoryStore {
    async fn get_app_by_name(&self, name: &str) -> Result<App, StoreError> {
        let inner = self.lock()?;
        inner
            .app_by_name(name)
            .cloned()
            .ok_or(StoreError::NotFound(Entity::App))
    }

    async fn get_app_by_id(&self, id: i64) -> Result<App, StoreError> {
        let inner = self.lock()?;
        inner
            .apps
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(Entity::App))
    }

    async fn create_app(&self, name: &str, secret: &SecretString) -> Result<i64, StoreError> {
        let mut inner = self.lock()?;
        inner.insert_app(name, secret)
    }

    async fn create_app_with_creator(
        &self,
        name: &str,
        secret: &SecretString,
        creator_id: i64,
    ) -> Result<i64, StoreError> {
        let mut inner = self.lock()?;
        // Validate before the first write so a failure leaves nothing behind.
        inner.require_user(creator_id)?;
        let app_id = inner.insert_app(name, secret)?;
        inner.creators.insert((creator_id, app_id));
        inner.admins.insert((creator_id, app_id));
        Ok(app_id)
    }

    async fn update_app(
        &self,
        id: i64,
        new_name: &str,
        new_secret: &SecretString,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner.require_app(id)?;
        if inner
            .app_by_name(new_name)
            .is_some_and(|other| other.id != id)
        {
            return Err(StoreError::AppExists);
        }
        if let Some(app) = inner.apps.get_mut(&id) {
            app.name = new_name.to_string();
            app.secret = new_secret.clone();
        }
        Ok(())
    }

    async fn delete_app(&self, id: i64) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner.require_app(id)?;
        inner.admins.retain(|(_, app_id)| *app_id != id);
        inner.creators.retain(|(_, app_id)| *app_id != id);
        inner.apps.remove(&id);
        Ok(())
    }
}

#[async_trait::async_trait]
impl PermissionLedger for MemoryStore {
    async fn set_admin(&self, user_id: i64, app_id: i64) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner.require_user(user_id)?;
        inner.require_app(app_id)?;
        inner.admins.insert((user_id, app_id));
        Ok(())
    }

    async fn del_admin(&self, user_id: i64, app_id: i64) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner.admins.remove(&(user_id, app_id));
        Ok(())
    }

    async fn is_admin(&self, user_id: i64, app_id: i64) -> Result<bool, StoreError> {
        let inner = self.lock()?;
        Ok(inner.admins.contains(&(user_id, app_id)))
    }

    async fn set_creator(&self, user_id: i64, app_id: i64) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner.require_user(user_id)?;
        inner.require_app(app_id)?;
        if inner
            .creators
            .iter()
            .any(|(u, a)| *a == app_id && *u != user_id)
        {
            return Err(StoreError::CreatorExists);
        }
        inner.creators.insert((user_id, app_id));
        Ok(())
    }

    async fn is_creator(&self, user_id: i64, app_id: i64) -> Result<bool, StoreError> {
        let inner = self.lock()?;
        Ok(inner.creators.contains(&(user_id, app_id)))
    }
}
