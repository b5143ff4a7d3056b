//! Current-user session.
//!
//! `Session` is an explicit context handed to whatever needs the signed-in
//! user. Cloning shares the same state. It is loaded from and persisted to a
//! `SessionStore` through explicit `load` / `set_user` / `clear` calls.

mod store;

pub use store::SessionStore;

use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;
use tracing::info;

use crate::common::{UserId, UserProfile};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored session is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct Session {
    store: Option<Arc<SessionStore>>,
    user: Arc<RwLock<Option<UserProfile>>>,
}

impl Session {
    /// A session persisted to `store`. Starts empty until `load` is called.
    pub fn new(store: SessionStore) -> Self {
        Self {
            store: Some(Arc::new(store)),
            user: Arc::new(RwLock::new(None)),
        }
    }

    /// A session that is never persisted.
    pub fn in_memory() -> Self {
        Self {
            store: None,
            user: Arc::new(RwLock::new(None)),
        }
    }

    /// Load the stored user into the session.
    pub fn load(&self) -> Result<Option<UserProfile>, SessionError> {
        let user = match &self.store {
            Some(store) => store.load()?,
            None => self.current(),
        };
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = user.clone();
        Ok(user)
    }

    /// Persist `user`, then make it current.
    pub fn set_user(&self, user: UserProfile) -> Result<(), SessionError> {
        if let Some(store) = &self.store {
            store.save(&user)?;
        }
        info!(user_id = %user.id, "Signed in");
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = Some(user);
        Ok(())
    }

    /// Remove the persisted user, then clear the session.
    pub fn clear(&self) -> Result<(), SessionError> {
        if let Some(store) = &self.store {
            store.remove()?;
        }
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }

    pub fn current(&self) -> Option<UserProfile> {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|user| user.id.clone())
    }

    pub fn is_signed_in(&self) -> bool {
        self.user_id().is_some()
    }
}
