use std::sync::Arc;

use crate::auth::password::hash_password_blocking;
use crate::auth::service::AuthError;
use crate::models::{ProfileUpdate, User};
use crate::query::users::{update_query, ProfileChanges};
use crate::store::{StoreError, UserStore};

/// Reads, edits and removes the caller's own profile.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    hash_cost: u32,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, hash_cost: u32) -> Self {
        Self { store, hash_cost }
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<User, StoreError> {
        self.store.get_user(user_id).await
    }

    /// Applies a sparse profile update; a new password is re-hashed first.
    /// `Ok(None)` means nothing was set.
    pub async fn update_profile(
        &self,
        user_id: &str,
        update: ProfileUpdate,
    ) -> Result<Option<User>, AuthError> {
        let password_hash = match update.password {
            Some(password) => Some(hash_password_blocking(password, self.hash_cost).await?),
            None => None,
        };

        let changes = ProfileChanges {
            name: update.name,
            email: update.email,
            password_hash,
        };

        match update_query(user_id, changes) {
            Some(query) => Ok(Some(self.store.update_user(&query).await?)),
            None => Ok(None),
        }
    }

    pub async fn delete_profile(&self, user_id: &str) -> Result<(), StoreError> {
        self.store.delete_user(user_id).await?;
        log::info!("deleted user {}", user_id);
        Ok(())
    }
}
