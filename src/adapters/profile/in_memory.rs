//! In-memory adapter for ValueProfileRepository.
//!
//! Used when no database is configured and in tests. Profiles live for the
//! life of the process. Saves follow the same version check as the
//! Postgres adapter.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::profile::ValueProfile;
use crate::ports::ValueProfileRepository;

#[derive(Default)]
pub struct InMemoryValueProfileRepository {
    profiles: RwLock<HashMap<UserId, ValueProfile>>,
}

impl InMemoryValueProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored profiles.
    pub async fn len(&self) -> usize {
        self.profiles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.profiles.read().await.is_empty()
    }
}

#[async_trait]
impl ValueProfileRepository for InMemoryValueProfileRepository {
    async fn save(&self, profile: &ValueProfile) -> Result<(), DomainError> {
        let mut profiles = self.profiles.write().await;

        if let Some(stored) = profiles.get(profile.user_id()) {
            if stored.version() + 1 != profile.version() {
                return Err(DomainError::conflict(
                    "Value profile was modified by another request",
                )
                .with_detail("user_id", profile.user_id().as_str())
                .with_detail("version", profile.version().to_string()));
            }
        }

        profiles.insert(profile.user_id().clone(), profile.clone());
        Ok(())
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<ValueProfile>, DomainError> {
        Ok(self.profiles.read().await.get(user_id).cloned())
    }

    async fn delete_by_user(&self, user_id: &UserId) -> Result<bool, DomainError> {
        Ok(self.profiles.write().await.remove(user_id).is_some())
    }

    async fn list_user_ids(&self, limit: usize) -> Result<Vec<UserId>, DomainError> {
        let mut ids: Vec<UserId> = self.profiles.read().await.keys().cloned().collect();
        ids.sort();
        ids.truncate(limit);
        Ok(ids)
    }
}
