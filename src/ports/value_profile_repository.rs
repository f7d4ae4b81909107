//! ValueProfileRepository port for profile persistence.

use async_trait::async_trait;

use crate::domain::{
    foundation::{DomainError, UserId},
    profile::ValueProfile,
};

/// Repository for value profiles, keyed by owning user.
#[async_trait]
pub trait ValueProfileRepository: Send + Sync {
    /// Insert or replace the profile for its user.
    async fn save(&self, profile: &ValueProfile) -> Result<(), DomainError>;

    /// Find profile by user ID
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<ValueProfile>, DomainError>;

    /// Delete the user's profile. Returns false if there was none.
    async fn delete_by_user(&self, user_id: &UserId) -> Result<bool, DomainError>;

    /// Up to `limit` user ids with a stored profile, in ascending order.
    async fn list_user_ids(&self, limit: usize) -> Result<Vec<UserId>, DomainError>;
}
