//! GetProfileHandler - Query handler for a user's value profile.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::profile::ValueProfile;
use crate::ports::ValueProfileRepository;

#[derive(Debug, Clone)]
pub struct GetProfileQuery {
    pub user_id: UserId,
}

pub struct GetProfileHandler {
    repository: Arc<dyn ValueProfileRepository>,
}

impl GetProfileHandler {
    pub fn new(repository: Arc<dyn ValueProfileRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetProfileQuery) -> Result<ValueProfile, DomainError> {
        self.repository
            .find_by_user(&query.user_id)
            .await?
            .ok_or_else(|| DomainError::profile_not_found(&query.user_id))
    }
}
