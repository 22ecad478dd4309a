//! Fixed identity provider.

use async_trait::async_trait;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::IdentityProvider;

/// Identity taken from configuration or the command line.
#[derive(Debug, Clone)]
pub struct StaticIdentity {
    user_id: String,
}

impl StaticIdentity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn verified_user(&self) -> DomainResult<String> {
        let user_id = self.user_id.trim();
        if user_id.is_empty() {
            return Err(DomainError::Unauthenticated("user id is empty".to_string()));
        }
        Ok(user_id.to_string())
    }
}
