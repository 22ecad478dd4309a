use async_trait::async_trait;

use crate::domain::errors::DomainResult;

/// Supplies the verified user identifier before a run starts.
///
/// The core treats the identifier as an opaque string.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verified_user(&self) -> DomainResult<String>;
}
