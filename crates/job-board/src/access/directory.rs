use async_trait::async_trait;

use super::domain::{Profile, Role, UserId};
use crate::backend::RepositoryError;

/// Read access to the `profiles` table plus the single admin-only write.
#[async_trait]
pub trait ProfileDirectory: Send + Sync {
    async fn fetch_profile(&self, id: &UserId) -> Result<Option<Profile>, RepositoryError>;
    async fn update_role(&self, id: &UserId, role: Role) -> Result<Profile, RepositoryError>;
}
