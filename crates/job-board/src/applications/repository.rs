use async_trait::async_trait;

use super::domain::{Application, ApplicationId};
use crate::access::UserId;
use crate::backend::RepositoryError;
use crate::jobs::JobId;

/// Storage abstraction over the `applications` table.
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Fails with [`RepositoryError::Conflict`] when the seeker already applied to the job.
    async fn insert_application(
        &self,
        application: Application,
    ) -> Result<Application, RepositoryError>;
    async fn fetch_application(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<Application>, RepositoryError>;
    async fn update_application(
        &self,
        application: Application,
    ) -> Result<Application, RepositoryError>;
    async fn applications_for_job(&self, job: &JobId)
        -> Result<Vec<Application>, RepositoryError>;
    async fn applications_for_seeker(
        &self,
        seeker: &UserId,
    ) -> Result<Vec<Application>, RepositoryError>;
}
