use async_trait::async_trait;

use super::domain::{JobId, JobPosting};
use crate::access::UserId;
use crate::backend::RepositoryError;

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn insert_job(&self, job: JobPosting) -> Result<JobPosting, RepositoryError>;
    async fn fetch_job(&self, id: &JobId) -> Result<Option<JobPosting>, RepositoryError>;
    async fn jobs_for_recruiter(&self, recruiter: &UserId)
        -> Result<Vec<JobPosting>, RepositoryError>;
}
