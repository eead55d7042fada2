use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{JobDraft, JobId, JobPosting};
use super::repository::JobRepository;
use crate::access::UserId;
use crate::backend::{new_record_id, RepositoryError};
use crate::companies::{can_recruiter_access_features, CompanyRepository};

pub struct JobService {
    jobs: Arc<dyn JobRepository>,
    companies: Arc<dyn CompanyRepository>,
}

impl JobService {
    pub fn new(jobs: Arc<dyn JobRepository>, companies: Arc<dyn CompanyRepository>) -> Self {
        Self { jobs, companies }
    }

    /// Publish a posting under the recruiter's company. The gate is re-checked here so callers
    /// outside the HTTP layer cannot skip it.
    pub async fn create(
        &self,
        recruiter: &UserId,
        draft: JobDraft,
    ) -> Result<JobPosting, JobServiceError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(JobServiceError::Validation("title is required".to_string()));
        }

        let company = self.companies.company_for_recruiter(recruiter).await?;
        let company = match company {
            Some(company) if can_recruiter_access_features(Some(&company)) => company,
            _ => return Err(JobServiceError::AccessDenied),
        };

        let job = JobPosting {
            id: JobId(new_record_id()),
            recruiter_id: recruiter.clone(),
            company_id: company.id,
            title: title.to_string(),
            description: draft.description.trim().to_string(),
            location: draft
                .location
                .map(|location| location.trim().to_string())
                .filter(|location| !location.is_empty()),
            is_active: true,
            created_at: Utc::now(),
        };
        let stored = self.jobs.insert_job(job).await?;
        info!(job_id = %stored.id, %recruiter, "job posted");
        Ok(stored)
    }

    pub async fn list_for_recruiter(
        &self,
        recruiter: &UserId,
    ) -> Result<Vec<JobPosting>, JobServiceError> {
        Ok(self.jobs.jobs_for_recruiter(recruiter).await?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JobServiceError {
    #[error("company profile must be complete and approved before posting jobs")]
    AccessDenied,
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
