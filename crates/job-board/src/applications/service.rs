use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{
    Application, ApplicationId, ApplicationRequest, ApplicationStatus, StatusUpdate,
};
use super::repository::ApplicationRepository;
use super::workflow::{TransitionError, TransitionPolicy};
use crate::access::UserId;
use crate::backend::{new_record_id, RepositoryError};
use crate::jobs::{JobId, JobPosting, JobRepository};
use crate::notifications::{NewNotification, NotificationService, NotificationType};

/// Service composing the application store, job lookups, and notifications.
pub struct ApplicationService {
    applications: Arc<dyn ApplicationRepository>,
    jobs: Arc<dyn JobRepository>,
    notifications: Arc<NotificationService>,
    policy: TransitionPolicy,
}

impl ApplicationService {
    pub fn new(
        applications: Arc<dyn ApplicationRepository>,
        jobs: Arc<dyn JobRepository>,
        notifications: Arc<NotificationService>,
        policy: TransitionPolicy,
    ) -> Self {
        Self {
            applications,
            jobs,
            notifications,
            policy,
        }
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    /// Apply for an active posting. One application per seeker and job.
    pub async fn apply(
        &self,
        seeker: &UserId,
        request: ApplicationRequest,
    ) -> Result<Application, ApplicationServiceError> {
        let job = self
            .jobs
            .fetch_job(&request.job_id)
            .await?
            .ok_or(ApplicationServiceError::JobNotFound)?;
        if !job.is_active {
            return Err(ApplicationServiceError::JobClosed);
        }

        let already_applied = self
            .applications
            .applications_for_seeker(seeker)
            .await?
            .iter()
            .any(|existing| existing.job_id == job.id);
        if already_applied {
            return Err(ApplicationServiceError::Duplicate);
        }

        let status = if request.draft {
            ApplicationStatus::Draft
        } else {
            ApplicationStatus::Submitted
        };
        let now = Utc::now();
        let application = Application {
            id: ApplicationId(new_record_id()),
            job_id: job.id.clone(),
            job_seeker_id: seeker.clone(),
            status,
            notes: clean_notes(request.notes),
            created_at: now,
            updated_at: now,
        };

        let stored = match self.applications.insert_application(application).await {
            Ok(stored) => stored,
            Err(RepositoryError::Conflict) => return Err(ApplicationServiceError::Duplicate),
            Err(other) => return Err(other.into()),
        };
        info!(
            application_id = %stored.id,
            job_id = %job.id,
            status = stored.status.label(),
            "application created"
        );

        if stored.status == ApplicationStatus::Submitted {
            self.notify_recruiter(&job).await;
        }
        Ok(stored)
    }

    /// Move one of the seeker's own drafts to `submitted`.
    pub async fn submit_draft(
        &self,
        seeker: &UserId,
        id: &ApplicationId,
    ) -> Result<Application, ApplicationServiceError> {
        let mut application = self
            .applications
            .fetch_application(id)
            .await?
            .filter(|application| &application.job_seeker_id == seeker)
            .ok_or(ApplicationServiceError::NotFound)?;

        if application.status != ApplicationStatus::Draft {
            return Err(TransitionError {
                from: application.status,
                to: ApplicationStatus::Submitted,
            }
            .into());
        }

        application.status = ApplicationStatus::Submitted;
        application.updated_at = Utc::now();
        let stored = self.applications.update_application(application).await?;

        if let Some(job) = self.jobs.fetch_job(&stored.job_id).await? {
            self.notify_recruiter(&job).await;
        }
        Ok(stored)
    }

    /// Recruiter edit of status and notes on an application for one of their jobs.
    ///
    /// Drafts belong to the seeker until submitted and read as missing here.
    pub async fn update_status(
        &self,
        recruiter: &UserId,
        id: &ApplicationId,
        update: StatusUpdate,
    ) -> Result<Application, ApplicationServiceError> {
        let mut application = self
            .applications
            .fetch_application(id)
            .await?
            .filter(|application| application.status != ApplicationStatus::Draft)
            .ok_or(ApplicationServiceError::NotFound)?;
        let job = self.owned_job(recruiter, &application.job_id).await?;

        let previous = application.status;
        if let Some(next) = update.status {
            self.policy.check(previous, next)?;
            application.status = next;
        }
        if let Some(notes) = update.notes {
            application.notes = clean_notes(Some(notes));
        }
        application.updated_at = Utc::now();

        let stored = self.applications.update_application(application).await?;
        if stored.status != previous {
            info!(
                application_id = %stored.id,
                from = previous.label(),
                to = stored.status.label(),
                "application status changed"
            );
            self.notify_seeker(&job, &stored).await;
        }
        Ok(stored)
    }

    pub async fn for_job(
        &self,
        recruiter: &UserId,
        job_id: &JobId,
    ) -> Result<Vec<Application>, ApplicationServiceError> {
        let job = self.owned_job(recruiter, job_id).await?;
        let mut applications = self.applications.applications_for_job(&job.id).await?;
        applications.retain(|application| application.status != ApplicationStatus::Draft);
        Ok(applications)
    }

    pub async fn for_seeker(
        &self,
        seeker: &UserId,
    ) -> Result<Vec<Application>, ApplicationServiceError> {
        Ok(self.applications.applications_for_seeker(seeker).await?)
    }

    /// Jobs owned by someone else look exactly like missing ones.
    async fn owned_job(
        &self,
        recruiter: &UserId,
        job_id: &JobId,
    ) -> Result<JobPosting, ApplicationServiceError> {
        self.jobs
            .fetch_job(job_id)
            .await?
            .filter(|job| &job.recruiter_id == recruiter)
            .ok_or(ApplicationServiceError::JobNotFound)
    }

    async fn notify_recruiter(&self, job: &JobPosting) {
        let notification = NewNotification::new(
            job.recruiter_id.clone(),
            NotificationType::Info,
            "New application",
            format!("A new application was submitted for {}.", job.title),
        )
        .with_link(format!("/recruiter/jobs/{}/applications", job.id));
        self.notifications.deliver(notification).await;
    }

    async fn notify_seeker(&self, job: &JobPosting, application: &Application) {
        let kind = match application.status {
            ApplicationStatus::Accepted => NotificationType::Success,
            ApplicationStatus::Rejected => NotificationType::Warning,
            _ => NotificationType::Info,
        };
        let notification = NewNotification::new(
            application.job_seeker_id.clone(),
            kind,
            "Application update",
            format!(
                "Your application for {} is now {}.",
                job.title,
                application.status.display_label()
            ),
        )
        .with_link("/job-seeker/dashboard");
        self.notifications.deliver(notification).await;
    }
}

fn clean_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|notes| notes.trim().to_string())
        .filter(|notes| !notes.is_empty())
}

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error("job not found")]
    JobNotFound,
    #[error("job is no longer accepting applications")]
    JobClosed,
    #[error("application not found")]
    NotFound,
    #[error("you have already applied to this job")]
    Duplicate,
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
