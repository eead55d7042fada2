use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::access::UserId;
use crate::applications::{ApplicationService, TransitionPolicy};
use crate::backend::{InMemoryBackend, RepositoryError};
use crate::companies::CompanyId;
use crate::jobs::{JobId, JobPosting};
use crate::notifications::{
    NewNotification, NotificationId, NotificationProcedure, NotificationService,
};

pub(super) const RECRUITER: &str = "recruiter-1";
pub(super) const OTHER_RECRUITER: &str = "recruiter-2";
pub(super) const SEEKER: &str = "seeker-1";

pub(super) fn user(id: &str) -> UserId {
    UserId(id.to_string())
}

pub(super) fn job(id: &str, recruiter: &str, is_active: bool) -> JobPosting {
    JobPosting {
        id: JobId(id.to_string()),
        recruiter_id: user(recruiter),
        company_id: CompanyId(format!("company-{recruiter}")),
        title: format!("Platform Engineer {id}"),
        description: "Keep the lights on.".to_string(),
        location: Some("Remote".to_string()),
        is_active,
        created_at: Utc::now() - Duration::days(1),
    }
}

/// Backend seeded with one open posting (`job-open`) and one closed posting (`job-closed`).
pub(super) fn seeded_backend() -> Arc<InMemoryBackend> {
    let backend = Arc::new(InMemoryBackend::default());
    backend
        .seed_job(job("job-open", RECRUITER, true))
        .expect("seed open job");
    backend
        .seed_job(job("job-closed", RECRUITER, false))
        .expect("seed closed job");
    backend
}

pub(super) fn build_service(
    policy: TransitionPolicy,
) -> (ApplicationService, Arc<InMemoryBackend>) {
    let backend = seeded_backend();
    let notifications = Arc::new(NotificationService::new(backend.clone()));
    let service = ApplicationService::new(backend.clone(), backend.clone(), notifications, policy);
    (service, backend)
}

pub(super) fn notifications_for(
    backend: &InMemoryBackend,
    recipient: &str,
) -> Vec<NewNotification> {
    backend
        .notifications()
        .expect("notifications readable")
        .into_iter()
        .map(|(_, notification)| notification)
        .filter(|notification| notification.user_id.0 == recipient)
        .collect()
}

/// Procedure that always fails, as when the stored function is missing.
pub(super) struct OfflineProcedure;

#[async_trait]
impl NotificationProcedure for OfflineProcedure {
    async fn create_notification(
        &self,
        _notification: &NewNotification,
    ) -> Result<NotificationId, RepositoryError> {
        Err(RepositoryError::Unavailable(
            "function create_notification does not exist".to_string(),
        ))
    }
}
