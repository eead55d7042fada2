use std::sync::Arc;

use crate::access::{ProfileDirectory, SessionResolver, SessionVerifier};
use crate::applications::{ApplicationService, TransitionPolicy};
use crate::backend::Backend;
use crate::companies::CompanyService;
use crate::jobs::JobService;
use crate::notifications::NotificationService;

/// Services shared by every portal handler.
#[derive(Clone)]
pub struct PortalState {
    pub sessions: Arc<SessionResolver>,
    pub profiles: Arc<dyn ProfileDirectory>,
    pub companies: Arc<CompanyService>,
    pub jobs: Arc<JobService>,
    pub applications: Arc<ApplicationService>,
    pub notifications: Arc<NotificationService>,
}

impl PortalState {
    /// Wire every service against one backend.
    pub fn from_backend<B: Backend>(
        backend: Arc<B>,
        verifier: SessionVerifier,
        policy: TransitionPolicy,
    ) -> Self {
        let notifications = Arc::new(NotificationService::new(backend.clone()));
        let companies = Arc::new(CompanyService::new(backend.clone(), notifications.clone()));
        let jobs = Arc::new(JobService::new(backend.clone(), backend.clone()));
        let applications = Arc::new(ApplicationService::new(
            backend.clone(),
            backend.clone(),
            notifications.clone(),
            policy,
        ));
        let sessions = Arc::new(SessionResolver::new(verifier, backend.clone()));

        Self {
            sessions,
            profiles: backend,
            companies,
            jobs,
            applications,
            notifications,
        }
    }
}
