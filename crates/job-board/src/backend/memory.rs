use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use super::{new_record_id, RepositoryError};
use crate::access::{Profile, ProfileDirectory, Role, UserId};
use crate::applications::{Application, ApplicationId, ApplicationRepository};
use crate::companies::{Company, CompanyId, CompanyRepository, CompanyStatus};
use crate::jobs::{JobId, JobPosting, JobRepository};
use crate::notifications::{NewNotification, NotificationId, NotificationProcedure};

/// Notifications kept by the in-memory store before the oldest are dropped.
pub const DEFAULT_NOTIFICATION_HISTORY: usize = 1_000;

/// Process-local stand-in for the hosted database, meant for tests, demos and local runs.
///
/// Tables grow with use and vanish on restart. Only the notification log is bounded.
#[derive(Clone)]
pub struct InMemoryBackend {
    profiles: Arc<Mutex<HashMap<UserId, Profile>>>,
    companies: Arc<Mutex<HashMap<CompanyId, Company>>>,
    jobs: Arc<Mutex<HashMap<JobId, JobPosting>>>,
    applications: Arc<Mutex<HashMap<ApplicationId, Application>>>,
    notifications: Arc<Mutex<VecDeque<(NotificationId, NewNotification)>>>,
    notification_history: usize,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::with_notification_history(DEFAULT_NOTIFICATION_HISTORY)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("in-memory store poisoned".to_string()))
}

impl InMemoryBackend {
    pub fn with_notification_history(limit: usize) -> Self {
        Self {
            profiles: Arc::default(),
            companies: Arc::default(),
            jobs: Arc::default(),
            applications: Arc::default(),
            notifications: Arc::default(),
            notification_history: limit.max(1),
        }
    }

    /// Profiles are created by the auth service at signup; this plays that part.
    pub fn seed_profile(&self, profile: Profile) -> Result<(), RepositoryError> {
        lock(&self.profiles)?.insert(profile.id.clone(), profile);
        Ok(())
    }

    pub fn seed_company(&self, company: Company) -> Result<(), RepositoryError> {
        lock(&self.companies)?.insert(company.id.clone(), company);
        Ok(())
    }

    pub fn seed_job(&self, job: JobPosting) -> Result<(), RepositoryError> {
        lock(&self.jobs)?.insert(job.id.clone(), job);
        Ok(())
    }

    /// Retained notifications handed to the procedure, oldest first.
    pub fn notifications(&self) -> Result<Vec<(NotificationId, NewNotification)>, RepositoryError> {
        Ok(lock(&self.notifications)?.iter().cloned().collect())
    }
}

#[async_trait]
impl ProfileDirectory for InMemoryBackend {
    async fn fetch_profile(&self, id: &UserId) -> Result<Option<Profile>, RepositoryError> {
        Ok(lock(&self.profiles)?.get(id).cloned())
    }

    async fn update_role(&self, id: &UserId, role: Role) -> Result<Profile, RepositoryError> {
        let mut guard = lock(&self.profiles)?;
        let profile = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        profile.role = role;
        Ok(profile.clone())
    }
}

#[async_trait]
impl CompanyRepository for InMemoryBackend {
    async fn company_for_recruiter(
        &self,
        recruiter: &UserId,
    ) -> Result<Option<Company>, RepositoryError> {
        Ok(lock(&self.companies)?
            .values()
            .find(|company| &company.recruiter_id == recruiter)
            .cloned())
    }

    async fn fetch_company(&self, id: &CompanyId) -> Result<Option<Company>, RepositoryError> {
        Ok(lock(&self.companies)?.get(id).cloned())
    }

    async fn insert_company(&self, company: Company) -> Result<Company, RepositoryError> {
        let mut guard = lock(&self.companies)?;
        let taken = guard.contains_key(&company.id)
            || guard
                .values()
                .any(|existing| existing.recruiter_id == company.recruiter_id);
        if taken {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(company.id.clone(), company.clone());
        Ok(company)
    }

    async fn update_company(&self, company: Company) -> Result<Company, RepositoryError> {
        let mut guard = lock(&self.companies)?;
        match guard.get_mut(&company.id) {
            Some(slot) => {
                *slot = company.clone();
                Ok(company)
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn list_companies(
        &self,
        status: Option<CompanyStatus>,
    ) -> Result<Vec<Company>, RepositoryError> {
        let mut companies: Vec<Company> = lock(&self.companies)?
            .values()
            .filter(|company| status.map_or(true, |status| company.status == status))
            .cloned()
            .collect();
        companies.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(companies)
    }
}

#[async_trait]
impl JobRepository for InMemoryBackend {
    async fn insert_job(&self, job: JobPosting) -> Result<JobPosting, RepositoryError> {
        let mut guard = lock(&self.jobs)?;
        if guard.contains_key(&job.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(job.id.clone(), job.clone());
        Ok(job)
    }

    async fn fetch_job(&self, id: &JobId) -> Result<Option<JobPosting>, RepositoryError> {
        Ok(lock(&self.jobs)?.get(id).cloned())
    }

    async fn jobs_for_recruiter(
        &self,
        recruiter: &UserId,
    ) -> Result<Vec<JobPosting>, RepositoryError> {
        let mut jobs: Vec<JobPosting> = lock(&self.jobs)?
            .values()
            .filter(|job| &job.recruiter_id == recruiter)
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }
}

#[async_trait]
impl ApplicationRepository for InMemoryBackend {
    async fn insert_application(
        &self,
        application: Application,
    ) -> Result<Application, RepositoryError> {
        let mut guard = lock(&self.applications)?;
        let duplicate = guard.contains_key(&application.id)
            || guard.values().any(|existing| {
                existing.job_id == application.job_id
                    && existing.job_seeker_id == application.job_seeker_id
            });
        if duplicate {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    async fn fetch_application(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<Application>, RepositoryError> {
        Ok(lock(&self.applications)?.get(id).cloned())
    }

    async fn update_application(
        &self,
        application: Application,
    ) -> Result<Application, RepositoryError> {
        let mut guard = lock(&self.applications)?;
        match guard.get_mut(&application.id) {
            Some(slot) => {
                *slot = application.clone();
                Ok(application)
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn applications_for_job(
        &self,
        job: &JobId,
    ) -> Result<Vec<Application>, RepositoryError> {
        let mut applications: Vec<Application> = lock(&self.applications)?
            .values()
            .filter(|application| &application.job_id == job)
            .cloned()
            .collect();
        applications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(applications)
    }

    async fn applications_for_seeker(
        &self,
        seeker: &UserId,
    ) -> Result<Vec<Application>, RepositoryError> {
        let mut applications: Vec<Application> = lock(&self.applications)?
            .values()
            .filter(|application| &application.job_seeker_id == seeker)
            .cloned()
            .collect();
        applications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(applications)
    }
}

#[async_trait]
impl NotificationProcedure for InMemoryBackend {
    async fn create_notification(
        &self,
        notification: &NewNotification,
    ) -> Result<NotificationId, RepositoryError> {
        let id = NotificationId(new_record_id());
        let mut log = lock(&self.notifications)?;
        while log.len() >= self.notification_history {
            log.pop_front();
        }
        log.push_back((id.clone(), notification.clone()));
        Ok(id)
    }
}
