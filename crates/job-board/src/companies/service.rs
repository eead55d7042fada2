use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{Company, CompanyDraft, CompanyId, CompanyStatus};
use super::gating::RecruiterAccess;
use super::repository::CompanyRepository;
use crate::access::UserId;
use crate::backend::{new_record_id, RepositoryError};
use crate::notifications::{NewNotification, NotificationService, NotificationType};

/// Company profile editing for recruiters and review decisions for admins.
pub struct CompanyService {
    companies: Arc<dyn CompanyRepository>,
    notifications: Arc<NotificationService>,
}

impl CompanyService {
    pub fn new(
        companies: Arc<dyn CompanyRepository>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            companies,
            notifications,
        }
    }

    pub async fn company_for(
        &self,
        recruiter: &UserId,
    ) -> Result<Option<Company>, CompanyServiceError> {
        Ok(self.companies.company_for_recruiter(recruiter).await?)
    }

    /// Evaluate the gate against the recruiter's current company snapshot.
    pub async fn access_for(
        &self,
        recruiter: &UserId,
    ) -> Result<(Option<Company>, RecruiterAccess), CompanyServiceError> {
        let company = self.companies.company_for_recruiter(recruiter).await?;
        let access = RecruiterAccess::evaluate(company.as_ref());
        Ok((company, access))
    }

    /// Create or update the recruiter's company.
    ///
    /// Editing the name or license of a reviewed company puts it back in the review queue.
    pub async fn save_profile(
        &self,
        recruiter: &UserId,
        draft: CompanyDraft,
    ) -> Result<Company, CompanyServiceError> {
        let draft = normalize_draft(draft)?;
        let now = Utc::now();

        match self.companies.company_for_recruiter(recruiter).await? {
            None => {
                let company = Company {
                    id: CompanyId(new_record_id()),
                    recruiter_id: recruiter.clone(),
                    name: draft.name,
                    license_url: draft.license_url,
                    is_approved: false,
                    status: CompanyStatus::Pending,
                    description: draft.description,
                    website: draft.website,
                    created_at: now,
                    updated_at: now,
                };
                let stored = self.companies.insert_company(company).await?;
                info!(company_id = %stored.id, %recruiter, "company profile created");
                Ok(stored)
            }
            Some(mut company) => {
                let identity_changed =
                    company.name != draft.name || company.license_url != draft.license_url;
                if identity_changed && company.status != CompanyStatus::Pending {
                    company.status = CompanyStatus::Pending;
                    company.is_approved = false;
                    info!(company_id = %company.id, "company identity changed, review reopened");
                }
                company.name = draft.name;
                company.license_url = draft.license_url;
                company.description = draft.description;
                company.website = draft.website;
                company.updated_at = now;
                Ok(self.companies.update_company(company).await?)
            }
        }
    }

    pub async fn list(
        &self,
        status: Option<CompanyStatus>,
    ) -> Result<Vec<Company>, CompanyServiceError> {
        Ok(self.companies.list_companies(status).await?)
    }

    pub async fn approve(&self, id: &CompanyId) -> Result<Company, CompanyServiceError> {
        let company = self.decide(id, CompanyStatus::Approved, true).await?;
        self.notifications
            .deliver(
                NewNotification::new(
                    company.recruiter_id.clone(),
                    NotificationType::Success,
                    "Company approved",
                    format!("{} can now post jobs.", display_name(&company)),
                )
                .with_link("/recruiter/dashboard"),
            )
            .await;
        Ok(company)
    }

    pub async fn reject(
        &self,
        id: &CompanyId,
        reason: Option<String>,
    ) -> Result<Company, CompanyServiceError> {
        let company = self.decide(id, CompanyStatus::Rejected, false).await?;
        let mut message = format!("{} was not approved.", display_name(&company));
        if let Some(reason) = reason.filter(|reason| !reason.trim().is_empty()) {
            message.push_str(" Reason: ");
            message.push_str(reason.trim());
        }
        self.notifications
            .deliver(
                NewNotification::new(
                    company.recruiter_id.clone(),
                    NotificationType::Warning,
                    "Company review",
                    message,
                )
                .with_link("/recruiter/company"),
            )
            .await;
        Ok(company)
    }

    async fn decide(
        &self,
        id: &CompanyId,
        status: CompanyStatus,
        is_approved: bool,
    ) -> Result<Company, CompanyServiceError> {
        let mut company = self
            .companies
            .fetch_company(id)
            .await?
            .ok_or(CompanyServiceError::NotFound)?;
        company.status = status;
        company.is_approved = is_approved;
        company.updated_at = Utc::now();
        let stored = self.companies.update_company(company).await?;
        info!(company_id = %stored.id, status = status.label(), "company reviewed");
        Ok(stored)
    }
}

fn display_name(company: &Company) -> &str {
    if company.name.is_empty() {
        "Your company"
    } else {
        &company.name
    }
}

fn normalize_draft(draft: CompanyDraft) -> Result<CompanyDraft, CompanyServiceError> {
    let optional = |value: Option<String>| {
        value
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    };

    let draft = CompanyDraft {
        name: draft.name.trim().to_string(),
        license_url: draft.license_url.trim().to_string(),
        description: optional(draft.description),
        website: optional(draft.website),
    };

    if !draft.license_url.is_empty() && !is_http_url(&draft.license_url) {
        return Err(CompanyServiceError::Validation(
            "license_url must be an http(s) URL".to_string(),
        ));
    }
    if draft.website.as_deref().is_some_and(|site| !is_http_url(site)) {
        return Err(CompanyServiceError::Validation(
            "website must be an http(s) URL".to_string(),
        ));
    }

    Ok(draft)
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("https://") || value.starts_with("http://")
}

#[derive(Debug, thiserror::Error)]
pub enum CompanyServiceError {
    #[error("company not found")]
    NotFound,
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
