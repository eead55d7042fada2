//! Recruiter company profiles and the approval gate in front of job posting features.

pub mod domain;
pub mod gating;
pub mod repository;
pub mod service;

pub use domain::{Company, CompanyDraft, CompanyId, CompanyStatus};
pub use gating::{
    can_recruiter_access_features, is_company_profile_approved, is_company_profile_complete,
    AccessPrompt, RecruiterAccess,
};
pub use repository::CompanyRepository;
pub use service::{CompanyService, CompanyServiceError};
