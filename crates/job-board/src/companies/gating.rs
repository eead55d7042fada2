use serde::Serialize;

use super::domain::{Company, CompanyStatus};

/// Both required fields are filled in.
pub fn is_company_profile_complete(company: Option<&Company>) -> bool {
    company.is_some_and(|company| !company.name.is_empty() && !company.license_url.is_empty())
}

/// An admin has signed off: the flag and the status must agree.
pub fn is_company_profile_approved(company: Option<&Company>) -> bool {
    company.is_some_and(|company| company.is_approved && company.status == CompanyStatus::Approved)
}

pub fn can_recruiter_access_features(company: Option<&Company>) -> bool {
    is_company_profile_complete(company) && is_company_profile_approved(company)
}

/// What the recruiter dashboard should nudge the user towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessPrompt {
    CompleteProfile,
    AwaitingApproval,
    Rejected,
}

impl AccessPrompt {
    pub const fn message(self) -> &'static str {
        match self {
            AccessPrompt::CompleteProfile => {
                "Complete your company profile (name and business license) to start posting jobs."
            }
            AccessPrompt::AwaitingApproval => {
                "Your company profile is awaiting admin approval."
            }
            AccessPrompt::Rejected => {
                "Your company profile was rejected. Update your details to request another review."
            }
        }
    }
}

/// Snapshot of the gate for one company record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecruiterAccess {
    pub profile_complete: bool,
    pub profile_approved: bool,
    pub can_access_features: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<AccessPrompt>,
}

impl RecruiterAccess {
    pub fn evaluate(company: Option<&Company>) -> Self {
        let profile_complete = is_company_profile_complete(company);
        let profile_approved = is_company_profile_approved(company);
        let can_access_features = profile_complete && profile_approved;

        let prompt = if !profile_complete {
            Some(AccessPrompt::CompleteProfile)
        } else if profile_approved {
            None
        } else if company.is_some_and(|company| company.status == CompanyStatus::Rejected) {
            Some(AccessPrompt::Rejected)
        } else {
            Some(AccessPrompt::AwaitingApproval)
        };

        Self {
            profile_complete,
            profile_approved,
            can_access_features,
            prompt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::UserId;
    use crate::companies::domain::CompanyId;
    use chrono::Utc;

    fn company(name: &str, license_url: &str, is_approved: bool, status: CompanyStatus) -> Company {
        let now = Utc::now();
        Company {
            id: CompanyId("co-1".to_string()),
            recruiter_id: UserId("rec-1".to_string()),
            name: name.to_string(),
            license_url: license_url.to_string(),
            is_approved,
            status,
            description: None,
            website: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn missing_company_denies_everything() {
        assert!(!is_company_profile_complete(None));
        assert!(!is_company_profile_approved(None));
        assert!(!can_recruiter_access_features(None));

        let access = RecruiterAccess::evaluate(None);
        assert_eq!(access.prompt, Some(AccessPrompt::CompleteProfile));
    }

    #[test]
    fn approved_company_without_license_is_not_complete() {
        let acme = company("Acme", "", true, CompanyStatus::Approved);
        assert!(!is_company_profile_complete(Some(&acme)));
        assert!(is_company_profile_approved(Some(&acme)));
        assert!(!can_recruiter_access_features(Some(&acme)));
    }

    #[test]
    fn access_requires_every_condition() {
        let names = ["", "Acme"];
        let licenses = ["", "https://files.example.test/license.pdf"];
        let flags = [false, true];
        let statuses = [
            CompanyStatus::Pending,
            CompanyStatus::Approved,
            CompanyStatus::Rejected,
        ];

        for name in names {
            for license in licenses {
                for flag in flags {
                    for status in statuses {
                        let record = company(name, license, flag, status);
                        let expected = !name.is_empty()
                            && !license.is_empty()
                            && flag
                            && status == CompanyStatus::Approved;
                        assert_eq!(
                            can_recruiter_access_features(Some(&record)),
                            expected,
                            "name={name:?} license={license:?} approved={flag} status={status:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn flag_and_status_must_agree() {
        let flagged_only = company("Acme", "https://l", true, CompanyStatus::Pending);
        let status_only = company("Acme", "https://l", false, CompanyStatus::Approved);
        assert!(!is_company_profile_approved(Some(&flagged_only)));
        assert!(!is_company_profile_approved(Some(&status_only)));
    }

    #[test]
    fn prompt_tracks_review_state() {
        let pending = company("Acme", "https://l", false, CompanyStatus::Pending);
        let rejected = company("Acme", "https://l", false, CompanyStatus::Rejected);
        let approved = company("Acme", "https://l", true, CompanyStatus::Approved);

        assert_eq!(
            RecruiterAccess::evaluate(Some(&pending)).prompt,
            Some(AccessPrompt::AwaitingApproval)
        );
        assert_eq!(
            RecruiterAccess::evaluate(Some(&rejected)).prompt,
            Some(AccessPrompt::Rejected)
        );
        let access = RecruiterAccess::evaluate(Some(&approved));
        assert!(access.can_access_features);
        assert_eq!(access.prompt, None);
    }
}
