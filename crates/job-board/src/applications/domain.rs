use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::access::UserId;
use crate::jobs::JobId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// High level status tracked throughout the hiring workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Draft,
    Submitted,
    Review,
    Interview,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 6] = [
        ApplicationStatus::Draft,
        ApplicationStatus::Submitted,
        ApplicationStatus::Review,
        ApplicationStatus::Interview,
        ApplicationStatus::Accepted,
        ApplicationStatus::Rejected,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Draft => "draft",
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::Review => "review",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Human readable label used in notifications.
    pub const fn display_label(self) -> &'static str {
        match self {
            ApplicationStatus::Draft => "Draft",
            ApplicationStatus::Submitted => "Submitted",
            ApplicationStatus::Review => "Under Review",
            ApplicationStatus::Interview => "Interview",
            ApplicationStatus::Accepted => "Accepted",
            ApplicationStatus::Rejected => "Rejected",
        }
    }

    /// Successors in the forward-only workflow.
    pub const fn forward_transitions(self) -> &'static [ApplicationStatus] {
        match self {
            ApplicationStatus::Draft => &[ApplicationStatus::Submitted],
            ApplicationStatus::Submitted => {
                &[ApplicationStatus::Review, ApplicationStatus::Rejected]
            }
            ApplicationStatus::Review => &[
                ApplicationStatus::Interview,
                ApplicationStatus::Accepted,
                ApplicationStatus::Rejected,
            ],
            ApplicationStatus::Interview => {
                &[ApplicationStatus::Accepted, ApplicationStatus::Rejected]
            }
            ApplicationStatus::Accepted | ApplicationStatus::Rejected => &[],
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, ApplicationStatus::Accepted | ApplicationStatus::Rejected)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Row of the `applications` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub job_seeker_id: UserId,
    pub status: ApplicationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Job seeker request to apply for a posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRequest {
    pub job_id: JobId,
    #[serde(default)]
    pub notes: Option<String>,
    /// Keep the application as a draft instead of submitting it.
    #[serde(default)]
    pub draft: bool,
}

/// Recruiter edit of an application; either field may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    #[serde(default)]
    pub status: Option<ApplicationStatus>,
    #[serde(default)]
    pub notes: Option<String>,
}
