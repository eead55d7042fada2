use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::gate::RouteNamespace;
use crate::backend::null_as_default;

/// Identifier issued by the auth service for every account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Account role chosen at signup. Only an admin may change it afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Recruiter,
    #[serde(rename = "jobseeker")]
    JobSeeker,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Recruiter => "recruiter",
            Role::JobSeeker => "jobseeker",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "recruiter" => Some(Role::Recruiter),
            "jobseeker" | "job_seeker" | "job-seeker" => Some(Role::JobSeeker),
            _ => None,
        }
    }

    /// Route namespace owned by the role.
    pub const fn namespace(self) -> RouteNamespace {
        match self {
            Role::Admin => RouteNamespace::Admin,
            Role::Recruiter => RouteNamespace::Recruiter,
            Role::JobSeeker => RouteNamespace::JobSeeker,
        }
    }

    /// Landing page a user of this role is sent to when they stray.
    pub const fn home(self) -> &'static str {
        match self {
            Role::Admin => "/admin/dashboard",
            Role::Recruiter => "/recruiter/dashboard",
            Role::JobSeeker => "/job-seeker/dashboard",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Row of the `profiles` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub role: Role,
    #[serde(default, deserialize_with = "null_as_default")]
    pub full_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_round_trip_through_backend_labels() {
        let decoded: Role = serde_json::from_str("\"jobseeker\"").expect("known role");
        assert_eq!(decoded, Role::JobSeeker);
        assert_eq!(
            serde_json::to_string(&Role::Recruiter).expect("serializes"),
            "\"recruiter\""
        );
        assert!(serde_json::from_str::<Role>("\"owner\"").is_err());
    }

    #[test]
    fn parse_accepts_route_spelling() {
        assert_eq!(Role::parse("Job-Seeker"), Some(Role::JobSeeker));
        assert_eq!(Role::parse(" admin "), Some(Role::Admin));
        assert_eq!(Role::parse("guest"), None);
    }

    #[test]
    fn every_role_lands_inside_its_own_namespace() {
        for role in [Role::Admin, Role::Recruiter, Role::JobSeeker] {
            assert_eq!(RouteNamespace::from_path(role.home()), Some(role.namespace()));
        }
    }
}
