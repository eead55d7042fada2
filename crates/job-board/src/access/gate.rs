use serde::Serialize;

use super::domain::{Profile, Role};

/// Where anonymous visitors are sent.
pub const LOGIN_ROUTE: &str = "/login";

/// Role-prefixed page namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteNamespace {
    Admin,
    Recruiter,
    JobSeeker,
}

impl RouteNamespace {
    pub const fn prefix(self) -> &'static str {
        match self {
            RouteNamespace::Admin => "/admin",
            RouteNamespace::Recruiter => "/recruiter",
            RouteNamespace::JobSeeker => "/job-seeker",
        }
    }

    pub const fn owner(self) -> Role {
        match self {
            RouteNamespace::Admin => Role::Admin,
            RouteNamespace::Recruiter => Role::Recruiter,
            RouteNamespace::JobSeeker => Role::JobSeeker,
        }
    }

    /// Resolve the namespace of a request path; `/recruiters` is not `/recruiter`.
    pub fn from_path(path: &str) -> Option<Self> {
        [
            RouteNamespace::Admin,
            RouteNamespace::Recruiter,
            RouteNamespace::JobSeeker,
        ]
        .into_iter()
        .find(|namespace| {
            let prefix = namespace.prefix();
            path == prefix
                || path
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }
}

/// Per-request authentication context, built once and handed to whoever needs it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    profile: Option<Profile>,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self { profile: None }
    }

    pub fn authenticated(profile: Profile) -> Self {
        Self {
            profile: Some(profile),
        }
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        self.profile.as_ref().map(|profile| profile.role)
    }
}

/// Outcome of checking a session against a namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Allow(Profile),
    Redirect(&'static str),
}

pub fn authorize(session: &SessionContext, namespace: RouteNamespace) -> AccessDecision {
    match session.profile() {
        None => AccessDecision::Redirect(LOGIN_ROUTE),
        Some(profile) if profile.role == namespace.owner() => {
            AccessDecision::Allow(profile.clone())
        }
        Some(profile) => AccessDecision::Redirect(profile.role.home()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::domain::UserId;

    fn session(role: Role) -> SessionContext {
        SessionContext::authenticated(Profile {
            id: UserId("user-1".to_string()),
            role,
            full_name: "Pat Doe".to_string(),
            email: "pat@example.test".to_string(),
            created_at: None,
        })
    }

    #[test]
    fn anonymous_sessions_go_to_login() {
        for namespace in [
            RouteNamespace::Admin,
            RouteNamespace::Recruiter,
            RouteNamespace::JobSeeker,
        ] {
            assert_eq!(
                authorize(&SessionContext::anonymous(), namespace),
                AccessDecision::Redirect(LOGIN_ROUTE)
            );
        }
    }

    #[test]
    fn matching_role_is_allowed() {
        let ctx = session(Role::Recruiter);
        match authorize(&ctx, RouteNamespace::Recruiter) {
            AccessDecision::Allow(profile) => assert_eq!(profile.role, Role::Recruiter),
            other => panic!("expected allow, got {other:?}"),
        }
    }

    #[test]
    fn mismatched_role_is_sent_home() {
        assert_eq!(
            authorize(&session(Role::JobSeeker), RouteNamespace::Admin),
            AccessDecision::Redirect("/job-seeker/dashboard")
        );
        assert_eq!(
            authorize(&session(Role::Admin), RouteNamespace::Recruiter),
            AccessDecision::Redirect("/admin/dashboard")
        );
    }

    #[test]
    fn from_path_respects_segment_boundaries() {
        assert_eq!(
            RouteNamespace::from_path("/recruiter/jobs"),
            Some(RouteNamespace::Recruiter)
        );
        assert_eq!(
            RouteNamespace::from_path("/job-seeker"),
            Some(RouteNamespace::JobSeeker)
        );
        assert_eq!(RouteNamespace::from_path("/recruiters"), None);
        assert_eq!(RouteNamespace::from_path("/api/notifications"), None);
    }
}
