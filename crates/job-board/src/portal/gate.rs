use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Extension;
use tracing::error;

use super::state::PortalState;
use super::COMPANY_PROFILE_ROUTE;
use crate::access::{authorize, AccessDecision, Profile, RouteNamespace};

/// Middleware state: the portal plus the namespace being guarded.
#[derive(Clone)]
pub(crate) struct NamespaceGate {
    portal: PortalState,
    namespace: RouteNamespace,
}

impl NamespaceGate {
    pub(crate) fn new(portal: &PortalState, namespace: RouteNamespace) -> Self {
        Self {
            portal: portal.clone(),
            namespace,
        }
    }
}

/// Resolve the session, then either hand the authorized [`Profile`] to the handler or
/// redirect to a safe default.
pub(crate) async fn require_namespace(
    State(gate): State<NamespaceGate>,
    mut request: Request,
    next: Next,
) -> Response {
    let session = match gate.portal.sessions.resolve(request.headers()).await {
        Ok(session) => session,
        Err(err) => {
            error!(error = %err, namespace = gate.namespace.prefix(), "session resolution failed");
            return err.into_response();
        }
    };

    match authorize(&session, gate.namespace) {
        AccessDecision::Allow(profile) => {
            request.extensions_mut().insert(session);
            request.extensions_mut().insert(profile);
            next.run(request).await
        }
        AccessDecision::Redirect(target) => Redirect::to(target).into_response(),
    }
}

/// Recruiter features stay locked until the company is complete and approved.
pub(crate) async fn require_recruiter_access(
    State(portal): State<PortalState>,
    Extension(profile): Extension<Profile>,
    request: Request,
    next: Next,
) -> Response {
    match portal.companies.access_for(&profile.id).await {
        Ok((_, access)) if access.can_access_features => next.run(request).await,
        Ok(_) => Redirect::to(COMPANY_PROFILE_ROUTE).into_response(),
        Err(err) => err.into_response(),
    }
}
