//! Role-prefixed page routes served as JSON view models.
//!
//! Every namespace sits behind [`gate::require_namespace`]; recruiter feature routes are
//! additionally wrapped by the company access gate.

mod admin;
mod gate;
mod job_seeker;
mod recruiter;
mod responses;
mod state;


pub use state::PortalState;

use axum::Router;

use crate::notifications::notification_router;

/// Where recruiters without feature access are sent.
pub const COMPANY_PROFILE_ROUTE: &str = "/recruiter/company";

/// Full page and API surface, ready for operational routes and layers.
pub fn portal_router(state: PortalState) -> Router {
    let notifications = notification_router(state.notifications.clone());

    Router::new()
        .merge(admin::routes(&state))
        .merge(recruiter::routes(&state))
        .merge(job_seeker::routes(&state))
        .with_state(state)
        .merge(notifications)
}
