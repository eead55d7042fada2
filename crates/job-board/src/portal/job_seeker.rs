use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::Serialize;

use super::gate::{require_namespace, NamespaceGate};
use super::responses::json_rejection;
use super::state::PortalState;
use crate::access::{Profile, RouteNamespace};
use crate::applications::{Application, ApplicationId, ApplicationRequest};

pub(crate) fn routes(state: &PortalState) -> Router<PortalState> {
    Router::new()
        .route("/job-seeker/dashboard", get(dashboard))
        .route("/job-seeker/applications", post(apply))
        .route(
            "/job-seeker/applications/:application_id/submit",
            post(submit_draft),
        )
        .route_layer(middleware::from_fn_with_state(
            NamespaceGate::new(state, RouteNamespace::JobSeeker),
            require_namespace,
        ))
}

#[derive(Debug, Serialize)]
pub(crate) struct JobSeekerDashboardView {
    pub(crate) profile: Profile,
    pub(crate) applications: Vec<Application>,
}

pub(crate) async fn dashboard(
    State(portal): State<PortalState>,
    Extension(profile): Extension<Profile>,
) -> Response {
    match portal.applications.for_seeker(&profile.id).await {
        Ok(applications) => Json(JobSeekerDashboardView {
            profile,
            applications,
        })
        .into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn apply(
    State(portal): State<PortalState>,
    Extension(profile): Extension<Profile>,
    payload: Result<Json<ApplicationRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return json_rejection(rejection),
    };
    match portal.applications.apply(&profile.id, request).await {
        Ok(application) => (StatusCode::CREATED, Json(application)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn submit_draft(
    State(portal): State<PortalState>,
    Extension(profile): Extension<Profile>,
    Path(application_id): Path<String>,
) -> Response {
    match portal
        .applications
        .submit_draft(&profile.id, &ApplicationId(application_id))
        .await
    {
        Ok(application) => Json(application).into_response(),
        Err(err) => err.into_response(),
    }
}
