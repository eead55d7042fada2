use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch};
use axum::{Extension, Json, Router};
use serde::Serialize;

use super::gate::{require_namespace, require_recruiter_access, NamespaceGate};
use super::responses::json_rejection;
use super::state::PortalState;
use crate::access::{Profile, RouteNamespace};
use crate::applications::{ApplicationId, StatusUpdate};
use crate::companies::{Company, CompanyDraft, RecruiterAccess};
use crate::jobs::{JobDraft, JobId, JobPosting};

pub(crate) fn routes(state: &PortalState) -> Router<PortalState> {
    let gated = Router::new()
        .route("/recruiter/jobs", get(list_jobs).post(create_job))
        .route(
            "/recruiter/jobs/:job_id/applications",
            get(job_applications),
        )
        .route(
            "/recruiter/applications/:application_id",
            patch(update_application),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_recruiter_access,
        ));

    Router::new()
        .route("/recruiter/dashboard", get(dashboard))
        .route("/recruiter/company", get(show_company).put(save_company))
        .merge(gated)
        .route_layer(middleware::from_fn_with_state(
            NamespaceGate::new(state, RouteNamespace::Recruiter),
            require_namespace,
        ))
}

#[derive(Debug, Serialize)]
pub(crate) struct CompanyProfileView {
    pub(crate) company: Option<Company>,
    pub(crate) access: RecruiterAccess,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) prompt_message: Option<&'static str>,
}

impl CompanyProfileView {
    fn new(company: Option<Company>, access: RecruiterAccess) -> Self {
        Self {
            prompt_message: access.prompt.map(|prompt| prompt.message()),
            company,
            access,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct RecruiterDashboardView {
    pub(crate) recruiter: Profile,
    #[serde(flatten)]
    pub(crate) profile: CompanyProfileView,
    pub(crate) jobs: Vec<JobPosting>,
}

pub(crate) async fn dashboard(
    State(portal): State<PortalState>,
    Extension(recruiter): Extension<Profile>,
) -> Response {
    let (company, access) = match portal.companies.access_for(&recruiter.id).await {
        Ok(snapshot) => snapshot,
        Err(err) => return err.into_response(),
    };

    let jobs = if access.can_access_features {
        match portal.jobs.list_for_recruiter(&recruiter.id).await {
            Ok(jobs) => jobs,
            Err(err) => return err.into_response(),
        }
    } else {
        Vec::new()
    };

    Json(RecruiterDashboardView {
        recruiter,
        profile: CompanyProfileView::new(company, access),
        jobs,
    })
    .into_response()
}

pub(crate) async fn show_company(
    State(portal): State<PortalState>,
    Extension(recruiter): Extension<Profile>,
) -> Response {
    match portal.companies.access_for(&recruiter.id).await {
        Ok((company, access)) => Json(CompanyProfileView::new(company, access)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn save_company(
    State(portal): State<PortalState>,
    Extension(recruiter): Extension<Profile>,
    payload: Result<Json<CompanyDraft>, JsonRejection>,
) -> Response {
    let Json(draft) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return json_rejection(rejection),
    };
    match portal.companies.save_profile(&recruiter.id, draft).await {
        Ok(company) => {
            let access = RecruiterAccess::evaluate(Some(&company));
            Json(CompanyProfileView::new(Some(company), access)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn list_jobs(
    State(portal): State<PortalState>,
    Extension(recruiter): Extension<Profile>,
) -> Response {
    match portal.jobs.list_for_recruiter(&recruiter.id).await {
        Ok(jobs) => Json(jobs).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn create_job(
    State(portal): State<PortalState>,
    Extension(recruiter): Extension<Profile>,
    payload: Result<Json<JobDraft>, JsonRejection>,
) -> Response {
    let Json(draft) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return json_rejection(rejection),
    };
    match portal.jobs.create(&recruiter.id, draft).await {
        Ok(job) => (StatusCode::CREATED, Json(job)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn job_applications(
    State(portal): State<PortalState>,
    Extension(recruiter): Extension<Profile>,
    Path(job_id): Path<String>,
) -> Response {
    match portal
        .applications
        .for_job(&recruiter.id, &JobId(job_id))
        .await
    {
        Ok(applications) => Json(applications).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn update_application(
    State(portal): State<PortalState>,
    Extension(recruiter): Extension<Profile>,
    Path(application_id): Path<String>,
    payload: Result<Json<StatusUpdate>, JsonRejection>,
) -> Response {
    let Json(update) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return json_rejection(rejection),
    };
    match portal
        .applications
        .update_status(&recruiter.id, &ApplicationId(application_id), update)
        .await
    {
        Ok(application) => Json(application).into_response(),
        Err(err) => err.into_response(),
    }
}
