use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::gate::{require_namespace, NamespaceGate};
use super::responses::{error_response, json_rejection};
use super::state::PortalState;
use crate::access::{Profile, Role, RouteNamespace, UserId};
use crate::companies::{is_company_profile_complete, Company, CompanyId, CompanyStatus};

pub(crate) fn routes(state: &PortalState) -> Router<PortalState> {
    Router::new()
        .route("/admin/dashboard", get(dashboard))
        .route("/admin/companies", get(list_companies))
        .route("/admin/companies/:company_id/approve", post(approve_company))
        .route("/admin/companies/:company_id/reject", post(reject_company))
        .route("/admin/users/:user_id/role", put(update_role))
        .route_layer(middleware::from_fn_with_state(
            NamespaceGate::new(state, RouteNamespace::Admin),
            require_namespace,
        ))
}

#[derive(Debug, Serialize)]
pub(crate) struct AdminDashboardView {
    pub(crate) admin: Profile,
    pub(crate) pending_companies: usize,
    pub(crate) approved_companies: usize,
    pub(crate) rejected_companies: usize,
}

pub(crate) async fn dashboard(
    State(portal): State<PortalState>,
    Extension(admin): Extension<Profile>,
) -> Response {
    let companies = match portal.companies.list(None).await {
        Ok(companies) => companies,
        Err(err) => return err.into_response(),
    };
    let count = |status: CompanyStatus| {
        companies
            .iter()
            .filter(|company| company.status == status)
            .count()
    };

    Json(AdminDashboardView {
        pending_companies: count(CompanyStatus::Pending),
        approved_companies: count(CompanyStatus::Approved),
        rejected_companies: count(CompanyStatus::Rejected),
        admin,
    })
    .into_response()
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompanyListQuery {
    #[serde(default)]
    pub(crate) status: Option<String>,
}

/// Review queue row: the record plus whether it is ready to approve.
#[derive(Debug, Serialize)]
pub(crate) struct CompanyReviewEntry {
    #[serde(flatten)]
    pub(crate) company: Company,
    pub(crate) profile_complete: bool,
}

pub(crate) async fn list_companies(
    State(portal): State<PortalState>,
    Query(query): Query<CompanyListQuery>,
) -> Response {
    let status = match query.status.as_deref() {
        None | Some("") | Some("all") => None,
        Some(raw) => match CompanyStatus::parse(raw) {
            Some(status) => Some(status),
            None => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("unknown company status '{raw}'"),
                )
            }
        },
    };

    match portal.companies.list(status).await {
        Ok(companies) => {
            let entries: Vec<CompanyReviewEntry> = companies
                .into_iter()
                .map(|company| CompanyReviewEntry {
                    profile_complete: is_company_profile_complete(Some(&company)),
                    company,
                })
                .collect();
            Json(entries).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn approve_company(
    State(portal): State<PortalState>,
    Path(company_id): Path<String>,
) -> Response {
    match portal.companies.approve(&CompanyId(company_id)).await {
        Ok(company) => Json(company).into_response(),
        Err(err) => err.into_response(),
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RejectRequest {
    #[serde(default)]
    pub(crate) reason: Option<String>,
}

pub(crate) async fn reject_company(
    State(portal): State<PortalState>,
    Path(company_id): Path<String>,
    payload: Result<Json<RejectRequest>, JsonRejection>,
) -> Response {
    let reason = match payload {
        Ok(Json(request)) => request.reason,
        Err(JsonRejection::MissingJsonContentType(_)) => None,
        Err(rejection) => return json_rejection(rejection),
    };
    match portal
        .companies
        .reject(&CompanyId(company_id), reason)
        .await
    {
        Ok(company) => Json(company).into_response(),
        Err(err) => err.into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RoleUpdate {
    pub(crate) role: Role,
}

pub(crate) async fn update_role(
    State(portal): State<PortalState>,
    Extension(admin): Extension<Profile>,
    Path(user_id): Path<String>,
    payload: Result<Json<RoleUpdate>, JsonRejection>,
) -> Response {
    let Json(update) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return json_rejection(rejection),
    };
    let user_id = UserId(user_id);
    if user_id == admin.id {
        return error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            "admins cannot change their own role",
        );
    }

    match portal.profiles.update_role(&user_id, update.role).await {
        Ok(profile) => {
            info!(%user_id, role = profile.role.label(), admin = %admin.id, "role updated");
            Json(profile).into_response()
        }
        Err(err) => err.into_response(),
    }
}
