use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::error;

use super::RepositoryError;
use crate::access::{Profile, ProfileDirectory, Role, UserId};
use crate::applications::{Application, ApplicationId, ApplicationRepository};
use crate::companies::{Company, CompanyId, CompanyRepository, CompanyStatus};
use crate::jobs::{JobId, JobPosting, JobRepository};
use crate::notifications::{NewNotification, NotificationId, NotificationProcedure};

const PROFILES: &str = "profiles";
const COMPANIES: &str = "companies";
const JOBS: &str = "jobs";
const APPLICATIONS: &str = "applications";
const CREATE_NOTIFICATION: &str = "rpc/create_notification";

/// PostgREST client for the hosted database, authenticated with the service role key.
#[derive(Clone)]
pub struct RestBackend {
    client: Client,
    base_url: String,
    service_key: String,
}

impl RestBackend {
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url, service_key)
    }

    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        service_key: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            service_key: service_key.into(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/rest/v1/{}", self.base_url, path))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> Result<Vec<T>, RepositoryError> {
        let response = self
            .request(Method::GET, table)
            .query(&[("select", "*")])
            .query(filters)
            .send()
            .await
            .map_err(transport_error)?;
        decode(response).await
    }

    async fn select_one<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> Result<Option<T>, RepositoryError> {
        let mut filters = filters.to_vec();
        filters.push(("limit", "1".to_string()));
        Ok(self.select(table, &filters).await?.into_iter().next())
    }

    /// POST or PATCH returning the affected rows.
    async fn write<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        table: &str,
        filters: &[(&str, String)],
        body: &B,
    ) -> Result<Vec<T>, RepositoryError> {
        let response = self
            .request(method, table)
            .query(filters)
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        decode(response).await
    }

    async fn insert<T: DeserializeOwned + Serialize>(
        &self,
        table: &str,
        row: &T,
    ) -> Result<T, RepositoryError> {
        self.write::<T, T>(Method::POST, table, &[], row)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RepositoryError::Unavailable(format!("{table} insert returned no row")))
    }

    async fn update<T: DeserializeOwned + Serialize>(
        &self,
        table: &str,
        id: &str,
        row: &T,
    ) -> Result<T, RepositoryError> {
        self.write::<T, T>(Method::PATCH, table, &[("id", eq(id))], row)
            .await?
            .into_iter()
            .next()
            .ok_or(RepositoryError::NotFound)
    }
}

fn eq(value: &str) -> String {
    format!("eq.{value}")
}

fn transport_error(err: reqwest::Error) -> RepositoryError {
    error!(error = %err, "backend request failed");
    RepositoryError::Unavailable(err.to_string())
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, RepositoryError> {
    let status = response.status();
    if status.is_success() {
        return response.json::<T>().await.map_err(|err| {
            RepositoryError::Unavailable(format!("malformed backend payload: {err}"))
        });
    }

    let body = response.text().await.unwrap_or_default();
    if status == StatusCode::CONFLICT {
        return Err(RepositoryError::Conflict);
    }

    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|value| value.get("message").and_then(Value::as_str).map(str::to_string))
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| {
            if body.is_empty() {
                status.to_string()
            } else {
                body
            }
        });
    error!(%status, %message, "backend rejected request");
    Err(RepositoryError::Unavailable(message))
}

#[async_trait]
impl ProfileDirectory for RestBackend {
    async fn fetch_profile(&self, id: &UserId) -> Result<Option<Profile>, RepositoryError> {
        self.select_one(PROFILES, &[("id", eq(&id.0))]).await
    }

    async fn update_role(&self, id: &UserId, role: Role) -> Result<Profile, RepositoryError> {
        self.write::<Profile, Value>(
            Method::PATCH,
            PROFILES,
            &[("id", eq(&id.0))],
            &json!({ "role": role }),
        )
        .await?
        .into_iter()
        .next()
        .ok_or(RepositoryError::NotFound)
    }
}

#[async_trait]
impl CompanyRepository for RestBackend {
    async fn company_for_recruiter(
        &self,
        recruiter: &UserId,
    ) -> Result<Option<Company>, RepositoryError> {
        self.select_one(COMPANIES, &[("recruiter_id", eq(&recruiter.0))])
            .await
    }

    async fn fetch_company(&self, id: &CompanyId) -> Result<Option<Company>, RepositoryError> {
        self.select_one(COMPANIES, &[("id", eq(&id.0))]).await
    }

    async fn insert_company(&self, company: Company) -> Result<Company, RepositoryError> {
        self.insert(COMPANIES, &company).await
    }

    async fn update_company(&self, company: Company) -> Result<Company, RepositoryError> {
        self.update(COMPANIES, &company.id.0, &company).await
    }

    async fn list_companies(
        &self,
        status: Option<CompanyStatus>,
    ) -> Result<Vec<Company>, RepositoryError> {
        let mut filters = vec![("order", "created_at.desc".to_string())];
        if let Some(status) = status {
            filters.push(("status", eq(status.label())));
        }
        self.select(COMPANIES, &filters).await
    }
}

#[async_trait]
impl JobRepository for RestBackend {
    async fn insert_job(&self, job: JobPosting) -> Result<JobPosting, RepositoryError> {
        self.insert(JOBS, &job).await
    }

    async fn fetch_job(&self, id: &JobId) -> Result<Option<JobPosting>, RepositoryError> {
        self.select_one(JOBS, &[("id", eq(&id.0))]).await
    }

    async fn jobs_for_recruiter(
        &self,
        recruiter: &UserId,
    ) -> Result<Vec<JobPosting>, RepositoryError> {
        self.select(
            JOBS,
            &[
                ("recruiter_id", eq(&recruiter.0)),
                ("order", "created_at.desc".to_string()),
            ],
        )
        .await
    }
}

#[async_trait]
impl ApplicationRepository for RestBackend {
    async fn insert_application(
        &self,
        application: Application,
    ) -> Result<Application, RepositoryError> {
        self.insert(APPLICATIONS, &application).await
    }

    async fn fetch_application(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<Application>, RepositoryError> {
        self.select_one(APPLICATIONS, &[("id", eq(&id.0))]).await
    }

    async fn update_application(
        &self,
        application: Application,
    ) -> Result<Application, RepositoryError> {
        self.update(APPLICATIONS, &application.id.0, &application)
            .await
    }

    async fn applications_for_job(
        &self,
        job: &JobId,
    ) -> Result<Vec<Application>, RepositoryError> {
        self.select(
            APPLICATIONS,
            &[
                ("job_id", eq(&job.0)),
                ("order", "created_at.desc".to_string()),
            ],
        )
        .await
    }

    async fn applications_for_seeker(
        &self,
        seeker: &UserId,
    ) -> Result<Vec<Application>, RepositoryError> {
        self.select(
            APPLICATIONS,
            &[
                ("job_seeker_id", eq(&seeker.0)),
                ("order", "created_at.desc".to_string()),
            ],
        )
        .await
    }
}

#[async_trait]
impl NotificationProcedure for RestBackend {
    async fn create_notification(
        &self,
        notification: &NewNotification,
    ) -> Result<NotificationId, RepositoryError> {
        let body = json!({
            "p_user_id": notification.user_id,
            "p_title": notification.title,
            "p_message": notification.message,
            "p_type": notification.kind,
            "p_link": notification.link,
        });
        let response = self
            .request(Method::POST, CREATE_NOTIFICATION)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        match decode::<Value>(response).await? {
            Value::String(id) => Ok(NotificationId(id)),
            Value::Object(row) => row
                .get("id")
                .and_then(Value::as_str)
                .map(|id| NotificationId(id.to_string()))
                .ok_or_else(|| {
                    RepositoryError::Unavailable("create_notification returned no id".to_string())
                }),
            Value::Null => Err(RepositoryError::Unavailable(
                "create_notification returned no id".to_string(),
            )),
            other => Ok(NotificationId(other.to_string())),
        }
    }
}
