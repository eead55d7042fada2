use async_trait::async_trait;

use super::domain::{Company, CompanyId, CompanyStatus};
use crate::access::UserId;
use crate::backend::RepositoryError;

/// Storage abstraction over the `companies` table.
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    async fn company_for_recruiter(
        &self,
        recruiter: &UserId,
    ) -> Result<Option<Company>, RepositoryError>;
    async fn fetch_company(&self, id: &CompanyId) -> Result<Option<Company>, RepositoryError>;
    async fn insert_company(&self, company: Company) -> Result<Company, RepositoryError>;
    async fn update_company(&self, company: Company) -> Result<Company, RepositoryError>;
    /// Newest first; `None` lists every company.
    async fn list_companies(
        &self,
        status: Option<CompanyStatus>,
    ) -> Result<Vec<Company>, RepositoryError>;
}
