//! Adapters for the managed database that backs every table and the notification procedure.
//!
//! The domain modules own their storage traits; this module supplies the error type they
//! share plus two implementations: an in-memory store used for local runs and tests, and a
//! PostgREST client for the hosted service.

mod memory;
mod rest;

pub use memory::InMemoryBackend;
pub use rest::RestBackend;

use serde::{Deserialize, Deserializer};

use crate::access::ProfileDirectory;
use crate::applications::ApplicationRepository;
use crate::companies::CompanyRepository;
use crate::jobs::JobRepository;
use crate::notifications::NotificationProcedure;

/// Error enumeration for backend failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// Everything the portal needs from a single backend.
pub trait Backend:
    ProfileDirectory
    + CompanyRepository
    + JobRepository
    + ApplicationRepository
    + NotificationProcedure
    + 'static
{
}

impl<T> Backend for T where
    T: ProfileDirectory
        + CompanyRepository
        + JobRepository
        + ApplicationRepository
        + NotificationProcedure
        + 'static
{
}

/// Nullable columns decode to the type's default instead of failing the whole row.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn new_record_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
