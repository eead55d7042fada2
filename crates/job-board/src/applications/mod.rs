//! Job applications and the status workflow recruiters drive them through.

pub mod domain;
pub mod repository;
pub mod service;
pub mod workflow;

#[cfg(test)]
mod tests;

pub use domain::{
    Application, ApplicationId, ApplicationRequest, ApplicationStatus, StatusUpdate,
};
pub use repository::ApplicationRepository;
pub use service::{ApplicationService, ApplicationServiceError};
pub use workflow::{TransitionError, TransitionPolicy};
