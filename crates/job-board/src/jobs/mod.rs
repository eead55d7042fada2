//! Job postings owned by recruiters whose company passed the access gate.

pub mod domain;
pub mod repository;
pub mod service;

pub use domain::{JobDraft, JobId, JobPosting};
pub use repository::JobRepository;
pub use service::{JobService, JobServiceError};
