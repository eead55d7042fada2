//! Role-gated job board backend.
//!
//! Recruiters publish jobs once their company profile is complete and approved by an admin,
//! job seekers apply, and every state change can fan out to the notification procedure hosted
//! by the managed database.

pub mod access;
pub mod applications;
pub mod backend;
pub mod companies;
pub mod config;
pub mod error;
pub mod jobs;
pub mod notifications;
pub mod portal;
pub mod telemetry;
