//! Validated notification creation backed by the `create_notification` stored procedure.

pub mod domain;
pub mod procedure;
pub mod router;
pub mod service;

pub use domain::{
    NewNotification, NotificationError, NotificationId, NotificationRequest, NotificationType,
};
pub use procedure::NotificationProcedure;
pub use router::notification_router;
pub use service::NotificationService;
