use async_trait::async_trait;

use super::domain::{NewNotification, NotificationId};
use crate::backend::RepositoryError;

/// The database routine that inserts a notification row and returns its id.
#[async_trait]
pub trait NotificationProcedure: Send + Sync {
    async fn create_notification(
        &self,
        notification: &NewNotification,
    ) -> Result<NotificationId, RepositoryError>;
}
