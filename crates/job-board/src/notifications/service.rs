use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{NewNotification, NotificationError, NotificationId, NotificationRequest};
use super::procedure::NotificationProcedure;

pub struct NotificationService {
    procedure: Arc<dyn NotificationProcedure>,
}

impl NotificationService {
    pub fn new(procedure: Arc<dyn NotificationProcedure>) -> Self {
        Self { procedure }
    }

    /// Validate an inbound request and forward it to the procedure.
    pub async fn create(
        &self,
        request: NotificationRequest,
    ) -> Result<NotificationId, NotificationError> {
        let notification = request.validate()?;
        self.send(&notification).await
    }

    /// Fire-and-log delivery used by workflows whose own write already succeeded.
    pub async fn deliver(&self, notification: NewNotification) {
        if let Err(err) = self.send(&notification).await {
            warn!(
                user_id = %notification.user_id,
                title = %notification.title,
                error = %err,
                "notification delivery failed"
            );
        }
    }

    async fn send(
        &self,
        notification: &NewNotification,
    ) -> Result<NotificationId, NotificationError> {
        let id = self.procedure.create_notification(notification).await?;
        info!(
            notification_id = %id,
            user_id = %notification.user_id,
            kind = notification.kind.label(),
            "notification created"
        );
        Ok(id)
    }
}
