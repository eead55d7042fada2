use std::fmt;

use serde::{Deserialize, Serialize};

use crate::access::UserId;
use crate::backend::RepositoryError;

/// Identifier returned by the stored procedure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationId(pub String);

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Success,
    #[default]
    Info,
    Warning,
    Error,
}

impl NotificationType {
    pub const ALL: [NotificationType; 4] = [
        NotificationType::Success,
        NotificationType::Info,
        NotificationType::Warning,
        NotificationType::Error,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            NotificationType::Success => "success",
            NotificationType::Info => "info",
            NotificationType::Warning => "warning",
            NotificationType::Error => "error",
        }
    }

    /// Exact, case-sensitive match against the labels the procedure accepts.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.label() == raw)
    }
}

/// A notification that passed validation and can be handed to the procedure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNotification {
    pub user_id: UserId,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl NewNotification {
    pub fn new(
        user_id: UserId,
        kind: NotificationType,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            title: title.into(),
            message: message.into(),
            kind,
            link: None,
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

/// Raw request body; every field is optional so validation can name what is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

impl NotificationRequest {
    pub fn validate(self) -> Result<NewNotification, NotificationError> {
        let NotificationRequest {
            user_id,
            title,
            message,
            kind,
            link,
        } = self;

        let user_id = required(user_id);
        let title = required(title);
        let message = required(message);

        let mut missing = Vec::new();
        if user_id.is_none() {
            missing.push("user_id");
        }
        if title.is_none() {
            missing.push("title");
        }
        if message.is_none() {
            missing.push("message");
        }

        let (Some(user_id), Some(title), Some(message)) = (user_id, title, message) else {
            return Err(NotificationError::MissingFields(missing));
        };

        let kind = match kind {
            None => NotificationType::default(),
            Some(raw) => NotificationType::parse(&raw).ok_or(NotificationError::InvalidType(raw))?,
        };

        Ok(NewNotification {
            user_id: UserId(user_id),
            title,
            message,
            kind,
            link: link.filter(|link| !link.trim().is_empty()),
        })
    }
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("Invalid notification type '{0}'. Must be one of: success, info, warning, error")]
    InvalidType(String),
    #[error(transparent)]
    Procedure(#[from] RepositoryError),
}

impl NotificationError {
    pub fn is_client_error(&self) -> bool {
        !matches!(self, NotificationError::Procedure(_))
    }
}
