use serde::{Deserialize, Serialize};

use super::domain::ApplicationStatus;

/// How strictly status edits follow the workflow table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPolicy {
    /// Recruiters may set any status at any time.
    #[default]
    Permissive,
    /// Only moves listed in [`ApplicationStatus::forward_transitions`] are accepted.
    ForwardOnly,
}

impl TransitionPolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "permissive" => Some(TransitionPolicy::Permissive),
            "forward_only" | "forward" | "strict" => Some(TransitionPolicy::ForwardOnly),
            _ => None,
        }
    }

    /// Re-applying the current status is always accepted.
    pub fn check(
        self,
        from: ApplicationStatus,
        to: ApplicationStatus,
    ) -> Result<(), TransitionError> {
        if from == to {
            return Ok(());
        }
        match self {
            TransitionPolicy::Permissive => Ok(()),
            TransitionPolicy::ForwardOnly if from.forward_transitions().contains(&to) => Ok(()),
            TransitionPolicy::ForwardOnly => Err(TransitionError { from, to }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot move application from {from} to {to}")]
pub struct TransitionError {
    pub from: ApplicationStatus,
    pub to: ApplicationStatus,
}
