//! Outcome of one handler invocation.

use serde::{Deserialize, Serialize};

use crate::error::{HandlerError, HandlerErrorCode};

/// Status reported to the orchestration caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    /// The operation has finished.
    Success,
    /// The caller must invoke the handler again after the callback delay,
    /// passing back the callback context.
    InProgress,
    /// The operation failed terminally.
    Failed,
}

impl std::fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "SUCCESS"),
            Self::InProgress => write!(f, "IN_PROGRESS"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

/// Progress event returned from every handler invocation.
///
/// `callback_context` is only set on in-progress outcomes, and `error_code`
/// and `message` only on failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent<M, C> {
    pub status: OperationStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<HandlerErrorCode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_context: Option<C>,

    #[serde(default)]
    pub callback_delay_seconds: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_model: Option<M>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_models: Option<Vec<M>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl<M, C> ProgressEvent<M, C> {
    fn with_status(status: OperationStatus) -> Self {
        Self {
            status,
            error_code: None,
            message: None,
            callback_context: None,
            callback_delay_seconds: 0,
            resource_model: None,
            resource_models: None,
            next_token: None,
        }
    }

    /// Creates a terminal success outcome.
    pub fn success(model: Option<M>) -> Self {
        Self {
            resource_model: model,
            ..Self::with_status(OperationStatus::Success)
        }
    }

    /// Creates an outcome asking the caller to re-invoke after `delay_seconds`.
    pub fn in_progress(model: M, context: C, delay_seconds: u32) -> Self {
        Self {
            resource_model: Some(model),
            callback_context: Some(context),
            callback_delay_seconds: delay_seconds,
            ..Self::with_status(OperationStatus::InProgress)
        }
    }

    /// Creates a list outcome carrying one page of models.
    pub fn listed(models: Vec<M>, next_token: Option<String>) -> Self {
        Self {
            resource_models: Some(models),
            next_token,
            ..Self::with_status(OperationStatus::Success)
        }
    }

    /// Creates a terminal failure outcome from a handler error.
    pub fn failed(error: &HandlerError) -> Self {
        Self {
            error_code: Some(error.code()),
            message: Some(error.to_string()),
            ..Self::with_status(OperationStatus::Failed)
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == OperationStatus::Success
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == OperationStatus::InProgress
    }

    pub fn is_failed(&self) -> bool {
        self.status == OperationStatus::Failed
    }
}

impl<M, C> From<Result<ProgressEvent<M, C>, HandlerError>> for ProgressEvent<M, C> {
    fn from(result: Result<ProgressEvent<M, C>, HandlerError>) -> Self {
        match result {
            Ok(event) => event,
            Err(error) => Self::failed(&error),
        }
    }
}
