//! Error types for the Timestream resource handlers.
//!
//! Two layers live here. [`ProviderError`] is what a Timestream API call
//! reports (an error code plus message). [`HandlerError`] is the outcome
//! taxonomy the orchestration caller understands; every provider error is
//! turned into exactly one of its variants by [`crate::classifier`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for handler operations.
pub type HandlerResult<T> = Result<T, HandlerError>;

/// Result type for provider API calls.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Wire error code reported back to the orchestration caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandlerErrorCode {
    NotFound,
    AlreadyExists,
    InvalidRequest,
    AccessDenied,
    ServiceLimitExceeded,
    Throttling,
    ResourceConflict,
    InternalFailure,
    GeneralServiceException,
}

impl std::fmt::Display for HandlerErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            Self::NotFound => "NotFound",
            Self::AlreadyExists => "AlreadyExists",
            Self::InvalidRequest => "InvalidRequest",
            Self::AccessDenied => "AccessDenied",
            Self::ServiceLimitExceeded => "ServiceLimitExceeded",
            Self::Throttling => "Throttling",
            Self::ResourceConflict => "ResourceConflict",
            Self::InternalFailure => "InternalFailure",
            Self::GeneralServiceException => "GeneralServiceException",
        };
        f.write_str(code)
    }
}

/// Terminal failure of a handler invocation.
///
/// Each variant maps to one [`HandlerErrorCode`]; the display text is the
/// message returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// The resource (or its parent) does not exist.
    #[error("Resource of type '{type_name}' with identifier '{identifier}' was not found.")]
    NotFound {
        type_name: String,
        identifier: String,
    },

    /// A create collided with an existing resource of the same natural key.
    #[error("Resource of type '{type_name}' with identifier '{identifier}' already exists.")]
    AlreadyExists {
        type_name: String,
        identifier: String,
    },

    /// The request was rejected as malformed or unsupported.
    #[error("Invalid request provided: {message}")]
    InvalidRequest { message: String },

    #[error("Access denied for operation '{operation}' on resource of type '{type_name}' with identifier '{identifier}'.")]
    AccessDenied {
        type_name: String,
        identifier: String,
        operation: String,
    },

    /// An account or key quota was hit.
    #[error("Limit exceeded for resource of type '{type_name}'. Reason: {reason}")]
    ServiceLimitExceeded { type_name: String, reason: String },

    #[error("Rate exceeded for operation '{operation}' on resource of type '{type_name}' with identifier '{identifier}'.")]
    Throttled {
        type_name: String,
        identifier: String,
        operation: String,
    },

    /// The resource exists but is not in a state that allows the operation.
    #[error("Resource of type '{type_name}' with identifier '{identifier}' has a conflict. Reason: {reason}")]
    ResourceConflict {
        type_name: String,
        identifier: String,
        reason: String,
    },

    #[error("Internal error reported from downstream service during operation '{operation}' on resource of type '{type_name}' with identifier '{identifier}'. Reason: {message}")]
    InternalFailure {
        type_name: String,
        identifier: String,
        operation: String,
        message: String,
    },

    /// A provider error with no dedicated classification.
    #[error("Error occurred during operation '{operation}' on resource of type '{type_name}' with identifier '{identifier}': {message}")]
    GeneralServiceException {
        type_name: String,
        identifier: String,
        operation: String,
        message: String,
    },
}

impl HandlerError {
    /// Creates a NotFound error.
    pub fn not_found(type_name: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            type_name: type_name.into(),
            identifier: identifier.into(),
        }
    }

    /// Creates an AlreadyExists error.
    pub fn already_exists(type_name: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::AlreadyExists {
            type_name: type_name.into(),
            identifier: identifier.into(),
        }
    }

    /// Creates an InvalidRequest error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn access_denied(
        type_name: impl Into<String>,
        identifier: impl Into<String>,
        operation: impl Into<String>,
    ) -> Self {
        Self::AccessDenied {
            type_name: type_name.into(),
            identifier: identifier.into(),
            operation: operation.into(),
        }
    }

    pub fn service_limit_exceeded(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ServiceLimitExceeded {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    pub fn throttled(
        type_name: impl Into<String>,
        identifier: impl Into<String>,
        operation: impl Into<String>,
    ) -> Self {
        Self::Throttled {
            type_name: type_name.into(),
            identifier: identifier.into(),
            operation: operation.into(),
        }
    }

    /// Creates a ResourceConflict error.
    pub fn resource_conflict(
        type_name: impl Into<String>,
        identifier: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::ResourceConflict {
            type_name: type_name.into(),
            identifier: identifier.into(),
            reason: reason.into(),
        }
    }

    pub fn internal_failure(
        type_name: impl Into<String>,
        identifier: impl Into<String>,
        operation: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InternalFailure {
            type_name: type_name.into(),
            identifier: identifier.into(),
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Creates a GeneralServiceException error.
    pub fn general_service(
        type_name: impl Into<String>,
        identifier: impl Into<String>,
        operation: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::GeneralServiceException {
            type_name: type_name.into(),
            identifier: identifier.into(),
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Returns the wire code for this error.
    pub fn code(&self) -> HandlerErrorCode {
        match self {
            Self::NotFound { .. } => HandlerErrorCode::NotFound,
            Self::AlreadyExists { .. } => HandlerErrorCode::AlreadyExists,
            Self::InvalidRequest { .. } => HandlerErrorCode::InvalidRequest,
            Self::AccessDenied { .. } => HandlerErrorCode::AccessDenied,
            Self::ServiceLimitExceeded { .. } => HandlerErrorCode::ServiceLimitExceeded,
            Self::Throttled { .. } => HandlerErrorCode::Throttling,
            Self::ResourceConflict { .. } => HandlerErrorCode::ResourceConflict,
            Self::InternalFailure { .. } => HandlerErrorCode::InternalFailure,
            Self::GeneralServiceException { .. } => HandlerErrorCode::GeneralServiceException,
        }
    }

    /// Returns true if the caller may retry the same request unchanged.
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::Throttled { .. } | Self::InternalFailure { .. })
    }

    /// Returns true if this is a NotFound error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(error: serde_json::Error) -> Self {
        Self::invalid_request(error.to_string())
    }
}

// =============================================================================
// Provider errors
// =============================================================================

/// Error code reported by the Timestream API.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProviderErrorCode {
    ResourceNotFound,
    Conflict,
    Validation,
    InvalidEndpoint,
    AccessDenied,
    ServiceQuotaExceeded,
    Throttling,
    InternalServer,
    /// Any other code, or none at all.
    Unrecognized(Option<String>),
}

impl ProviderErrorCode {
    /// Parses the error code string carried in an API error response.
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some("ResourceNotFoundException") => Self::ResourceNotFound,
            Some("ConflictException") => Self::Conflict,
            Some("ValidationException") => Self::Validation,
            Some("InvalidEndpointException") => Self::InvalidEndpoint,
            Some("AccessDeniedException") => Self::AccessDenied,
            Some("ServiceQuotaExceededException") => Self::ServiceQuotaExceeded,
            Some("ThrottlingException") => Self::Throttling,
            Some("InternalServerException") => Self::InternalServer,
            other => Self::Unrecognized(other.map(str::to_owned)),
        }
    }

    /// Returns the API error code string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::ResourceNotFound => "ResourceNotFoundException",
            Self::Conflict => "ConflictException",
            Self::Validation => "ValidationException",
            Self::InvalidEndpoint => "InvalidEndpointException",
            Self::AccessDenied => "AccessDeniedException",
            Self::ServiceQuotaExceeded => "ServiceQuotaExceededException",
            Self::Throttling => "ThrottlingException",
            Self::InternalServer => "InternalServerException",
            Self::Unrecognized(Some(code)) => code,
            Self::Unrecognized(None) => "Unknown",
        }
    }
}

impl std::fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure reported by a Timestream API call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct ProviderError {
    pub code: ProviderErrorCode,
    pub message: String,
}

impl ProviderError {
    /// Creates a new ProviderError.
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Creates a ResourceNotFoundException error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::ResourceNotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::Conflict, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::Validation, message)
    }

    pub fn access_denied(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::AccessDenied, message)
    }

    pub fn quota_exceeded(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::ServiceQuotaExceeded, message)
    }

    pub fn throttling(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::Throttling, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InternalServer, message)
    }

    /// Returns true if the provider reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        self.code == ProviderErrorCode::ResourceNotFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_error_messages() {
        let error = HandlerError::not_found("AWS::Timestream::Database", "metrics");
        assert_eq!(
            error.to_string(),
            "Resource of type 'AWS::Timestream::Database' with identifier 'metrics' was not found."
        );

        let error = HandlerError::throttled("AWS::Timestream::Table", "metrics|cpu", "DeleteTable");
        assert_eq!(
            error.to_string(),
            "Rate exceeded for operation 'DeleteTable' on resource of type 'AWS::Timestream::Table' \
             with identifier 'metrics|cpu'."
        );
    }

    #[test]
    fn test_handler_error_codes() {
        assert_eq!(HandlerError::not_found("t", "i").code(), HandlerErrorCode::NotFound);
        assert_eq!(HandlerError::already_exists("t", "i").code(), HandlerErrorCode::AlreadyExists);
        assert_eq!(HandlerError::invalid_request("m").code(), HandlerErrorCode::InvalidRequest);
        assert_eq!(HandlerError::access_denied("t", "i", "op").code(), HandlerErrorCode::AccessDenied);
        assert_eq!(
            HandlerError::service_limit_exceeded("t", "r").code(),
            HandlerErrorCode::ServiceLimitExceeded
        );
        assert_eq!(HandlerError::throttled("t", "i", "op").code(), HandlerErrorCode::Throttling);
        assert_eq!(
            HandlerError::resource_conflict("t", "i", "r").code(),
            HandlerErrorCode::ResourceConflict
        );
        assert_eq!(HandlerError::internal_failure("t", "i", "op", "m").code(), HandlerErrorCode::InternalFailure);
        assert_eq!(
            HandlerError::general_service("t", "i", "op", "m").code(),
            HandlerErrorCode::GeneralServiceException
        );
    }

    #[test]
    fn test_is_retriable() {
        assert!(HandlerError::throttled("t", "i", "op").is_retriable());
        assert!(HandlerError::internal_failure("t", "i", "op", "m").is_retriable());
        assert!(!HandlerError::general_service("t", "i", "op", "m").is_retriable());
        assert!(!HandlerError::invalid_request("bad").is_retriable());
        assert!(!HandlerError::not_found("t", "i").is_retriable());
    }

    #[test]
    fn test_error_code_serialization() {
        let json = serde_json::to_string(&HandlerErrorCode::ServiceLimitExceeded).unwrap();
        assert_eq!(json, "\"ServiceLimitExceeded\"");
        assert_eq!(HandlerErrorCode::Throttling.to_string(), "Throttling");
    }

    #[test]
    fn test_provider_error_code_parsing() {
        assert_eq!(
            ProviderErrorCode::from_code(Some("ResourceNotFoundException")),
            ProviderErrorCode::ResourceNotFound
        );
        assert_eq!(
            ProviderErrorCode::from_code(Some("InvalidEndpointException")),
            ProviderErrorCode::InvalidEndpoint
        );
        assert_eq!(
            ProviderErrorCode::from_code(Some("RejectedRecordsException")),
            ProviderErrorCode::Unrecognized(Some("RejectedRecordsException".to_string()))
        );
        assert_eq!(ProviderErrorCode::from_code(None), ProviderErrorCode::Unrecognized(None));
    }

    #[test]
    fn test_provider_error_display() {
        let error = ProviderError::conflict("Database metrics already exists");
        assert_eq!(error.to_string(), "ConflictException: Database metrics already exists");
        assert!(!error.is_not_found());
        assert!(ProviderError::not_found("gone").is_not_found());
    }
}
