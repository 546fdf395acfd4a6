//! Translation of provider errors into handler outcomes.
//!
//! Every Timestream call made by a handler is wrapped by [`classify`], which
//! is a pure function of the failing operation, the provider error and the
//! resource the call was addressing. The table is closed: a code with no
//! dedicated mapping becomes [`HandlerError::GeneralServiceException`] so it
//! is surfaced rather than swallowed.

use crate::error::{HandlerError, ProviderError, ProviderErrorCode};
use crate::model::{DATABASE_TYPE_NAME, SCHEDULED_QUERY_TYPE_NAME, TABLE_TYPE_NAME};

/// A Timestream control-plane API operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    DescribeEndpoints,
    CreateDatabase,
    DescribeDatabase,
    UpdateDatabase,
    DeleteDatabase,
    ListDatabases,
    CreateTable,
    DescribeTable,
    UpdateTable,
    DeleteTable,
    ListTables,
    CreateScheduledQuery,
    DescribeScheduledQuery,
    DeleteScheduledQuery,
    ListScheduledQueries,
    ListTagsForResource,
    TagResource,
    UntagResource,
}

impl ApiOperation {
    /// Returns the API name of the operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DescribeEndpoints => "DescribeEndpoints",
            Self::CreateDatabase => "CreateDatabase",
            Self::DescribeDatabase => "DescribeDatabase",
            Self::UpdateDatabase => "UpdateDatabase",
            Self::DeleteDatabase => "DeleteDatabase",
            Self::ListDatabases => "ListDatabases",
            Self::CreateTable => "CreateTable",
            Self::DescribeTable => "DescribeTable",
            Self::UpdateTable => "UpdateTable",
            Self::DeleteTable => "DeleteTable",
            Self::ListTables => "ListTables",
            Self::CreateScheduledQuery => "CreateScheduledQuery",
            Self::DescribeScheduledQuery => "DescribeScheduledQuery",
            Self::DeleteScheduledQuery => "DeleteScheduledQuery",
            Self::ListScheduledQueries => "ListScheduledQueries",
            Self::ListTagsForResource => "ListTagsForResource",
            Self::TagResource => "TagResource",
            Self::UntagResource => "UntagResource",
        }
    }

    /// Returns true for operations that create a resource.
    pub fn is_create(&self) -> bool {
        matches!(
            self,
            Self::CreateDatabase | Self::CreateTable | Self::CreateScheduledQuery
        )
    }

    /// Operations whose NotFound refers to the enclosing database rather
    /// than the addressed resource.
    fn reports_parent_missing(&self) -> bool {
        matches!(self, Self::CreateTable | Self::ListTables)
    }

    /// Human-readable quota description for ServiceQuotaExceeded.
    fn limit_reason(&self) -> Option<&'static str> {
        match self {
            Self::CreateDatabase => Some("Limit for number of databases per account exceeded."),
            Self::CreateTable => Some("Limit for number of tables per account exceeded."),
            Self::CreateScheduledQuery => {
                Some("Limit for number of scheduled queries per account exceeded.")
            }
            Self::UpdateDatabase => Some("Limit for number of grants for this KMS key exceeded."),
            _ => None,
        }
    }

    fn conflict_reason(&self) -> Option<&'static str> {
        match self {
            Self::DeleteDatabase => Some(
                "Database deletion conflicts with the resource's availability. \
                 E.g. trying to delete the database in CREATING state.",
            ),
            Self::DeleteTable => Some(
                "Table deletion conflicts with the resource's availability. \
                 E.g. trying to delete the table in CREATING state.",
            ),
            _ => None,
        }
    }
}

impl std::fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The resource a provider call was addressing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    pub type_name: &'static str,
    pub identifier: String,
    pub parent: Option<Box<ResourceRef>>,
}

impl ResourceRef {
    pub fn new(type_name: &'static str, identifier: impl Into<String>) -> Self {
        Self {
            type_name,
            identifier: identifier.into(),
            parent: None,
        }
    }

    pub fn database(database_name: impl Into<String>) -> Self {
        Self::new(DATABASE_TYPE_NAME, database_name)
    }

    /// A table, identified as `database|table`, scoped under its database.
    pub fn table(database_name: &str, table_name: &str) -> Self {
        Self {
            type_name: TABLE_TYPE_NAME,
            identifier: format!("{database_name}|{table_name}"),
            parent: Some(Box::new(Self::database(database_name))),
        }
    }

    pub fn scheduled_query(identifier: impl Into<String>) -> Self {
        Self::new(SCHEDULED_QUERY_TYPE_NAME, identifier)
    }
}

/// Maps a provider error raised by `operation` against `resource` to the
/// handler outcome reported to the caller.
pub fn classify(operation: ApiOperation, error: &ProviderError, resource: &ResourceRef) -> HandlerError {
    let classified = match &error.code {
        ProviderErrorCode::Conflict if operation.is_create() => {
            HandlerError::already_exists(resource.type_name, &resource.identifier)
        }
        ProviderErrorCode::Conflict => HandlerError::resource_conflict(
            resource.type_name,
            &resource.identifier,
            operation.conflict_reason().unwrap_or(&error.message),
        ),
        ProviderErrorCode::ResourceNotFound => {
            let target = match (&resource.parent, operation.reports_parent_missing()) {
                (Some(parent), true) => parent.as_ref(),
                _ => resource,
            };
            HandlerError::not_found(target.type_name, &target.identifier)
        }
        ProviderErrorCode::Validation | ProviderErrorCode::InvalidEndpoint => {
            HandlerError::invalid_request(format!(
                "{operation} rejected for resource of type '{}' with identifier '{}': {}",
                resource.type_name, resource.identifier, error.message
            ))
        }
        ProviderErrorCode::AccessDenied => {
            HandlerError::access_denied(resource.type_name, &resource.identifier, operation.as_str())
        }
        ProviderErrorCode::ServiceQuotaExceeded => HandlerError::service_limit_exceeded(
            resource.type_name,
            operation.limit_reason().unwrap_or(&error.message),
        ),
        ProviderErrorCode::Throttling => {
            HandlerError::throttled(resource.type_name, &resource.identifier, operation.as_str())
        }
        ProviderErrorCode::InternalServer => HandlerError::internal_failure(
            resource.type_name,
            &resource.identifier,
            operation.as_str(),
            &error.message,
        ),
        ProviderErrorCode::Unrecognized(_) => HandlerError::general_service(
            resource.type_name,
            &resource.identifier,
            operation.as_str(),
            error.to_string(),
        ),
    };

    tracing::debug!(
        operation = operation.as_str(),
        provider_code = %error.code,
        outcome = %classified.code(),
        identifier = %resource.identifier,
        "Classified provider error"
    );
    classified
}
