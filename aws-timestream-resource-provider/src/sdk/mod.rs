//! Timestream clients backed by the AWS SDK.
//!
//! Timestream requires endpoint discovery: a `DescribeEndpoints` call made
//! against the regional endpoint returns the cell endpoint that serves the
//! account, and every other call must go there. [`SdkTimestreamWriteClient`]
//! and [`SdkTimestreamQueryClient`] perform that discovery once when built.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_timestreamwrite::config::Region;
use aws_sdk_timestreamwrite::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};

use crate::classifier::{classify, ApiOperation, ResourceRef};
use crate::client::{TimestreamQueryApi, TimestreamWriteApi};
use crate::config::ProviderConfig;
use crate::error::{HandlerResult, ProviderError, ProviderErrorCode};
use crate::lambda::{ClientFactory, Credentials};

mod query;
mod write;

pub use query::SdkTimestreamQueryClient;
pub use write::SdkTimestreamWriteClient;

const CREDENTIALS_PROVIDER_NAME: &str = "CloudFormationCaller";

/// Loads the shared SDK configuration for `config`, using the caller's
/// credentials when the request carries them.
pub async fn load_sdk_config(config: &ProviderConfig, credentials: Option<&Credentials>) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region.clone()));
    if let Some(credentials) = credentials {
        loader = loader.credentials_provider(aws_credential_types::Credentials::new(
            &credentials.access_key_id,
            &credentials.secret_access_key,
            credentials.session_token.clone(),
            None,
            CREDENTIALS_PROVIDER_NAME,
        ));
    }
    loader.load().await
}

/// Converts a failed SDK call into a [`ProviderError`].
///
/// Service responses keep their API error code. A request that never got a
/// service response is transient ([`ProviderErrorCode::InternalServer`])
/// unless the SDK could not construct it, which makes it invalid.
pub(crate) fn provider_error<E, R>(error: SdkError<E, R>) -> ProviderError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match error {
        SdkError::ServiceError(context) => service_error(context.into_err()),
        error @ SdkError::ConstructionFailure(_) => {
            ProviderError::validation(DisplayErrorContext(&error).to_string())
        }
        error @ (SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) | SdkError::ResponseError(_)) => {
            tracing::warn!(error = %DisplayErrorContext(&error), "Timestream request failed in transit");
            ProviderError::internal(DisplayErrorContext(&error).to_string())
        }
        error => ProviderError::new(
            ProviderErrorCode::Unrecognized(None),
            DisplayErrorContext(&error).to_string(),
        ),
    }
}

fn service_error<E>(error: E) -> ProviderError
where
    E: ProvideErrorMetadata + std::fmt::Display,
{
    let code = ProviderErrorCode::from_code(error.code());
    let message = error
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| error.to_string());
    ProviderError::new(code, message)
}

/// A request shape the SDK refused to build.
pub(crate) fn build_error(error: impl std::fmt::Display) -> ProviderError {
    ProviderError::validation(format!("Malformed request: {error}"))
}

/// Owned copy of a string field, whether the SDK models it as required or
/// optional.
pub(crate) fn owned<'a>(value: impl Into<Option<&'a str>>) -> String {
    value.into().unwrap_or_default().to_string()
}

pub(crate) fn optional<'a>(value: impl Into<Option<&'a str>>) -> Option<String> {
    value.into().map(str::to_string)
}

/// A list field as a slice, whether the SDK models it as required or
/// optional.
pub(crate) fn items<'a, T>(value: impl Into<Option<&'a [T]>>) -> &'a [T] {
    value.into().unwrap_or_default()
}

/// Endpoint URL for a discovered endpoint address.
pub(crate) fn endpoint_url(address: &str) -> String {
    if address.starts_with("http://") || address.starts_with("https://") {
        address.to_string()
    } else {
        format!("https://{address}")
    }
}

/// Builds [`SdkTimestreamWriteClient`]s for the Lambda entry points.
#[derive(Debug, Clone, Copy)]
pub struct SdkWriteClientFactory {
    resource_type: &'static str,
}

impl SdkWriteClientFactory {
    /// `resource_type` names the resource in discovery failures.
    pub fn for_resource(resource_type: &'static str) -> Self {
        Self { resource_type }
    }
}

#[async_trait]
impl ClientFactory<dyn TimestreamWriteApi> for SdkWriteClientFactory {
    async fn connect(
        &self,
        config: &ProviderConfig,
        credentials: Option<&Credentials>,
    ) -> HandlerResult<Box<dyn TimestreamWriteApi>> {
        let client = SdkTimestreamWriteClient::connect(config, credentials)
            .await
            .map_err(|e| {
                classify(
                    ApiOperation::DescribeEndpoints,
                    &e,
                    &ResourceRef::new(self.resource_type, &config.region),
                )
            })?;
        Ok(Box::new(client))
    }
}

/// Builds [`SdkTimestreamQueryClient`]s for the Lambda entry points.
#[derive(Debug, Clone, Copy)]
pub struct SdkQueryClientFactory {
    resource_type: &'static str,
}

impl SdkQueryClientFactory {
    pub fn for_resource(resource_type: &'static str) -> Self {
        Self { resource_type }
    }
}

#[async_trait]
impl ClientFactory<dyn TimestreamQueryApi> for SdkQueryClientFactory {
    async fn connect(
        &self,
        config: &ProviderConfig,
        credentials: Option<&Credentials>,
    ) -> HandlerResult<Box<dyn TimestreamQueryApi>> {
        let client = SdkTimestreamQueryClient::connect(config, credentials)
            .await
            .map_err(|e| {
                classify(
                    ApiOperation::DescribeEndpoints,
                    &e,
                    &ResourceRef::new(self.resource_type, &config.region),
                )
            })?;
        Ok(Box::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandlerErrorCode;
    use aws_sdk_timestreamwrite::config::http::HttpResponse;
    use aws_sdk_timestreamwrite::operation::describe_table::DescribeTableError;

    type DescribeTableSdkError = SdkError<DescribeTableError, HttpResponse>;

    #[test]
    fn test_timeout_is_internal_failure() {
        let error: DescribeTableSdkError = SdkError::timeout_error("read timed out after 3s");

        let provider = provider_error(error);
        assert_eq!(provider.code, ProviderErrorCode::InternalServer);
        assert!(provider.message.contains("read timed out after 3s"), "{}", provider.message);

        let outcome = classify(
            ApiOperation::DescribeTable,
            &provider,
            &ResourceRef::table("metrics", "cpu"),
        );
        assert_eq!(outcome.code(), HandlerErrorCode::InternalFailure);
        assert!(outcome.is_retriable());
        assert!(outcome.to_string().contains("metrics|cpu"));
    }

    #[test]
    fn test_construction_failure_is_invalid_request() {
        let error: DescribeTableSdkError = SdkError::construction_failure("missing table name");

        let provider = provider_error(error);
        assert_eq!(provider.code, ProviderErrorCode::Validation);
        assert!(provider.message.contains("missing table name"), "{}", provider.message);

        let outcome = classify(
            ApiOperation::DescribeTable,
            &provider,
            &ResourceRef::table("metrics", "cpu"),
        );
        assert_eq!(outcome.code(), HandlerErrorCode::InvalidRequest);
    }

    #[test]
    fn test_endpoint_url() {
        assert_eq!(
            endpoint_url("ingest-cell1.timestream.us-east-1.amazonaws.com"),
            "https://ingest-cell1.timestream.us-east-1.amazonaws.com"
        );
        assert_eq!(endpoint_url("http://localhost:4566"), "http://localhost:4566");
    }

    #[test]
    fn test_field_helpers() {
        assert_eq!(owned("value"), "value");
        assert_eq!(owned(None::<&str>), "");
        assert_eq!(optional(Some("v")), Some("v".to_string()));
        let values = [1, 2];
        assert_eq!(items(&values[..]).len(), 2);
        assert!(items(None::<&[i32]>).is_empty());
    }
}
