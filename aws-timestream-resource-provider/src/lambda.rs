//! Lambda integration for the resource handlers.
//!
//! CloudFormation invokes the handler function with a request envelope
//! carrying the action, the resource properties, tags, caller credentials
//! and, on re-invocation, the callback context of the previous response.
//! The function answers with a [`ProgressEvent`].
//!
//! Handler failures, including malformed requests and client bootstrap
//! failures, are returned as `FAILED` progress events. Only a response that
//! cannot be serialized is reported to the Lambda runtime as an error.

use std::sync::Arc;

use async_trait::async_trait;
use lambda_runtime::{service_fn, LambdaEvent};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ProviderConfig;
use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{handle, ResourceHandler};
use crate::progress::ProgressEvent;
use crate::request::{Action, ResourceHandlerRequest};
use crate::tags::TagMap;

/// Request envelope sent by CloudFormation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerRequest<M, C> {
    #[serde(default)]
    pub aws_account_id: Option<String>,

    /// Client request token, stable across retries of the same request.
    #[serde(default)]
    pub bearer_token: String,

    #[serde(default)]
    pub region: Option<String>,

    pub action: Action,

    #[serde(default)]
    pub resource_type: Option<String>,

    #[serde(default)]
    pub stack_id: Option<String>,

    #[serde(default)]
    pub next_token: Option<String>,

    #[serde(default = "none")]
    pub callback_context: Option<C>,

    #[serde(default = "RequestData::empty")]
    pub request_data: RequestData<M>,
}

/// Resource-specific part of the request envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestData<M> {
    #[serde(default)]
    pub caller_credentials: Option<Credentials>,

    #[serde(default)]
    pub logical_resource_id: Option<String>,

    #[serde(default = "none")]
    pub resource_properties: Option<M>,

    #[serde(default = "none")]
    pub previous_resource_properties: Option<M>,

    #[serde(default)]
    pub system_tags: Option<TagMap>,

    #[serde(default)]
    pub stack_tags: Option<TagMap>,

    #[serde(default)]
    pub previous_stack_tags: Option<TagMap>,
}

impl<M> RequestData<M> {
    fn empty() -> Self {
        Self {
            caller_credentials: None,
            logical_resource_id: None,
            resource_properties: None,
            previous_resource_properties: None,
            system_tags: None,
            stack_tags: None,
            previous_stack_tags: None,
        }
    }
}

fn none<T>() -> Option<T> {
    None
}

/// Credentials of the caller, used for every provider call.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    #[serde(default)]
    pub session_token: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// A request envelope split into what the handler needs.
pub struct Invocation<M, C> {
    pub action: Action,
    pub request: ResourceHandlerRequest<M>,
    pub context: Option<C>,
    pub credentials: Option<Credentials>,
}

impl<M: Default, C> HandlerRequest<M, C> {
    pub fn into_invocation(self) -> Invocation<M, C> {
        let data = self.request_data;
        let request = ResourceHandlerRequest {
            client_request_token: self.bearer_token,
            desired_resource_state: data.resource_properties.unwrap_or_default(),
            previous_resource_state: data.previous_resource_properties,
            desired_resource_tags: data.stack_tags,
            previous_resource_tags: data.previous_stack_tags,
            system_tags: data.system_tags,
            logical_resource_identifier: data.logical_resource_id,
            next_token: self.next_token,
            region: self.region,
            aws_account_id: self.aws_account_id,
            stack_id: self.stack_id,
        };
        Invocation {
            action: self.action,
            request,
            context: self.callback_context,
            credentials: data.caller_credentials,
        }
    }
}

/// Builds the provider client for one invocation.
#[async_trait]
pub trait ClientFactory<C: ?Sized>: Send + Sync {
    async fn connect(
        &self,
        config: &ProviderConfig,
        credentials: Option<&Credentials>,
    ) -> HandlerResult<Box<C>>;
}

/// Handles one raw invocation payload and returns the response payload.
pub async fn process<H, F>(handler: &H, factory: &F, payload: Value) -> Result<Value, serde_json::Error>
where
    H: ResourceHandler,
    F: ClientFactory<H::Client>,
{
    let envelope: HandlerRequest<H::Model, H::Context> = match serde_json::from_value(payload) {
        Ok(envelope) => envelope,
        Err(error) => {
            tracing::warn!(resource_type = H::TYPE_NAME, %error, "Malformed request");
            let event = ProgressEvent::<H::Model, H::Context>::failed(&HandlerError::from(error));
            return serde_json::to_value(event);
        }
    };
    let invocation = envelope.into_invocation();

    let config = ProviderConfig::for_request(invocation.request.region.as_deref());
    let client = match factory.connect(&config, invocation.credentials.as_ref()).await {
        Ok(client) => client,
        Err(error) => {
            tracing::warn!(resource_type = H::TYPE_NAME, region = %config.region, "{error}");
            return serde_json::to_value(ProgressEvent::<H::Model, H::Context>::failed(&error));
        }
    };

    let event = handle(
        handler,
        &*client,
        invocation.action,
        &invocation.request,
        invocation.context,
    )
    .await;
    serde_json::to_value(event)
}

/// Runs the Lambda event loop for one resource type.
pub async fn run<H, F>(handler: H, factory: F) -> Result<(), lambda_runtime::Error>
where
    H: ResourceHandler + 'static,
    F: ClientFactory<H::Client> + 'static,
{
    let handler = Arc::new(handler);
    let factory = Arc::new(factory);
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let handler = Arc::clone(&handler);
        let factory = Arc::clone(&factory);
        async move {
            process(handler.as_ref(), factory.as_ref(), event.payload)
                .await
                .map_err(lambda_runtime::Error::from)
        }
    }))
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TableCallbackContext, TableModel};
    use serde_json::json;

    type TableRequest = HandlerRequest<TableModel, TableCallbackContext>;

    #[test]
    fn test_envelope_deserialization() {
        let payload = json!({
            "awsAccountId": "123456789012",
            "bearerToken": "5c3b9ab9-5e55-4d6c-a1d5-5c4f0c4e5a8e",
            "region": "eu-west-1",
            "action": "DELETE",
            "resourceType": "AWS::Timestream::Table",
            "callbackContext": {"deleteTableStarted": true},
            "requestData": {
                "callerCredentials": {
                    "accessKeyId": "AKID",
                    "secretAccessKey": "SECRET",
                    "sessionToken": "TOKEN"
                },
                "logicalResourceId": "MetricsTable",
                "resourceProperties": {"DatabaseName": "metrics", "TableName": "cpu"},
                "stackTags": {"stage": "prod"},
                "systemTags": {"aws:cloudformation:stack-name": "obs"}
            }
        });

        let request: TableRequest = serde_json::from_value(payload).unwrap();
        let invocation = request.into_invocation();

        assert_eq!(invocation.action, Action::Delete);
        assert_eq!(
            invocation.context,
            Some(TableCallbackContext {
                delete_table_started: true,
                delete_table_stabilized: false
            })
        );
        assert_eq!(invocation.request.client_request_token, "5c3b9ab9-5e55-4d6c-a1d5-5c4f0c4e5a8e");
        assert_eq!(invocation.request.region.as_deref(), Some("eu-west-1"));
        assert_eq!(invocation.request.desired_resource_state.table(), Some("cpu"));
        assert_eq!(
            invocation.request.desired_resource_tags.unwrap().get("stage").map(String::as_str),
            Some("prod")
        );
        assert_eq!(invocation.credentials.unwrap().session_token.as_deref(), Some("TOKEN"));
    }

    #[test]
    fn test_envelope_without_context_or_data() {
        let request: TableRequest =
            serde_json::from_value(json!({"bearerToken": "t", "action": "LIST"})).unwrap();
        let invocation = request.into_invocation();

        assert_eq!(invocation.action, Action::List);
        assert!(invocation.context.is_none());
        assert_eq!(invocation.request.desired_resource_state, TableModel::default());
        assert!(invocation.credentials.is_none());
    }

    #[test]
    fn test_credentials_debug_is_redacted() {
        let credentials = Credentials {
            access_key_id: "AKID".to_string(),
            secret_access_key: "SECRET".to_string(),
            session_token: Some("TOKEN".to_string()),
        };
        let debug = format!("{credentials:?}");
        assert!(debug.contains("AKID"));
        assert!(!debug.contains("SECRET"));
        assert!(!debug.contains("TOKEN"));
    }
}
