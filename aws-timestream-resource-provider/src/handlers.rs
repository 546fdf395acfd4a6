//! Lifecycle handlers for the Timestream resource types.
//!
//! Each resource type implements [`ResourceHandler`]. The orchestration
//! caller reaches a handler through [`handle`], which dispatches on the
//! requested [`Action`] and turns any [`HandlerError`] into a failed
//! progress event.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{HandlerError, HandlerResult};
use crate::progress::ProgressEvent;
use crate::request::{Action, ResourceHandlerRequest};

pub mod database;
pub mod delete;
pub mod scheduled_query;
pub mod table;
pub mod tagging;

pub use database::DatabaseHandler;
pub use scheduled_query::ScheduledQueryHandler;
pub use table::TableHandler;

/// Outcome type of a handler for resource model `M` and context `C`.
pub type HandlerOutcome<M, C> = HandlerResult<ProgressEvent<M, C>>;

/// Create, read, update, delete and list for one resource type.
///
/// Handlers hold no client; the client is passed to every operation.
#[async_trait]
pub trait ResourceHandler: Send + Sync {
    /// The resource model.
    type Model: Serialize + DeserializeOwned + Clone + Default + Send + Sync + 'static;
    /// The callback context echoed between invocations.
    type Context: Serialize + DeserializeOwned + Clone + Send + Sync + 'static;
    /// The provider API the handler calls.
    type Client: ?Sized + Send + Sync;

    /// The resource type name, e.g. `AWS::Timestream::Table`.
    const TYPE_NAME: &'static str;

    async fn create(
        &self,
        client: &Self::Client,
        request: &ResourceHandlerRequest<Self::Model>,
    ) -> HandlerOutcome<Self::Model, Self::Context>;

    async fn read(
        &self,
        client: &Self::Client,
        request: &ResourceHandlerRequest<Self::Model>,
    ) -> HandlerOutcome<Self::Model, Self::Context>;

    async fn update(
        &self,
        client: &Self::Client,
        request: &ResourceHandlerRequest<Self::Model>,
    ) -> HandlerOutcome<Self::Model, Self::Context>;

    /// Deletes the resource. `context` is the context returned by the
    /// previous invocation of this delete, if any.
    async fn delete(
        &self,
        client: &Self::Client,
        request: &ResourceHandlerRequest<Self::Model>,
        context: Option<Self::Context>,
    ) -> HandlerOutcome<Self::Model, Self::Context>;

    async fn list(
        &self,
        client: &Self::Client,
        request: &ResourceHandlerRequest<Self::Model>,
    ) -> HandlerOutcome<Self::Model, Self::Context>;
}

/// Runs one handler invocation and reports its outcome.
pub async fn handle<H>(
    handler: &H,
    client: &H::Client,
    action: Action,
    request: &ResourceHandlerRequest<H::Model>,
    context: Option<H::Context>,
) -> ProgressEvent<H::Model, H::Context>
where
    H: ResourceHandler,
{
    tracing::debug!(resource_type = H::TYPE_NAME, %action, "Handling request");

    let result = match action {
        Action::Create => handler.create(client, request).await,
        Action::Read => handler.read(client, request).await,
        Action::Update => handler.update(client, request).await,
        Action::Delete => handler.delete(client, request, context).await,
        Action::List => handler.list(client, request).await,
    };

    match result {
        Ok(event) => {
            tracing::debug!(resource_type = H::TYPE_NAME, %action, status = %event.status, "Request handled");
            event
        }
        Err(error) => {
            log_failure::<H>(action, &error);
            ProgressEvent::failed(&error)
        }
    }
}

fn log_failure<H: ResourceHandler>(action: Action, error: &HandlerError) {
    if error.is_retriable() {
        tracing::warn!(resource_type = H::TYPE_NAME, %action, code = %error.code(), "{error}");
    } else {
        tracing::info!(resource_type = H::TYPE_NAME, %action, code = %error.code(), "{error}");
    }
}

/// Returns the value or an InvalidRequest naming the missing property.
pub(crate) fn require<'a>(value: Option<&'a str>, property: &str) -> HandlerResult<&'a str> {
    value.ok_or_else(|| HandlerError::invalid_request(format!("{property} is required")))
}
