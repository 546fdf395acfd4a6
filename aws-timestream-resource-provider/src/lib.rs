//! # CloudFormation Resource Provider for Amazon Timestream
//!
//! Resource handlers for `AWS::Timestream::Database`, `AWS::Timestream::Table`
//! and `AWS::Timestream::ScheduledQuery`, packaged as Lambda functions that
//! CloudFormation invokes once per lifecycle step.
//!
//! ## Overview
//!
//! Every invocation carries an action (`CREATE`, `READ`, `UPDATE`, `DELETE`
//! or `LIST`), the desired and previous resource properties, stack and system
//! tags, and on re-invocation the callback context returned last time. The
//! handler answers with a [`ProgressEvent`]:
//!
//! - `SUCCESS` with the resulting model (or models and a next token for `LIST`)
//! - `IN_PROGRESS` with a callback context and delay, asking to be invoked again
//! - `FAILED` with a CloudFormation [`HandlerErrorCode`] and message
//!
//! ### Key Features
//!
//! - **Asynchronous deletes**: tables and scheduled queries disappear some time
//!   after the delete call returns. [`handlers::delete::reconcile_delete`] issues
//!   the delete once and then polls across invocations until the resource is gone.
//! - **Tag reconciliation**: resource tags merge with stack and system tags, and
//!   updates apply the minimal untag/tag pair computed by [`tags::TagDiff`].
//! - **Error classification**: provider failures are mapped per operation to
//!   CloudFormation error codes by [`classifier::classify`].
//! - **Generated names**: resources without an explicit name get a stable name
//!   derived from the logical id and the client request token, so a retried
//!   create targets the same resource.
//!
//! ## Running a Handler
//!
//! Each resource type has its own binary. The entry point wires a handler and
//! a client factory into the Lambda runtime:
//!
//! ```rust,ignore
//! use aws_timestream_resource_provider::config::HandlerConfig;
//! use aws_timestream_resource_provider::handlers::{table, TableHandler};
//! use aws_timestream_resource_provider::model::TABLE_TYPE_NAME;
//! use aws_timestream_resource_provider::sdk::SdkWriteClientFactory;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), lambda_runtime::Error> {
//!     lambda_runtime::tracing::init_default_subscriber();
//!     let config = HandlerConfig::with_page_size(table::LIST_PAGE_SIZE).from_env();
//!     aws_timestream_resource_provider::lambda::run(
//!         TableHandler::new(config),
//!         SdkWriteClientFactory::for_resource(TABLE_TYPE_NAME),
//!     )
//!     .await
//! }
//! ```
//!
//! ## Testing Handlers
//!
//! Handlers only talk to Timestream through [`client::TimestreamWriteApi`] and
//! [`client::TimestreamQueryApi`], so tests drive them with scripted in-memory
//! clients and call [`handlers::handle`] directly.
//!
//! ## Module Organization
//!
//! - [`classifier`]: Provider error classification per API operation
//! - [`client`]: Timestream API traits and record types
//! - [`config`]: Region, endpoint and handler settings
//! - [`error`]: Handler and provider error types
//! - [`handlers`]: Resource handlers, delete reconciliation and tagging
//! - [`lambda`]: Request envelope and Lambda runtime integration
//! - [`model`]: Resource models and callback contexts
//! - [`naming`]: Generated names and idempotency tokens
//! - [`progress`]: Progress events returned to CloudFormation
//! - [`request`]: Handler request and action types
//! - [`sdk`]: SDK-backed Timestream clients
//! - [`tags`]: Tag maps and tag diffs

pub mod classifier;
pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod lambda;
pub mod model;
pub mod naming;
pub mod progress;
pub mod request;
pub mod sdk;
pub mod tags;

// Re-export main types at crate root
pub use client::{Page, TaggingApi, TimestreamQueryApi, TimestreamWriteApi};
pub use config::{HandlerConfig, ProviderConfig};
pub use error::{HandlerError, HandlerErrorCode, HandlerResult, ProviderError, ProviderErrorCode};
pub use lambda::{ClientFactory, Credentials};
pub use progress::{OperationStatus, ProgressEvent};
pub use request::{Action, ResourceHandlerRequest};

// Re-export handlers
pub use handlers::{handle, DatabaseHandler, ResourceHandler, ScheduledQueryHandler, TableHandler};
