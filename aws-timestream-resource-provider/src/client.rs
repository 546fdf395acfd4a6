//! Timestream control-plane API seam.
//!
//! Handlers talk to Timestream only through these traits. The SDK-backed
//! implementations live in [`crate::sdk`]; tests substitute scripted mocks.
//! Inputs and outputs are expressed in the resource model's types so the
//! handlers never see SDK shapes.

use async_trait::async_trait;

use crate::error::ProviderResult;
use crate::model::scheduled_query::{
    ErrorReportConfiguration, NotificationConfiguration, ScheduleConfiguration, TargetConfiguration,
};
use crate::model::table::{MagneticStoreWriteProperties, RetentionSettings, Schema};
use crate::tags::TagMap;

/// Tagging operations, keyed by resource ARN.
#[async_trait]
pub trait TaggingApi: Send + Sync {
    /// Returns the tags attached to a resource.
    async fn list_tags_for_resource(&self, resource_arn: &str) -> ProviderResult<TagMap>;

    /// Attaches or overwrites tags. Entries are sent in key order.
    async fn tag_resource(&self, resource_arn: &str, tags: &TagMap) -> ProviderResult<()>;

    /// Detaches tags by key.
    async fn untag_resource(&self, resource_arn: &str, tag_keys: &[String]) -> ProviderResult<()>;
}

/// Timestream Write control-plane operations (databases and tables).
#[async_trait]
pub trait TimestreamWriteApi: TaggingApi {
    async fn create_database(&self, input: CreateDatabaseInput) -> ProviderResult<DatabaseRecord>;

    async fn describe_database(&self, database_name: &str) -> ProviderResult<DatabaseRecord>;

    /// Re-keys the database. `None` asks for the service-owned key.
    async fn update_database(
        &self,
        database_name: &str,
        kms_key_id: Option<&str>,
    ) -> ProviderResult<DatabaseRecord>;

    async fn delete_database(&self, database_name: &str) -> ProviderResult<()>;

    async fn list_databases(
        &self,
        next_token: Option<&str>,
        max_results: i32,
    ) -> ProviderResult<Page<DatabaseRecord>>;

    async fn create_table(&self, input: CreateTableInput) -> ProviderResult<TableRecord>;

    async fn describe_table(&self, database_name: &str, table_name: &str) -> ProviderResult<TableRecord>;

    async fn update_table(&self, input: UpdateTableInput) -> ProviderResult<TableRecord>;

    /// Starts deleting a table. The table may remain visible for a while.
    async fn delete_table(&self, database_name: &str, table_name: &str) -> ProviderResult<()>;

    async fn list_tables(
        &self,
        database_name: Option<&str>,
        next_token: Option<&str>,
        max_results: i32,
    ) -> ProviderResult<Page<TableRecord>>;
}

/// Timestream Query control-plane operations (scheduled queries).
#[async_trait]
pub trait TimestreamQueryApi: TaggingApi {
    /// Creates a scheduled query and returns its ARN.
    async fn create_scheduled_query(&self, input: CreateScheduledQueryInput) -> ProviderResult<String>;

    async fn describe_scheduled_query(&self, arn: &str) -> ProviderResult<ScheduledQueryRecord>;

    /// Starts deleting a scheduled query.
    async fn delete_scheduled_query(&self, arn: &str) -> ProviderResult<()>;

    async fn list_scheduled_queries(
        &self,
        next_token: Option<&str>,
        max_results: i32,
    ) -> ProviderResult<Page<ScheduledQuerySummary>>;
}

/// One page of a list call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Opaque token for the following page, if any.
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_token: Option<String>) -> Self {
        Self { items, next_token }
    }
}

// =============================================================================
// Databases
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CreateDatabaseInput {
    pub database_name: String,
    pub kms_key_id: Option<String>,
    pub tags: TagMap,
}

/// A database as the provider reports it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DatabaseRecord {
    pub arn: String,
    pub database_name: String,
    pub kms_key_id: Option<String>,
}

// =============================================================================
// Tables
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CreateTableInput {
    pub database_name: String,
    pub table_name: String,
    pub retention: Option<RetentionSettings>,
    pub magnetic_store_write_properties: Option<MagneticStoreWriteProperties>,
    pub schema: Option<Schema>,
    pub tags: TagMap,
}

/// Table update. Only the properties that are set are sent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateTableInput {
    pub database_name: String,
    pub table_name: String,
    pub retention: Option<RetentionSettings>,
    pub magnetic_store_write_properties: Option<MagneticStoreWriteProperties>,
    pub schema: Option<Schema>,
}

/// A table as the provider reports it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableRecord {
    pub arn: String,
    pub database_name: String,
    pub table_name: String,
    /// `ACTIVE`, `DELETING` or `RESTORING`.
    pub table_status: Option<String>,
    pub retention: Option<RetentionSettings>,
    pub magnetic_store_write_properties: Option<MagneticStoreWriteProperties>,
    pub schema: Option<Schema>,
}

// =============================================================================
// Scheduled queries
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CreateScheduledQueryInput {
    pub name: String,
    pub query_string: String,
    pub schedule_configuration: ScheduleConfiguration,
    pub notification_configuration: NotificationConfiguration,
    pub target_configuration: Option<TargetConfiguration>,
    pub client_token: String,
    pub scheduled_query_execution_role_arn: String,
    pub error_report_configuration: ErrorReportConfiguration,
    pub kms_key_id: Option<String>,
    pub tags: TagMap,
}

/// A scheduled query as the provider describes it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScheduledQueryRecord {
    pub arn: String,
    pub name: String,
    /// `ENABLED` or `DISABLED`.
    pub state: String,
    pub query_string: String,
    pub schedule_configuration: Option<ScheduleConfiguration>,
    pub notification_configuration: Option<NotificationConfiguration>,
    pub target_configuration: Option<TargetConfiguration>,
    pub scheduled_query_execution_role_arn: Option<String>,
    pub error_report_configuration: Option<ErrorReportConfiguration>,
    pub kms_key_id: Option<String>,
}

/// A scheduled query as it appears in a list page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScheduledQuerySummary {
    pub arn: String,
    pub name: String,
    pub state: String,
}
