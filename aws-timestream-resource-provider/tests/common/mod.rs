//! Shared test utilities for integration tests.
//!
//! This module provides a scripted in-memory Timestream client and helpers
//! for building requests and records used across integration tests.

#![allow(dead_code)] // These utilities are used by other integration test files

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use aws_timestream_resource_provider::client::{
    CreateDatabaseInput, CreateScheduledQueryInput, CreateTableInput, DatabaseRecord, Page,
    ScheduledQueryRecord, ScheduledQuerySummary, TableRecord, TaggingApi, TimestreamQueryApi,
    TimestreamWriteApi, UpdateTableInput,
};
use aws_timestream_resource_provider::error::{ProviderError, ProviderResult};
use aws_timestream_resource_provider::tags::TagMap;

pub const ACCOUNT: &str = "123456789012";
pub const REGION: &str = "us-east-1";

pub fn database_arn(database_name: &str) -> String {
    format!("arn:aws:timestream:{REGION}:{ACCOUNT}:database/{database_name}")
}

pub fn table_arn(database_name: &str, table_name: &str) -> String {
    format!("arn:aws:timestream:{REGION}:{ACCOUNT}:database/{database_name}/table/{table_name}")
}

pub fn scheduled_query_arn(name: &str) -> String {
    format!("arn:aws:timestream:{REGION}:{ACCOUNT}:scheduled-query/{name}")
}

pub fn tag_map(pairs: &[(&str, &str)]) -> TagMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// =============================================================================
// Mock Client for Integration Tests
// =============================================================================

/// Record of a call made against the mock, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListTagsForResource(String),
    TagResource { arn: String, tags: TagMap },
    UntagResource { arn: String, tag_keys: Vec<String> },
    CreateDatabase(CreateDatabaseInput),
    DescribeDatabase(String),
    UpdateDatabase { database_name: String, kms_key_id: Option<String> },
    DeleteDatabase(String),
    ListDatabases { next_token: Option<String>, max_results: i32 },
    CreateTable(CreateTableInput),
    DescribeTable { database_name: String, table_name: String },
    UpdateTable(UpdateTableInput),
    DeleteTable { database_name: String, table_name: String },
    ListTables { database_name: Option<String>, next_token: Option<String>, max_results: i32 },
    CreateScheduledQuery(CreateScheduledQueryInput),
    DescribeScheduledQuery(String),
    DeleteScheduledQuery(String),
    ListScheduledQueries { next_token: Option<String>, max_results: i32 },
}

/// Queue of scripted results for one operation.
struct Script<T>(Mutex<VecDeque<ProviderResult<T>>>);

impl<T> Script<T> {
    fn new() -> Self {
        Self(Mutex::new(VecDeque::new()))
    }

    fn push(&self, result: ProviderResult<T>) {
        self.0.lock().unwrap().push_back(result);
    }

    /// Pops the next scripted result, or builds the default one.
    fn next_or(&self, default: impl FnOnce() -> ProviderResult<T>) -> ProviderResult<T> {
        self.0.lock().unwrap().pop_front().unwrap_or_else(default)
    }
}

/// A mock implementation of the Timestream APIs for integration tests.
///
/// Each operation answers with the next scripted result, or with a
/// plausible default when nothing is scripted: creates and updates echo
/// their input, describes report an active resource, deletes and tagging
/// calls succeed, and lists return an empty last page.
pub struct MockTimestreamClient {
    calls: Mutex<Vec<Call>>,
    list_tags: Script<TagMap>,
    tag_resource: Script<()>,
    untag_resource: Script<()>,
    create_database: Script<DatabaseRecord>,
    describe_database: Script<DatabaseRecord>,
    update_database: Script<DatabaseRecord>,
    delete_database: Script<()>,
    list_databases: Script<Page<DatabaseRecord>>,
    create_table: Script<TableRecord>,
    describe_table: Script<TableRecord>,
    update_table: Script<TableRecord>,
    delete_table: Script<()>,
    list_tables: Script<Page<TableRecord>>,
    create_scheduled_query: Script<String>,
    describe_scheduled_query: Script<ScheduledQueryRecord>,
    delete_scheduled_query: Script<()>,
    list_scheduled_queries: Script<Page<ScheduledQuerySummary>>,
}

impl MockTimestreamClient {
    /// Creates a mock with no scripted responses.
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            list_tags: Script::new(),
            tag_resource: Script::new(),
            untag_resource: Script::new(),
            create_database: Script::new(),
            describe_database: Script::new(),
            update_database: Script::new(),
            delete_database: Script::new(),
            list_databases: Script::new(),
            create_table: Script::new(),
            describe_table: Script::new(),
            update_table: Script::new(),
            delete_table: Script::new(),
            list_tables: Script::new(),
            create_scheduled_query: Script::new(),
            describe_scheduled_query: Script::new(),
            delete_scheduled_query: Script::new(),
            list_scheduled_queries: Script::new(),
        }
    }

    pub fn with_list_tags(self, result: ProviderResult<TagMap>) -> Self {
        self.list_tags.push(result);
        self
    }

    pub fn with_tag_resource(self, result: ProviderResult<()>) -> Self {
        self.tag_resource.push(result);
        self
    }

    pub fn with_untag_resource(self, result: ProviderResult<()>) -> Self {
        self.untag_resource.push(result);
        self
    }

    pub fn with_create_database(self, result: ProviderResult<DatabaseRecord>) -> Self {
        self.create_database.push(result);
        self
    }

    pub fn with_describe_database(self, result: ProviderResult<DatabaseRecord>) -> Self {
        self.describe_database.push(result);
        self
    }

    pub fn with_update_database(self, result: ProviderResult<DatabaseRecord>) -> Self {
        self.update_database.push(result);
        self
    }

    pub fn with_delete_database(self, result: ProviderResult<()>) -> Self {
        self.delete_database.push(result);
        self
    }

    pub fn with_list_databases(self, result: ProviderResult<Page<DatabaseRecord>>) -> Self {
        self.list_databases.push(result);
        self
    }

    pub fn with_create_table(self, result: ProviderResult<TableRecord>) -> Self {
        self.create_table.push(result);
        self
    }

    pub fn with_describe_table(self, result: ProviderResult<TableRecord>) -> Self {
        self.describe_table.push(result);
        self
    }

    pub fn with_update_table(self, result: ProviderResult<TableRecord>) -> Self {
        self.update_table.push(result);
        self
    }

    pub fn with_delete_table(self, result: ProviderResult<()>) -> Self {
        self.delete_table.push(result);
        self
    }

    pub fn with_list_tables(self, result: ProviderResult<Page<TableRecord>>) -> Self {
        self.list_tables.push(result);
        self
    }

    pub fn with_create_scheduled_query(self, result: ProviderResult<String>) -> Self {
        self.create_scheduled_query.push(result);
        self
    }

    pub fn with_describe_scheduled_query(self, result: ProviderResult<ScheduledQueryRecord>) -> Self {
        self.describe_scheduled_query.push(result);
        self
    }

    pub fn with_delete_scheduled_query(self, result: ProviderResult<()>) -> Self {
        self.delete_scheduled_query.push(result);
        self
    }

    pub fn with_list_scheduled_queries(
        self,
        result: ProviderResult<Page<ScheduledQuerySummary>>,
    ) -> Self {
        self.list_scheduled_queries.push(result);
        self
    }

    /// Returns all calls made to this mock.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Returns the calls matching `predicate`.
    pub fn calls_matching(&self, predicate: impl Fn(&Call) -> bool) -> Vec<Call> {
        self.calls().into_iter().filter(|c| predicate(c)).collect()
    }

    /// Returns only the tagging calls (tag and untag), in order.
    pub fn tag_mutations(&self) -> Vec<Call> {
        self.calls_matching(|c| matches!(c, Call::TagResource { .. } | Call::UntagResource { .. }))
    }

    /// This mock as the Timestream Write API, as the table and database
    /// handlers take it.
    pub fn write_api(&self) -> &(dyn TimestreamWriteApi + 'static) {
        self
    }

    /// This mock as the Timestream Query API.
    pub fn query_api(&self) -> &(dyn TimestreamQueryApi + 'static) {
        self
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Default for MockTimestreamClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaggingApi for MockTimestreamClient {
    async fn list_tags_for_resource(&self, resource_arn: &str) -> ProviderResult<TagMap> {
        self.record(Call::ListTagsForResource(resource_arn.to_string()));
        self.list_tags.next_or(|| Ok(TagMap::new()))
    }

    async fn tag_resource(&self, resource_arn: &str, tags: &TagMap) -> ProviderResult<()> {
        self.record(Call::TagResource {
            arn: resource_arn.to_string(),
            tags: tags.clone(),
        });
        self.tag_resource.next_or(|| Ok(()))
    }

    async fn untag_resource(&self, resource_arn: &str, tag_keys: &[String]) -> ProviderResult<()> {
        self.record(Call::UntagResource {
            arn: resource_arn.to_string(),
            tag_keys: tag_keys.to_vec(),
        });
        self.untag_resource.next_or(|| Ok(()))
    }
}

#[async_trait]
impl TimestreamWriteApi for MockTimestreamClient {
    async fn create_database(&self, input: CreateDatabaseInput) -> ProviderResult<DatabaseRecord> {
        self.record(Call::CreateDatabase(input.clone()));
        self.create_database.next_or(|| {
            Ok(DatabaseRecord {
                arn: database_arn(&input.database_name),
                database_name: input.database_name,
                kms_key_id: input.kms_key_id,
            })
        })
    }

    async fn describe_database(&self, database_name: &str) -> ProviderResult<DatabaseRecord> {
        self.record(Call::DescribeDatabase(database_name.to_string()));
        self.describe_database.next_or(|| Ok(database_record(database_name)))
    }

    async fn update_database(
        &self,
        database_name: &str,
        kms_key_id: Option<&str>,
    ) -> ProviderResult<DatabaseRecord> {
        self.record(Call::UpdateDatabase {
            database_name: database_name.to_string(),
            kms_key_id: kms_key_id.map(str::to_string),
        });
        self.update_database.next_or(|| {
            Ok(DatabaseRecord {
                kms_key_id: kms_key_id.map(str::to_string),
                ..database_record(database_name)
            })
        })
    }

    async fn delete_database(&self, database_name: &str) -> ProviderResult<()> {
        self.record(Call::DeleteDatabase(database_name.to_string()));
        self.delete_database.next_or(|| Ok(()))
    }

    async fn list_databases(
        &self,
        next_token: Option<&str>,
        max_results: i32,
    ) -> ProviderResult<Page<DatabaseRecord>> {
        self.record(Call::ListDatabases {
            next_token: next_token.map(str::to_string),
            max_results,
        });
        self.list_databases.next_or(|| Ok(Page::new(Vec::new(), None)))
    }

    async fn create_table(&self, input: CreateTableInput) -> ProviderResult<TableRecord> {
        self.record(Call::CreateTable(input.clone()));
        self.create_table.next_or(|| {
            Ok(TableRecord {
                retention: input.retention,
                magnetic_store_write_properties: input.magnetic_store_write_properties,
                schema: input.schema,
                ..table_record(&input.database_name, &input.table_name)
            })
        })
    }

    async fn describe_table(&self, database_name: &str, table_name: &str) -> ProviderResult<TableRecord> {
        self.record(Call::DescribeTable {
            database_name: database_name.to_string(),
            table_name: table_name.to_string(),
        });
        self.describe_table.next_or(|| Ok(table_record(database_name, table_name)))
    }

    async fn update_table(&self, input: UpdateTableInput) -> ProviderResult<TableRecord> {
        self.record(Call::UpdateTable(input.clone()));
        self.update_table.next_or(|| {
            Ok(TableRecord {
                retention: input.retention,
                magnetic_store_write_properties: input.magnetic_store_write_properties,
                schema: input.schema,
                ..table_record(&input.database_name, &input.table_name)
            })
        })
    }

    async fn delete_table(&self, database_name: &str, table_name: &str) -> ProviderResult<()> {
        self.record(Call::DeleteTable {
            database_name: database_name.to_string(),
            table_name: table_name.to_string(),
        });
        self.delete_table.next_or(|| Ok(()))
    }

    async fn list_tables(
        &self,
        database_name: Option<&str>,
        next_token: Option<&str>,
        max_results: i32,
    ) -> ProviderResult<Page<TableRecord>> {
        self.record(Call::ListTables {
            database_name: database_name.map(str::to_string),
            next_token: next_token.map(str::to_string),
            max_results,
        });
        self.list_tables.next_or(|| Ok(Page::new(Vec::new(), None)))
    }
}

#[async_trait]
impl TimestreamQueryApi for MockTimestreamClient {
    async fn create_scheduled_query(&self, input: CreateScheduledQueryInput) -> ProviderResult<String> {
        self.record(Call::CreateScheduledQuery(input.clone()));
        self.create_scheduled_query.next_or(|| Ok(scheduled_query_arn(&input.name)))
    }

    async fn describe_scheduled_query(&self, arn: &str) -> ProviderResult<ScheduledQueryRecord> {
        self.record(Call::DescribeScheduledQuery(arn.to_string()));
        self.describe_scheduled_query.next_or(|| {
            Ok(ScheduledQueryRecord {
                arn: arn.to_string(),
                state: "ENABLED".to_string(),
                ..ScheduledQueryRecord::default()
            })
        })
    }

    async fn delete_scheduled_query(&self, arn: &str) -> ProviderResult<()> {
        self.record(Call::DeleteScheduledQuery(arn.to_string()));
        self.delete_scheduled_query.next_or(|| Ok(()))
    }

    async fn list_scheduled_queries(
        &self,
        next_token: Option<&str>,
        max_results: i32,
    ) -> ProviderResult<Page<ScheduledQuerySummary>> {
        self.record(Call::ListScheduledQueries {
            next_token: next_token.map(str::to_string),
            max_results,
        });
        self.list_scheduled_queries.next_or(|| Ok(Page::new(Vec::new(), None)))
    }
}

// =============================================================================
// Test Helper Functions
// =============================================================================

/// An existing database without a customer key.
pub fn database_record(database_name: &str) -> DatabaseRecord {
    DatabaseRecord {
        arn: database_arn(database_name),
        database_name: database_name.to_string(),
        kms_key_id: None,
    }
}

/// An active table with no reported properties.
pub fn table_record(database_name: &str, table_name: &str) -> TableRecord {
    TableRecord {
        arn: table_arn(database_name, table_name),
        database_name: database_name.to_string(),
        table_name: table_name.to_string(),
        table_status: Some("ACTIVE".to_string()),
        ..TableRecord::default()
    }
}

/// A table record in the given status.
pub fn table_in_status(database_name: &str, table_name: &str, status: &str) -> TableRecord {
    TableRecord {
        table_status: Some(status.to_string()),
        ..table_record(database_name, table_name)
    }
}

pub fn not_found() -> ProviderError {
    ProviderError::not_found("The resource could not be found.")
}
