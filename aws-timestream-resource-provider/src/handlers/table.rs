//! `AWS::Timestream::Table` handler.
//!
//! Table deletes are asynchronous at the provider and are driven by
//! [`reconcile_delete`] across invocations, with progress echoed in a
//! [`TableCallbackContext`].

use async_trait::async_trait;

use super::delete::{reconcile_delete, DeleteProgress, DeleteState, DeleteTarget};
use super::tagging::{read_tags, reconcile_tags, update_tag_sets};
use super::{require, HandlerOutcome, ResourceHandler};
use crate::classifier::{classify, ApiOperation, ResourceRef};
use crate::client::{CreateTableInput, TableRecord, TimestreamWriteApi, UpdateTableInput};
use crate::config::HandlerConfig;
use crate::error::{HandlerResult, ProviderResult};
use crate::model::table::TABLE_NAME_MAX_LENGTH;
use crate::model::{TableCallbackContext, TableModel, TABLE_TYPE_NAME};
use crate::naming::generate_resource_identifier;
use crate::progress::ProgressEvent;
use crate::request::ResourceHandlerRequest;
use crate::tags;

/// Default page size for listing tables.
pub const LIST_PAGE_SIZE: i32 = 10;

type Outcome = HandlerOutcome<TableModel, TableCallbackContext>;

#[derive(Debug, Clone)]
pub struct TableHandler {
    config: HandlerConfig,
}

impl TableHandler {
    pub fn new(config: HandlerConfig) -> Self {
        Self { config }
    }
}

impl Default for TableHandler {
    fn default() -> Self {
        Self::new(HandlerConfig::with_page_size(LIST_PAGE_SIZE))
    }
}

/// Database and table name of an existing table.
fn identity(model: &TableModel) -> HandlerResult<(&str, &str)> {
    Ok((
        require(model.database(), "DatabaseName")?,
        require(model.table(), "TableName")?,
    ))
}

/// Copies what the provider reports into `model`.
fn apply_record(model: &mut TableModel, record: TableRecord) {
    model.arn = Some(record.arn);
    model.name = Some(record.table_name);
    model.retention_properties = record.retention.map(Into::into);
    model.magnetic_store_write_properties = record.magnetic_store_write_properties;
    model.schema = record.schema;
}

#[async_trait]
impl ResourceHandler for TableHandler {
    type Model = TableModel;
    type Context = TableCallbackContext;
    type Client = dyn TimestreamWriteApi;

    const TYPE_NAME: &'static str = TABLE_TYPE_NAME;

    async fn create(&self, client: &Self::Client, request: &ResourceHandlerRequest<TableModel>) -> Outcome {
        let mut model = request.desired_resource_state.clone();
        let database_name = require(model.database(), "DatabaseName")?.to_string();
        let table_name = match model.table() {
            Some(name) => name.to_string(),
            None => generate_resource_identifier(
                request.logical_resource_identifier.as_deref(),
                &request.client_request_token,
                TABLE_NAME_MAX_LENGTH,
            ),
        };
        let resource = ResourceRef::table(&database_name, &table_name);

        let retention = model
            .retention_properties
            .as_ref()
            .map(|retention| retention.resolve(None))
            .transpose()?;
        let input = CreateTableInput {
            database_name: database_name.clone(),
            table_name: table_name.clone(),
            retention,
            magnetic_store_write_properties: model.magnetic_store_write_properties.clone(),
            schema: model.schema.clone(),
            tags: tags::merge_for_create(
                model.tags.as_deref(),
                request.desired_resource_tags.as_ref(),
                request.system_tags.as_ref(),
            ),
        };
        let record = client
            .create_table(input)
            .await
            .map_err(|e| classify(ApiOperation::CreateTable, &e, &resource))?;

        tracing::info!(database_name = %database_name, table_name = %table_name, "Table created");
        model.table_name = Some(table_name.clone());
        model.name = Some(table_name);
        model.arn = Some(record.arn);
        Ok(ProgressEvent::success(Some(model)))
    }

    async fn read(&self, client: &Self::Client, request: &ResourceHandlerRequest<TableModel>) -> Outcome {
        let mut model = request.desired_resource_state.clone();
        let (database_name, table_name) = identity(&model)?;
        let resource = ResourceRef::table(database_name, table_name);

        let record = client
            .describe_table(database_name, table_name)
            .await
            .map_err(|e| classify(ApiOperation::DescribeTable, &e, &resource))?;
        let tags = read_tags(client, &record.arn, &resource).await?;
        apply_record(&mut model, record);
        model.tags = tags;
        Ok(ProgressEvent::success(Some(model)))
    }

    async fn update(&self, client: &Self::Client, request: &ResourceHandlerRequest<TableModel>) -> Outcome {
        let mut model = request.desired_resource_state.clone();
        let (database_name, table_name) = identity(&model)?;
        let (database_name, table_name) = (database_name.to_string(), table_name.to_string());
        let resource = ResourceRef::table(&database_name, &table_name);

        let needs_current = model.retention_properties.as_ref().map_or(true, |r| r.is_partial())
            || model.magnetic_store_write_properties.is_none();
        let current = if needs_current {
            Some(
                client
                    .describe_table(&database_name, &table_name)
                    .await
                    .map_err(|e| classify(ApiOperation::DescribeTable, &e, &resource))?,
            )
        } else {
            None
        };
        let current_retention = current.as_ref().and_then(|record| record.retention);

        let retention = match &model.retention_properties {
            Some(retention) => Some(retention.resolve(current_retention)?),
            None => current_retention,
        };
        let magnetic_store_write_properties = model
            .magnetic_store_write_properties
            .clone()
            .or_else(|| current.and_then(|record| record.magnetic_store_write_properties));

        let record = client
            .update_table(UpdateTableInput {
                database_name: database_name.clone(),
                table_name: table_name.clone(),
                retention,
                magnetic_store_write_properties,
                schema: model.schema.clone(),
            })
            .await
            .map_err(|e| classify(ApiOperation::UpdateTable, &e, &resource))?;
        tracing::info!(database_name = %database_name, table_name = %table_name, "Table updated");

        let previous = request.previous_resource_state.as_ref();
        let (previous_tags, desired_tags) = update_tag_sets(
            request,
            model.tags.as_deref(),
            previous.and_then(|p| p.tags.as_deref()),
        );
        reconcile_tags(client, &record.arn, &previous_tags, &desired_tags, &resource).await?;

        model.name = Some(table_name);
        model.arn = Some(record.arn);
        Ok(ProgressEvent::success(Some(model)))
    }

    async fn delete(
        &self,
        client: &Self::Client,
        request: &ResourceHandlerRequest<TableModel>,
        context: Option<TableCallbackContext>,
    ) -> Outcome {
        let model = &request.desired_resource_state;
        let (database_name, table_name) = identity(model)?;
        let target = TableDeleteTarget {
            client,
            database_name,
            table_name,
        };

        match reconcile_delete(&target, context.map(DeleteState::from)).await? {
            DeleteProgress::Deleted => {
                tracing::info!(database_name, table_name, "Table deleted");
                Ok(ProgressEvent::success(None))
            }
            DeleteProgress::Pending(state) => Ok(ProgressEvent::in_progress(
                model.clone(),
                state.into(),
                self.config.callback_delay_seconds,
            )),
        }
    }

    async fn list(&self, client: &Self::Client, request: &ResourceHandlerRequest<TableModel>) -> Outcome {
        let database_name = request.desired_resource_state.database();
        let scope = ResourceRef::table(database_name.unwrap_or_default(), "");

        let page = client
            .list_tables(
                database_name,
                request.next_token.as_deref(),
                self.config.list_page_size,
            )
            .await
            .map_err(|e| classify(ApiOperation::ListTables, &e, &scope))?;

        let models = page
            .items
            .into_iter()
            .map(|table| TableModel::new(table.database_name, table.table_name))
            .collect();
        Ok(ProgressEvent::listed(models, page.next_token))
    }
}

struct TableDeleteTarget<'a> {
    client: &'a dyn TimestreamWriteApi,
    database_name: &'a str,
    table_name: &'a str,
}

#[async_trait]
impl DeleteTarget for TableDeleteTarget<'_> {
    fn resource(&self) -> ResourceRef {
        ResourceRef::table(self.database_name, self.table_name)
    }

    fn delete_operation(&self) -> ApiOperation {
        ApiOperation::DeleteTable
    }

    fn describe_operation(&self) -> ApiOperation {
        ApiOperation::DescribeTable
    }

    async fn issue_delete(&self) -> ProviderResult<()> {
        self.client.delete_table(self.database_name, self.table_name).await
    }

    async fn describe(&self) -> ProviderResult<Option<String>> {
        let record = self
            .client
            .describe_table(self.database_name, self.table_name)
            .await?;
        Ok(record.table_status)
    }
}
