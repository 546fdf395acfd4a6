//! `AWS::Timestream::Database` handler.
//!
//! Every database operation completes within a single invocation; deletes
//! are synchronous at the provider.

use async_trait::async_trait;

use super::tagging::{read_tags, reconcile_tags, update_tag_sets};
use super::{require, HandlerOutcome, ResourceHandler};
use crate::classifier::{classify, ApiOperation, ResourceRef};
use crate::client::{CreateDatabaseInput, TimestreamWriteApi};
use crate::config::HandlerConfig;
use crate::model::database::DATABASE_NAME_MAX_LENGTH;
use crate::model::{DatabaseCallbackContext, DatabaseModel, DATABASE_TYPE_NAME};
use crate::naming::generate_resource_identifier;
use crate::progress::ProgressEvent;
use crate::request::ResourceHandlerRequest;
use crate::tags;

/// Default page size for listing databases.
pub const LIST_PAGE_SIZE: i32 = 10;

type Outcome = HandlerOutcome<DatabaseModel, DatabaseCallbackContext>;

#[derive(Debug, Clone)]
pub struct DatabaseHandler {
    config: HandlerConfig,
}

impl DatabaseHandler {
    pub fn new(config: HandlerConfig) -> Self {
        Self { config }
    }
}

impl Default for DatabaseHandler {
    fn default() -> Self {
        Self::new(HandlerConfig::with_page_size(LIST_PAGE_SIZE))
    }
}

#[async_trait]
impl ResourceHandler for DatabaseHandler {
    type Model = DatabaseModel;
    type Context = DatabaseCallbackContext;
    type Client = dyn TimestreamWriteApi;

    const TYPE_NAME: &'static str = DATABASE_TYPE_NAME;

    async fn create(
        &self,
        client: &Self::Client,
        request: &ResourceHandlerRequest<DatabaseModel>,
    ) -> Outcome {
        let mut model = request.desired_resource_state.clone();
        let database_name = match model.name() {
            Some(name) => name.to_string(),
            None => generate_resource_identifier(
                request.logical_resource_identifier.as_deref(),
                &request.client_request_token,
                DATABASE_NAME_MAX_LENGTH,
            ),
        };
        let resource = ResourceRef::database(&database_name);

        let input = CreateDatabaseInput {
            database_name: database_name.clone(),
            kms_key_id: model.kms_key_id.clone(),
            tags: tags::merge_for_create(
                model.tags.as_deref(),
                request.desired_resource_tags.as_ref(),
                request.system_tags.as_ref(),
            ),
        };
        let record = client
            .create_database(input)
            .await
            .map_err(|e| classify(ApiOperation::CreateDatabase, &e, &resource))?;

        tracing::info!(database_name = %database_name, arn = %record.arn, "Database created");
        model.database_name = Some(database_name);
        model.arn = Some(record.arn);
        Ok(ProgressEvent::success(Some(model)))
    }

    async fn read(
        &self,
        client: &Self::Client,
        request: &ResourceHandlerRequest<DatabaseModel>,
    ) -> Outcome {
        let mut model = request.desired_resource_state.clone();
        let database_name = require(model.name(), "DatabaseName")?.to_string();
        let resource = ResourceRef::database(&database_name);

        let record = client
            .describe_database(&database_name)
            .await
            .map_err(|e| classify(ApiOperation::DescribeDatabase, &e, &resource))?;
        model.tags = read_tags(client, &record.arn, &resource).await?;
        model.kms_key_id = record.kms_key_id;
        model.arn = Some(record.arn);
        Ok(ProgressEvent::success(Some(model)))
    }

    async fn update(
        &self,
        client: &Self::Client,
        request: &ResourceHandlerRequest<DatabaseModel>,
    ) -> Outcome {
        let mut model = request.desired_resource_state.clone();
        let database_name = require(model.name(), "DatabaseName")?.to_string();
        let resource = ResourceRef::database(&database_name);
        let previous = request.previous_resource_state.clone().unwrap_or_default();

        if model.kms_key_id != previous.kms_key_id {
            client
                .update_database(&database_name, model.kms_key_id.as_deref())
                .await
                .map_err(|e| classify(ApiOperation::UpdateDatabase, &e, &resource))?;
            tracing::info!(database_name = %database_name, "Database KMS key updated");
        }

        let record = client
            .describe_database(&database_name)
            .await
            .map_err(|e| classify(ApiOperation::DescribeDatabase, &e, &resource))?;
        let (previous_tags, desired_tags) =
            update_tag_sets(request, model.tags.as_deref(), previous.tags.as_deref());
        reconcile_tags(client, &record.arn, &previous_tags, &desired_tags, &resource).await?;

        model.arn = Some(record.arn);
        Ok(ProgressEvent::success(Some(model)))
    }

    async fn delete(
        &self,
        client: &Self::Client,
        request: &ResourceHandlerRequest<DatabaseModel>,
        _context: Option<DatabaseCallbackContext>,
    ) -> Outcome {
        let database_name = require(request.desired_resource_state.name(), "DatabaseName")?;
        let resource = ResourceRef::database(database_name);

        client
            .delete_database(database_name)
            .await
            .map_err(|e| classify(ApiOperation::DeleteDatabase, &e, &resource))?;
        tracing::info!(database_name, "Database deleted");
        Ok(ProgressEvent::success(None))
    }

    async fn list(
        &self,
        client: &Self::Client,
        request: &ResourceHandlerRequest<DatabaseModel>,
    ) -> Outcome {
        let page = client
            .list_databases(request.next_token.as_deref(), self.config.list_page_size)
            .await
            .map_err(|e| classify(ApiOperation::ListDatabases, &e, &ResourceRef::database("")))?;

        let models = page
            .items
            .into_iter()
            .map(|database| DatabaseModel::named(database.database_name))
            .collect();
        Ok(ProgressEvent::listed(models, page.next_token))
    }
}
