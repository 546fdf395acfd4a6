//! `AWS::Timestream::ScheduledQuery` handler.
//!
//! Scheduled queries are identified by ARN. Only tags can change in place;
//! deletes are asynchronous and resumed through a
//! [`ScheduledQueryCallbackContext`].

use async_trait::async_trait;

use super::delete::{reconcile_delete, DeleteProgress, DeleteState, DeleteTarget};
use super::tagging::{read_tags, reconcile_tags, update_tag_sets};
use super::{HandlerOutcome, ResourceHandler};
use crate::classifier::{classify, ApiOperation, ResourceRef};
use crate::client::{CreateScheduledQueryInput, ScheduledQueryRecord, TimestreamQueryApi};
use crate::config::HandlerConfig;
use crate::error::{HandlerError, HandlerResult, ProviderResult};
use crate::model::scheduled_query::{ScheduledQueryDefinition, SCHEDULED_QUERY_NAME_MAX_LENGTH};
use crate::model::{non_empty, ScheduledQueryCallbackContext, ScheduledQueryModel, SCHEDULED_QUERY_TYPE_NAME};
use crate::naming::{generate_resource_identifier, idempotency_token};
use crate::progress::ProgressEvent;
use crate::request::ResourceHandlerRequest;
use crate::tags;

/// Default page size for listing scheduled queries.
pub const LIST_PAGE_SIZE: i32 = 30;

type Outcome = HandlerOutcome<ScheduledQueryModel, ScheduledQueryCallbackContext>;

#[derive(Debug, Clone)]
pub struct ScheduledQueryHandler {
    config: HandlerConfig,
}

impl ScheduledQueryHandler {
    pub fn new(config: HandlerConfig) -> Self {
        Self { config }
    }
}

impl Default for ScheduledQueryHandler {
    fn default() -> Self {
        Self::new(HandlerConfig::with_page_size(LIST_PAGE_SIZE))
    }
}

/// The ARN of the addressed query, falling back to the previous state.
fn arn_of(request: &ResourceHandlerRequest<ScheduledQueryModel>) -> HandlerResult<String> {
    request
        .desired_resource_state
        .arn()
        .or_else(|| request.previous_resource_state.as_ref().and_then(|p| p.arn()))
        .map(str::to_string)
        .ok_or_else(|| HandlerError::not_found(SCHEDULED_QUERY_TYPE_NAME, "<missing Arn>"))
}

/// Rebuilds the create-time definition from what the provider describes.
fn definition_of(record: &ScheduledQueryRecord) -> Option<ScheduledQueryDefinition> {
    Some(ScheduledQueryDefinition {
        query_string: record.query_string.clone(),
        schedule_configuration: record.schedule_configuration.clone()?,
        notification_configuration: record.notification_configuration.clone()?,
        scheduled_query_execution_role_arn: record.scheduled_query_execution_role_arn.clone()?,
        error_report_configuration: record.error_report_configuration.clone()?,
        target_configuration: record.target_configuration.clone(),
        kms_key_id: record.kms_key_id.clone(),
    })
}

#[async_trait]
impl ResourceHandler for ScheduledQueryHandler {
    type Model = ScheduledQueryModel;
    type Context = ScheduledQueryCallbackContext;
    type Client = dyn TimestreamQueryApi;

    const TYPE_NAME: &'static str = SCHEDULED_QUERY_TYPE_NAME;

    async fn create(
        &self,
        client: &Self::Client,
        request: &ResourceHandlerRequest<ScheduledQueryModel>,
    ) -> Outcome {
        let mut model = request.desired_resource_state.clone();
        let definition = model.definition()?;
        let name = match model.name() {
            Some(name) => name.to_string(),
            None => generate_resource_identifier(
                request.logical_resource_identifier.as_deref(),
                &request.client_request_token,
                SCHEDULED_QUERY_NAME_MAX_LENGTH,
            ),
        };
        let client_token = match non_empty(model.client_token.as_deref()) {
            Some(token) => token.to_string(),
            None => idempotency_token(&request.client_request_token, SCHEDULED_QUERY_TYPE_NAME),
        };
        let resource = ResourceRef::scheduled_query(&name);

        let input = CreateScheduledQueryInput {
            name: name.clone(),
            query_string: definition.query_string.clone(),
            schedule_configuration: definition.schedule_configuration.clone(),
            notification_configuration: definition.notification_configuration.clone(),
            target_configuration: definition.target_configuration.clone(),
            client_token: client_token.clone(),
            scheduled_query_execution_role_arn: definition.scheduled_query_execution_role_arn.clone(),
            error_report_configuration: definition.error_report_configuration.clone(),
            kms_key_id: definition.kms_key_id.clone(),
            tags: tags::merge_for_create(
                model.tags.as_deref(),
                request.desired_resource_tags.as_ref(),
                request.system_tags.as_ref(),
            ),
        };
        let arn = client
            .create_scheduled_query(input)
            .await
            .map_err(|e| classify(ApiOperation::CreateScheduledQuery, &e, &resource))?;

        tracing::info!(name = %name, arn = %arn, "Scheduled query created");
        model.set_summary(&name, &definition);
        model.scheduled_query_name = Some(name);
        model.client_token = Some(client_token);
        model.arn = Some(arn);
        Ok(ProgressEvent::success(Some(model)))
    }

    async fn read(
        &self,
        client: &Self::Client,
        request: &ResourceHandlerRequest<ScheduledQueryModel>,
    ) -> Outcome {
        let mut model = request.desired_resource_state.clone();
        let arn = arn_of(request)?;
        let resource = ResourceRef::scheduled_query(&arn);

        let record = client
            .describe_scheduled_query(&arn)
            .await
            .map_err(|e| classify(ApiOperation::DescribeScheduledQuery, &e, &resource))?;
        model.tags = read_tags(client, &arn, &resource).await?;

        match definition_of(&record) {
            Some(definition) => model.set_summary(&record.name, &definition),
            None => {
                tracing::warn!(arn = %arn, "Scheduled query description is incomplete");
                model.sq_name = Some(record.name.clone());
                model.sq_query_string = Some(record.query_string.clone());
            }
        }
        model.arn = Some(record.arn);
        Ok(ProgressEvent::success(Some(model)))
    }

    async fn update(
        &self,
        client: &Self::Client,
        request: &ResourceHandlerRequest<ScheduledQueryModel>,
    ) -> Outcome {
        let mut model = request.desired_resource_state.clone();
        let arn = arn_of(request)?;
        let resource = ResourceRef::scheduled_query(&arn);
        let previous = request.previous_resource_state.as_ref();

        if let Some(previous) = previous {
            let changed = model.create_only_changes(previous);
            if !changed.is_empty() {
                return Err(HandlerError::invalid_request(format!(
                    "Properties {} of {arn} cannot be updated in place",
                    changed.join(", ")
                )));
            }
        }

        let (previous_tags, desired_tags) = update_tag_sets(
            request,
            model.tags.as_deref(),
            previous.and_then(|p| p.tags.as_deref()),
        );
        reconcile_tags(client, &arn, &previous_tags, &desired_tags, &resource).await?;

        model.arn = Some(arn);
        Ok(ProgressEvent::success(Some(model)))
    }

    async fn delete(
        &self,
        client: &Self::Client,
        request: &ResourceHandlerRequest<ScheduledQueryModel>,
        context: Option<ScheduledQueryCallbackContext>,
    ) -> Outcome {
        let arn = arn_of(request)?;
        let target = ScheduledQueryDeleteTarget { client, arn: &arn };

        match reconcile_delete(&target, context.map(DeleteState::from)).await? {
            DeleteProgress::Deleted => {
                tracing::info!(arn = %arn, "Scheduled query deleted");
                Ok(ProgressEvent::success(None))
            }
            DeleteProgress::Pending(state) => Ok(ProgressEvent::in_progress(
                request.desired_resource_state.clone(),
                state.into(),
                self.config.callback_delay_seconds,
            )),
        }
    }

    async fn list(
        &self,
        client: &Self::Client,
        request: &ResourceHandlerRequest<ScheduledQueryModel>,
    ) -> Outcome {
        let page = client
            .list_scheduled_queries(request.next_token.as_deref(), self.config.list_page_size)
            .await
            .map_err(|e| {
                classify(ApiOperation::ListScheduledQueries, &e, &ResourceRef::scheduled_query(""))
            })?;

        let models = page
            .items
            .into_iter()
            .map(|query| ScheduledQueryModel::with_arn(query.arn))
            .collect();
        Ok(ProgressEvent::listed(models, page.next_token))
    }
}

struct ScheduledQueryDeleteTarget<'a> {
    client: &'a dyn TimestreamQueryApi,
    arn: &'a str,
}

#[async_trait]
impl DeleteTarget for ScheduledQueryDeleteTarget<'_> {
    fn resource(&self) -> ResourceRef {
        ResourceRef::scheduled_query(self.arn)
    }

    fn delete_operation(&self) -> ApiOperation {
        ApiOperation::DeleteScheduledQuery
    }

    fn describe_operation(&self) -> ApiOperation {
        ApiOperation::DescribeScheduledQuery
    }

    async fn issue_delete(&self) -> ProviderResult<()> {
        self.client.delete_scheduled_query(self.arn).await
    }

    async fn describe(&self) -> ProviderResult<Option<String>> {
        let record = self.client.describe_scheduled_query(self.arn).await?;
        Ok(Some(record.state))
    }
}
