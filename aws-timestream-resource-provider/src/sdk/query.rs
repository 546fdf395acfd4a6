//! Timestream Query client: scheduled queries and their tags.

use async_trait::async_trait;
use aws_sdk_timestreamquery::types::{
    DimensionMapping, DimensionValueType, ErrorReportConfiguration, MeasureValueType,
    MixedMeasureMapping, MultiMeasureAttributeMapping, MultiMeasureMappings,
    NotificationConfiguration, S3Configuration, S3EncryptionOption, ScalarMeasureValueType,
    ScheduleConfiguration, ScheduledQueryDescription, ScheduledQueryState, SnsConfiguration, Tag,
    TargetConfiguration, TimestreamConfiguration,
};
use aws_sdk_timestreamquery::Client;

use super::{build_error, endpoint_url, items, load_sdk_config, optional, owned, provider_error};
use crate::client::{
    CreateScheduledQueryInput, Page, ScheduledQueryRecord, ScheduledQuerySummary, TaggingApi,
    TimestreamQueryApi,
};
use crate::config::ProviderConfig;
use crate::error::{ProviderError, ProviderResult};
use crate::lambda::Credentials;
use crate::model::scheduled_query as model;
use crate::tags::TagMap;

/// [`TimestreamQueryApi`] over `aws-sdk-timestreamquery`.
#[derive(Debug, Clone)]
pub struct SdkTimestreamQueryClient {
    client: Client,
}

impl SdkTimestreamQueryClient {
    /// Builds a client for the account's discovered query endpoint, or for
    /// the configured endpoint override.
    pub async fn connect(config: &ProviderConfig, credentials: Option<&Credentials>) -> ProviderResult<Self> {
        let sdk_config = load_sdk_config(config, credentials).await;
        let endpoint = match &config.endpoint_url {
            Some(url) => url.clone(),
            None => discover_endpoint(&Client::new(&sdk_config)).await?,
        };
        tracing::debug!(region = %config.region, endpoint = %endpoint, "Timestream Query endpoint");

        let client_config = aws_sdk_timestreamquery::config::Builder::from(&sdk_config)
            .endpoint_url(endpoint)
            .build();
        Ok(Self::from_client(Client::from_conf(client_config)))
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

async fn discover_endpoint(client: &Client) -> ProviderResult<String> {
    let output = client
        .describe_endpoints()
        .send()
        .await
        .map_err(provider_error)?;
    items(output.endpoints())
        .first()
        .map(|endpoint| endpoint_url(&owned(endpoint.address())))
        .ok_or_else(|| ProviderError::internal("DescribeEndpoints returned no endpoints"))
}

#[async_trait]
impl TaggingApi for SdkTimestreamQueryClient {
    async fn list_tags_for_resource(&self, resource_arn: &str) -> ProviderResult<TagMap> {
        let output = self
            .client
            .list_tags_for_resource()
            .resource_arn(resource_arn)
            .send()
            .await
            .map_err(provider_error)?;
        Ok(items(output.tags())
            .iter()
            .map(|tag| (owned(tag.key()), owned(tag.value())))
            .collect())
    }

    async fn tag_resource(&self, resource_arn: &str, tags: &TagMap) -> ProviderResult<()> {
        self.client
            .tag_resource()
            .resource_arn(resource_arn)
            .set_tags(sdk_tags(tags)?)
            .send()
            .await
            .map_err(provider_error)?;
        Ok(())
    }

    async fn untag_resource(&self, resource_arn: &str, tag_keys: &[String]) -> ProviderResult<()> {
        self.client
            .untag_resource()
            .resource_arn(resource_arn)
            .set_tag_keys(Some(tag_keys.to_vec()))
            .send()
            .await
            .map_err(provider_error)?;
        Ok(())
    }
}

#[async_trait]
impl TimestreamQueryApi for SdkTimestreamQueryClient {
    async fn create_scheduled_query(&self, input: CreateScheduledQueryInput) -> ProviderResult<String> {
        let output = self
            .client
            .create_scheduled_query()
            .name(input.name)
            .query_string(input.query_string)
            .schedule_configuration(sdk_schedule_configuration(&input.schedule_configuration)?)
            .notification_configuration(sdk_notification_configuration(
                &input.notification_configuration,
            )?)
            .set_target_configuration(
                input
                    .target_configuration
                    .as_ref()
                    .map(sdk_target_configuration)
                    .transpose()?,
            )
            .client_token(input.client_token)
            .scheduled_query_execution_role_arn(input.scheduled_query_execution_role_arn)
            .error_report_configuration(sdk_error_report_configuration(
                &input.error_report_configuration,
            )?)
            .set_kms_key_id(input.kms_key_id)
            .set_tags(sdk_tags(&input.tags)?)
            .send()
            .await
            .map_err(provider_error)?;
        Ok(owned(output.arn()))
    }

    async fn describe_scheduled_query(&self, arn: &str) -> ProviderResult<ScheduledQueryRecord> {
        let output = self
            .client
            .describe_scheduled_query()
            .scheduled_query_arn(arn)
            .send()
            .await
            .map_err(provider_error)?;
        let description: Option<&ScheduledQueryDescription> = output.scheduled_query().into();
        let description = description
            .ok_or_else(|| ProviderError::internal("Response did not include the scheduled query"))?;
        Ok(scheduled_query_record(description))
    }

    async fn delete_scheduled_query(&self, arn: &str) -> ProviderResult<()> {
        self.client
            .delete_scheduled_query()
            .scheduled_query_arn(arn)
            .send()
            .await
            .map_err(provider_error)?;
        Ok(())
    }

    async fn list_scheduled_queries(
        &self,
        next_token: Option<&str>,
        max_results: i32,
    ) -> ProviderResult<Page<ScheduledQuerySummary>> {
        let output = self
            .client
            .list_scheduled_queries()
            .set_next_token(next_token.map(str::to_string))
            .max_results(max_results)
            .send()
            .await
            .map_err(provider_error)?;
        let queries = items(output.scheduled_queries())
            .iter()
            .map(|query| {
                let state: Option<&ScheduledQueryState> = query.state().into();
                ScheduledQuerySummary {
                    arn: owned(query.arn()),
                    name: owned(query.name()),
                    state: state.map(|s| s.as_str().to_string()).unwrap_or_default(),
                }
            })
            .collect();
        Ok(Page::new(queries, optional(output.next_token())))
    }
}

// =============================================================================
// Model to SDK
// =============================================================================

fn sdk_tags(tags: &TagMap) -> ProviderResult<Option<Vec<Tag>>> {
    if tags.is_empty() {
        return Ok(None);
    }
    tags.iter()
        .map(|(key, value)| Tag::builder().key(key).value(value).build().map_err(build_error))
        .collect::<ProviderResult<Vec<_>>>()
        .map(Some)
}

fn sdk_schedule_configuration(
    schedule: &model::ScheduleConfiguration,
) -> ProviderResult<ScheduleConfiguration> {
    ScheduleConfiguration::builder()
        .schedule_expression(&schedule.schedule_expression)
        .build()
        .map_err(build_error)
}

fn sdk_notification_configuration(
    notification: &model::NotificationConfiguration,
) -> ProviderResult<NotificationConfiguration> {
    let sns = SnsConfiguration::builder()
        .topic_arn(&notification.sns_configuration.topic_arn)
        .build()
        .map_err(build_error)?;
    Ok(NotificationConfiguration::builder().sns_configuration(sns).build())
}

fn sdk_error_report_configuration(
    report: &model::ErrorReportConfiguration,
) -> ProviderResult<ErrorReportConfiguration> {
    let s3 = &report.s3_configuration;
    let s3 = S3Configuration::builder()
        .bucket_name(&s3.bucket_name)
        .set_object_key_prefix(s3.object_key_prefix.clone())
        .set_encryption_option(s3.encryption_option.as_deref().map(S3EncryptionOption::from))
        .build()
        .map_err(build_error)?;
    Ok(ErrorReportConfiguration::builder().s3_configuration(s3).build())
}

fn sdk_target_configuration(target: &model::TargetConfiguration) -> ProviderResult<TargetConfiguration> {
    let timestream = &target.timestream_configuration;
    let dimension_mappings = timestream
        .dimension_mappings
        .iter()
        .map(|mapping| {
            DimensionMapping::builder()
                .name(&mapping.name)
                .dimension_value_type(DimensionValueType::from(mapping.dimension_value_type.as_str()))
                .build()
                .map_err(build_error)
        })
        .collect::<ProviderResult<Vec<_>>>()?;
    let multi_measure_mappings = timestream
        .multi_measure_mappings
        .as_ref()
        .map(|mappings| {
            MultiMeasureMappings::builder()
                .set_target_multi_measure_name(mappings.target_multi_measure_name.clone())
                .set_multi_measure_attribute_mappings(Some(sdk_attribute_mappings(
                    &mappings.multi_measure_attribute_mappings,
                )?))
                .build()
                .map_err(build_error)
        })
        .transpose()?;
    let mixed_measure_mappings = timestream
        .mixed_measure_mappings
        .as_deref()
        .map(|mappings| {
            mappings
                .iter()
                .map(sdk_mixed_measure_mapping)
                .collect::<ProviderResult<Vec<_>>>()
        })
        .transpose()?;

    let configuration = TimestreamConfiguration::builder()
        .database_name(&timestream.database_name)
        .table_name(&timestream.table_name)
        .time_column(&timestream.time_column)
        .set_dimension_mappings(Some(dimension_mappings))
        .set_multi_measure_mappings(multi_measure_mappings)
        .set_mixed_measure_mappings(mixed_measure_mappings)
        .set_measure_name_column(timestream.measure_name_column.clone())
        .build()
        .map_err(build_error)?;
    Ok(TargetConfiguration::builder()
        .timestream_configuration(configuration)
        .build())
}

fn sdk_attribute_mappings(
    mappings: &[model::MultiMeasureAttributeMapping],
) -> ProviderResult<Vec<MultiMeasureAttributeMapping>> {
    mappings
        .iter()
        .map(|mapping| {
            MultiMeasureAttributeMapping::builder()
                .source_column(&mapping.source_column)
                .set_target_multi_measure_attribute_name(
                    mapping.target_multi_measure_attribute_name.clone(),
                )
                .measure_value_type(ScalarMeasureValueType::from(mapping.measure_value_type.as_str()))
                .build()
                .map_err(build_error)
        })
        .collect()
}

fn sdk_mixed_measure_mapping(mapping: &model::MixedMeasureMapping) -> ProviderResult<MixedMeasureMapping> {
    let attribute_mappings = mapping
        .multi_measure_attribute_mappings
        .as_deref()
        .map(sdk_attribute_mappings)
        .transpose()?;
    MixedMeasureMapping::builder()
        .set_measure_name(mapping.measure_name.clone())
        .set_source_column(mapping.source_column.clone())
        .set_target_measure_name(mapping.target_measure_name.clone())
        .measure_value_type(MeasureValueType::from(mapping.measure_value_type.as_str()))
        .set_multi_measure_attribute_mappings(attribute_mappings)
        .build()
        .map_err(build_error)
}

// =============================================================================
// SDK to model
// =============================================================================

fn scheduled_query_record(description: &ScheduledQueryDescription) -> ScheduledQueryRecord {
    let state: Option<&ScheduledQueryState> = description.state().into();
    let schedule: Option<&ScheduleConfiguration> = description.schedule_configuration().into();
    let notification: Option<&NotificationConfiguration> =
        description.notification_configuration().into();
    let target: Option<&TargetConfiguration> = description.target_configuration().into();
    let error_report: Option<&ErrorReportConfiguration> =
        description.error_report_configuration().into();

    ScheduledQueryRecord {
        arn: owned(description.arn()),
        name: owned(description.name()),
        state: state.map(|s| s.as_str().to_string()).unwrap_or_default(),
        query_string: owned(description.query_string()),
        schedule_configuration: schedule.map(|schedule| model::ScheduleConfiguration {
            schedule_expression: owned(schedule.schedule_expression()),
        }),
        notification_configuration: notification.and_then(model_notification_configuration),
        target_configuration: target.and_then(model_target_configuration),
        scheduled_query_execution_role_arn: optional(description.scheduled_query_execution_role_arn()),
        error_report_configuration: error_report.and_then(model_error_report_configuration),
        kms_key_id: optional(description.kms_key_id()),
    }
}

fn model_notification_configuration(
    notification: &NotificationConfiguration,
) -> Option<model::NotificationConfiguration> {
    let sns: Option<&SnsConfiguration> = notification.sns_configuration().into();
    sns.map(|sns| model::NotificationConfiguration {
        sns_configuration: model::SnsConfiguration {
            topic_arn: owned(sns.topic_arn()),
        },
    })
}

fn model_error_report_configuration(
    report: &ErrorReportConfiguration,
) -> Option<model::ErrorReportConfiguration> {
    let s3: Option<&S3Configuration> = report.s3_configuration().into();
    s3.map(|s3| model::ErrorReportConfiguration {
        s3_configuration: model::S3Configuration {
            bucket_name: owned(s3.bucket_name()),
            object_key_prefix: optional(s3.object_key_prefix()),
            encryption_option: s3.encryption_option().map(|o| o.as_str().to_string()),
        },
    })
}

fn model_target_configuration(target: &TargetConfiguration) -> Option<model::TargetConfiguration> {
    let timestream: Option<&TimestreamConfiguration> = target.timestream_configuration().into();
    let timestream = timestream?;

    let mixed = items(timestream.mixed_measure_mappings());
    Some(model::TargetConfiguration {
        timestream_configuration: model::TimestreamConfiguration {
            database_name: owned(timestream.database_name()),
            table_name: owned(timestream.table_name()),
            time_column: owned(timestream.time_column()),
            dimension_mappings: items(timestream.dimension_mappings())
                .iter()
                .map(|mapping| {
                    let value_type: Option<&DimensionValueType> = mapping.dimension_value_type().into();
                    model::DimensionMapping {
                        name: owned(mapping.name()),
                        dimension_value_type: value_type
                            .map(|t| t.as_str().to_string())
                            .unwrap_or_default(),
                    }
                })
                .collect(),
            multi_measure_mappings: timestream.multi_measure_mappings().map(|mappings| {
                model::MultiMeasureMappings {
                    target_multi_measure_name: optional(mappings.target_multi_measure_name()),
                    multi_measure_attribute_mappings: model_attribute_mappings(items(
                        mappings.multi_measure_attribute_mappings(),
                    )),
                }
            }),
            mixed_measure_mappings: (!mixed.is_empty())
                .then(|| mixed.iter().map(model_mixed_measure_mapping).collect()),
            measure_name_column: optional(timestream.measure_name_column()),
        },
    })
}

fn model_attribute_mappings(
    mappings: &[MultiMeasureAttributeMapping],
) -> Vec<model::MultiMeasureAttributeMapping> {
    mappings
        .iter()
        .map(|mapping| {
            let value_type: Option<&ScalarMeasureValueType> = mapping.measure_value_type().into();
            model::MultiMeasureAttributeMapping {
                source_column: owned(mapping.source_column()),
                measure_value_type: value_type.map(|t| t.as_str().to_string()).unwrap_or_default(),
                target_multi_measure_attribute_name: optional(
                    mapping.target_multi_measure_attribute_name(),
                ),
            }
        })
        .collect()
}

fn model_mixed_measure_mapping(mapping: &MixedMeasureMapping) -> model::MixedMeasureMapping {
    let value_type: Option<&MeasureValueType> = mapping.measure_value_type().into();
    let attribute_mappings = items(mapping.multi_measure_attribute_mappings());
    model::MixedMeasureMapping {
        measure_name: optional(mapping.measure_name()),
        source_column: optional(mapping.source_column()),
        target_measure_name: optional(mapping.target_measure_name()),
        measure_value_type: value_type.map(|t| t.as_str().to_string()).unwrap_or_default(),
        multi_measure_attribute_mappings: (!attribute_mappings.is_empty())
            .then(|| model_attribute_mappings(attribute_mappings)),
    }
}
