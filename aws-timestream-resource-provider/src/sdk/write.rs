//! Timestream Write client: databases, tables and their tags.

use async_trait::async_trait;
use aws_sdk_timestreamwrite::types::{
    Database, MagneticStoreRejectedDataLocation, MagneticStoreWriteProperties, PartitionKey,
    PartitionKeyEnforcementLevel, PartitionKeyType, RetentionProperties, S3Configuration,
    S3EncryptionOption, Schema, Table, Tag,
};
use aws_sdk_timestreamwrite::Client;

use super::{build_error, endpoint_url, items, load_sdk_config, optional, owned, provider_error};
use crate::client::{
    CreateDatabaseInput, CreateTableInput, DatabaseRecord, Page, TableRecord, TaggingApi,
    TimestreamWriteApi, UpdateTableInput,
};
use crate::config::ProviderConfig;
use crate::error::{ProviderError, ProviderResult};
use crate::lambda::Credentials;
use crate::model::table as model;
use crate::tags::TagMap;

/// [`TimestreamWriteApi`] over `aws-sdk-timestreamwrite`.
#[derive(Debug, Clone)]
pub struct SdkTimestreamWriteClient {
    client: Client,
}

impl SdkTimestreamWriteClient {
    /// Builds a client for the account's discovered ingestion endpoint, or
    /// for the configured endpoint override.
    pub async fn connect(config: &ProviderConfig, credentials: Option<&Credentials>) -> ProviderResult<Self> {
        let sdk_config = load_sdk_config(config, credentials).await;
        let endpoint = match &config.endpoint_url {
            Some(url) => url.clone(),
            None => discover_endpoint(&Client::new(&sdk_config)).await?,
        };
        tracing::debug!(region = %config.region, endpoint = %endpoint, "Timestream Write endpoint");

        let client_config = aws_sdk_timestreamwrite::config::Builder::from(&sdk_config)
            .endpoint_url(endpoint)
            .build();
        Ok(Self::from_client(Client::from_conf(client_config)))
    }

    /// Wraps an already configured SDK client.
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
impl TaggingApi for SdkTimestreamWriteClient {
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
impl TimestreamWriteApi for SdkTimestreamWriteClient {
    async fn create_database(&self, input: CreateDatabaseInput) -> ProviderResult<DatabaseRecord> {
        let output = self
            .client
            .create_database()
            .database_name(input.database_name)
            .set_kms_key_id(input.kms_key_id)
            .set_tags(sdk_tags(&input.tags)?)
            .send()
            .await
            .map_err(provider_error)?;
        database_record(output.database())
    }

    async fn describe_database(&self, database_name: &str) -> ProviderResult<DatabaseRecord> {
        let output = self
            .client
            .describe_database()
            .database_name(database_name)
            .send()
            .await
            .map_err(provider_error)?;
        database_record(output.database())
    }

    async fn update_database(
        &self,
        database_name: &str,
        kms_key_id: Option<&str>,
    ) -> ProviderResult<DatabaseRecord> {
        let output = self
            .client
            .update_database()
            .database_name(database_name)
            .set_kms_key_id(kms_key_id.map(str::to_string))
            .send()
            .await
            .map_err(provider_error)?;
        database_record(output.database())
    }

    async fn delete_database(&self, database_name: &str) -> ProviderResult<()> {
        self.client
            .delete_database()
            .database_name(database_name)
            .send()
            .await
            .map_err(provider_error)?;
        Ok(())
    }

    async fn list_databases(
        &self,
        next_token: Option<&str>,
        max_results: i32,
    ) -> ProviderResult<Page<DatabaseRecord>> {
        let output = self
            .client
            .list_databases()
            .set_next_token(next_token.map(str::to_string))
            .max_results(max_results)
            .send()
            .await
            .map_err(provider_error)?;
        let databases = items(output.databases())
            .iter()
            .map(database_record)
            .collect::<ProviderResult<Vec<_>>>()?;
        Ok(Page::new(databases, optional(output.next_token())))
    }

    async fn create_table(&self, input: CreateTableInput) -> ProviderResult<TableRecord> {
        let output = self
            .client
            .create_table()
            .database_name(input.database_name)
            .table_name(input.table_name)
            .set_retention_properties(input.retention.map(sdk_retention).transpose()?)
            .set_magnetic_store_write_properties(
                input
                    .magnetic_store_write_properties
                    .as_ref()
                    .map(sdk_magnetic_store_write_properties)
                    .transpose()?,
            )
            .set_schema(input.schema.as_ref().map(sdk_schema).transpose()?)
            .set_tags(sdk_tags(&input.tags)?)
            .send()
            .await
            .map_err(provider_error)?;
        table_record(output.table())
    }

    async fn describe_table(&self, database_name: &str, table_name: &str) -> ProviderResult<TableRecord> {
        let output = self
            .client
            .describe_table()
            .database_name(database_name)
            .table_name(table_name)
            .send()
            .await
            .map_err(provider_error)?;
        table_record(output.table())
    }

    async fn update_table(&self, input: UpdateTableInput) -> ProviderResult<TableRecord> {
        let output = self
            .client
            .update_table()
            .database_name(input.database_name)
            .table_name(input.table_name)
            .set_retention_properties(input.retention.map(sdk_retention).transpose()?)
            .set_magnetic_store_write_properties(
                input
                    .magnetic_store_write_properties
                    .as_ref()
                    .map(sdk_magnetic_store_write_properties)
                    .transpose()?,
            )
            .set_schema(input.schema.as_ref().map(sdk_schema).transpose()?)
            .send()
            .await
            .map_err(provider_error)?;
        table_record(output.table())
    }

    async fn delete_table(&self, database_name: &str, table_name: &str) -> ProviderResult<()> {
        self.client
            .delete_table()
            .database_name(database_name)
            .table_name(table_name)
            .send()
            .await
            .map_err(provider_error)?;
        Ok(())
    }

    async fn list_tables(
        &self,
        database_name: Option<&str>,
        next_token: Option<&str>,
        max_results: i32,
    ) -> ProviderResult<Page<TableRecord>> {
        let output = self
            .client
            .list_tables()
            .set_database_name(database_name.map(str::to_string))
            .set_next_token(next_token.map(str::to_string))
            .max_results(max_results)
            .send()
            .await
            .map_err(provider_error)?;
        let tables = items(output.tables())
            .iter()
            .map(table_record)
            .collect::<ProviderResult<Vec<_>>>()?;
        Ok(Page::new(tables, optional(output.next_token())))
    }
}

// =============================================================================
// SDK shape conversions
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

fn database_record<'a>(database: impl Into<Option<&'a Database>>) -> ProviderResult<DatabaseRecord> {
    let database = database
        .into()
        .ok_or_else(|| ProviderError::internal("Response did not include the database"))?;
    Ok(DatabaseRecord {
        arn: owned(database.arn()),
        database_name: owned(database.database_name()),
        kms_key_id: optional(database.kms_key_id()),
    })
}

fn table_record<'a>(table: impl Into<Option<&'a Table>>) -> ProviderResult<TableRecord> {
    let table = table
        .into()
        .ok_or_else(|| ProviderError::internal("Response did not include the table"))?;
    Ok(TableRecord {
        arn: owned(table.arn()),
        database_name: owned(table.database_name()),
        table_name: owned(table.table_name()),
        table_status: table.table_status().map(|status| status.as_str().to_string()),
        retention: table.retention_properties().map(|retention| model::RetentionSettings {
            memory_store_hours: retention.memory_store_retention_period_in_hours(),
            magnetic_store_days: retention.magnetic_store_retention_period_in_days(),
        }),
        magnetic_store_write_properties: table
            .magnetic_store_write_properties()
            .map(model_magnetic_store_write_properties),
        schema: table.schema().map(model_schema),
    })
}

fn sdk_retention(retention: model::RetentionSettings) -> ProviderResult<RetentionProperties> {
    RetentionProperties::builder()
        .memory_store_retention_period_in_hours(retention.memory_store_hours)
        .magnetic_store_retention_period_in_days(retention.magnetic_store_days)
        .build()
        .map_err(build_error)
}

fn sdk_magnetic_store_write_properties(
    properties: &model::MagneticStoreWriteProperties,
) -> ProviderResult<MagneticStoreWriteProperties> {
    let location = properties
        .magnetic_store_rejected_data_location
        .as_ref()
        .map(|location| {
            MagneticStoreRejectedDataLocation::builder()
                .set_s3_configuration(location.s3_configuration.as_ref().map(sdk_s3_configuration))
                .build()
        });
    MagneticStoreWriteProperties::builder()
        .enable_magnetic_store_writes(properties.enable_magnetic_store_writes)
        .set_magnetic_store_rejected_data_location(location)
        .build()
        .map_err(build_error)
}

fn sdk_s3_configuration(s3: &model::S3Configuration) -> S3Configuration {
    S3Configuration::builder()
        .set_bucket_name(s3.bucket_name.clone())
        .set_object_key_prefix(s3.object_key_prefix.clone())
        .set_encryption_option(s3.encryption_option.as_deref().map(S3EncryptionOption::from))
        .set_kms_key_id(s3.kms_key_id.clone())
        .build()
}

fn sdk_schema(schema: &model::Schema) -> ProviderResult<Schema> {
    let keys = schema
        .composite_partition_key
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|key| {
            PartitionKey::builder()
                .r#type(PartitionKeyType::from(key.r#type.as_str()))
                .set_name(key.name.clone())
                .set_enforcement_in_record(
                    key.enforcement_in_record
                        .as_deref()
                        .map(PartitionKeyEnforcementLevel::from),
                )
                .build()
                .map_err(build_error)
        })
        .collect::<ProviderResult<Vec<_>>>()?;
    Ok(Schema::builder().set_composite_partition_key(Some(keys)).build())
}

fn model_magnetic_store_write_properties(
    properties: &MagneticStoreWriteProperties,
) -> model::MagneticStoreWriteProperties {
    let enabled: Option<bool> = properties.enable_magnetic_store_writes().into();
    model::MagneticStoreWriteProperties {
        enable_magnetic_store_writes: enabled.unwrap_or_default(),
        magnetic_store_rejected_data_location: properties.magnetic_store_rejected_data_location().map(
            |location| model::MagneticStoreRejectedDataLocation {
                s3_configuration: location.s3_configuration().map(|s3| model::S3Configuration {
                    bucket_name: optional(s3.bucket_name()),
                    object_key_prefix: optional(s3.object_key_prefix()),
                    encryption_option: s3.encryption_option().map(|o| o.as_str().to_string()),
                    kms_key_id: optional(s3.kms_key_id()),
                }),
            },
        ),
    }
}

fn model_schema(schema: &Schema) -> model::Schema {
    let keys = items(schema.composite_partition_key())
        .iter()
        .map(|key| {
            let key_type: Option<&PartitionKeyType> = key.r#type().into();
            model::PartitionKey {
                r#type: key_type.map(|t| t.as_str().to_string()).unwrap_or_default(),
                name: optional(key.name()),
                enforcement_in_record: key.enforcement_in_record().map(|e| e.as_str().to_string()),
            }
        })
        .collect();
    model::Schema {
        composite_partition_key: Some(keys),
    }
}
