//! `AWS::Timestream::Table` model.

use serde::{Deserialize, Serialize};

use super::{non_empty, Tag};
use crate::error::{HandlerError, HandlerResult};
use crate::handlers::delete::DeleteState;

/// Maximum length of a table name.
pub const TABLE_NAME_MAX_LENGTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TableModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,

    /// Read-only copy of the table name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention_properties: Option<RetentionProperties>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magnetic_store_write_properties: Option<MagneticStoreWriteProperties>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl TableModel {
    pub fn new(database_name: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            database_name: Some(database_name.into()),
            table_name: Some(table_name.into()),
            ..Self::default()
        }
    }

    pub fn database(&self) -> Option<&str> {
        non_empty(self.database_name.as_deref())
    }

    pub fn table(&self) -> Option<&str> {
        non_empty(self.table_name.as_deref())
    }
}

/// Memory and magnetic store retention as written in a template.
///
/// The schema declares both periods as strings; they are parsed before any
/// provider call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RetentionProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_store_retention_period_in_hours: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magnetic_store_retention_period_in_days: Option<String>,
}

/// Parsed retention periods as the provider expects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionSettings {
    pub memory_store_hours: i64,
    pub magnetic_store_days: i64,
}

impl RetentionProperties {
    /// Parses both periods. Missing periods are taken from `current` when it
    /// is given, otherwise they are rejected.
    pub fn resolve(&self, current: Option<RetentionSettings>) -> HandlerResult<RetentionSettings> {
        let memory_store_hours = match (&self.memory_store_retention_period_in_hours, current) {
            (Some(value), _) => parse_period("MemoryStoreRetentionPeriodInHours", value)?,
            (None, Some(current)) => current.memory_store_hours,
            (None, None) => return Err(missing_period("MemoryStoreRetentionPeriodInHours")),
        };
        let magnetic_store_days = match (&self.magnetic_store_retention_period_in_days, current) {
            (Some(value), _) => parse_period("MagneticStoreRetentionPeriodInDays", value)?,
            (None, Some(current)) => current.magnetic_store_days,
            (None, None) => return Err(missing_period("MagneticStoreRetentionPeriodInDays")),
        };
        Ok(RetentionSettings {
            memory_store_hours,
            magnetic_store_days,
        })
    }

    /// Returns true when either period is left unspecified.
    pub fn is_partial(&self) -> bool {
        self.memory_store_retention_period_in_hours.is_none()
            || self.magnetic_store_retention_period_in_days.is_none()
    }
}

impl From<RetentionSettings> for RetentionProperties {
    fn from(settings: RetentionSettings) -> Self {
        Self {
            memory_store_retention_period_in_hours: Some(settings.memory_store_hours.to_string()),
            magnetic_store_retention_period_in_days: Some(settings.magnetic_store_days.to_string()),
        }
    }
}

fn parse_period(property: &str, value: &str) -> HandlerResult<i64> {
    value.trim().parse::<i64>().map_err(|_| {
        HandlerError::invalid_request(format!("{property} must be a whole number, got '{value}'"))
    })
}

fn missing_period(property: &str) -> HandlerError {
    HandlerError::invalid_request(format!("RetentionProperties.{property} is required"))
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MagneticStoreWriteProperties {
    pub enable_magnetic_store_writes: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magnetic_store_rejected_data_location: Option<MagneticStoreRejectedDataLocation>,
}

/// Where records rejected by magnetic store writes are reported.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MagneticStoreRejectedDataLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_configuration: Option<S3Configuration>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct S3Configuration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_key_prefix: Option<String>,

    /// `SSE_S3` or `SSE_KMS`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_option: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kms_key_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Schema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composite_partition_key: Option<Vec<PartitionKey>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PartitionKey {
    /// `DIMENSION` or `MEASURE`.
    pub r#type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// `REQUIRED` or `OPTIONAL`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enforcement_in_record: Option<String>,
}

/// Progress of a multi-invocation table delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCallbackContext {
    #[serde(default)]
    pub delete_table_started: bool,
    /// Read from the incoming context only; a stabilized delete finishes
    /// without emitting another context.
    #[serde(default)]
    pub delete_table_stabilized: bool,
}

impl From<TableCallbackContext> for DeleteState {
    fn from(context: TableCallbackContext) -> Self {
        Self {
            delete_issued: context.delete_table_started,
            confirmed: context.delete_table_stabilized,
        }
    }
}

impl From<DeleteState> for TableCallbackContext {
    fn from(state: DeleteState) -> Self {
        Self {
            delete_table_started: state.delete_issued,
            delete_table_stabilized: state.confirmed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn retention(hours: Option<&str>, days: Option<&str>) -> RetentionProperties {
        RetentionProperties {
            memory_store_retention_period_in_hours: hours.map(str::to_string),
            magnetic_store_retention_period_in_days: days.map(str::to_string),
        }
    }

    #[test]
    fn test_resolve_parses_both_periods() {
        let settings = retention(Some("24"), Some("7")).resolve(None).unwrap();
        assert_eq!(
            settings,
            RetentionSettings {
                memory_store_hours: 24,
                magnetic_store_days: 7
            }
        );
    }

    #[test]
    fn test_resolve_rejects_non_numeric_period() {
        let error = retention(Some("one day"), Some("7")).resolve(None).unwrap_err();
        assert!(matches!(error, HandlerError::InvalidRequest { .. }));
        assert!(error.to_string().contains("MemoryStoreRetentionPeriodInHours"));
    }

    #[test]
    fn test_resolve_fills_missing_period_from_current() {
        let current = RetentionSettings {
            memory_store_hours: 12,
            magnetic_store_days: 365,
        };
        let settings = retention(Some("48"), None).resolve(Some(current)).unwrap();
        assert_eq!(settings.memory_store_hours, 48);
        assert_eq!(settings.magnetic_store_days, 365);
    }

    #[test]
    fn test_resolve_without_current_requires_both() {
        assert!(retention(None, Some("7")).resolve(None).is_err());
        assert!(retention(None, Some("7")).is_partial());
    }

    #[test]
    fn test_table_context_wire_names() {
        let context = TableCallbackContext {
            delete_table_started: true,
            delete_table_stabilized: false,
        };
        let json = serde_json::to_value(context).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"deleteTableStarted": true, "deleteTableStabilized": false})
        );

        let parsed: TableCallbackContext = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, TableCallbackContext::default());
    }

    #[test]
    fn test_table_model_deserialization() {
        let model: TableModel = serde_json::from_value(serde_json::json!({
            "DatabaseName": "metrics",
            "TableName": "cpu",
            "RetentionProperties": {
                "MemoryStoreRetentionPeriodInHours": "24",
                "MagneticStoreRetentionPeriodInDays": "7"
            },
            "MagneticStoreWriteProperties": {
                "EnableMagneticStoreWrites": true,
                "MagneticStoreRejectedDataLocation": {
                    "S3Configuration": {"BucketName": "rejected", "EncryptionOption": "SSE_S3"}
                }
            },
            "Schema": {"CompositePartitionKey": [{"Type": "MEASURE"}]}
        }))
        .unwrap();

        assert_eq!(model.database(), Some("metrics"));
        assert_eq!(model.table(), Some("cpu"));
        let location = model
            .magnetic_store_write_properties
            .and_then(|p| p.magnetic_store_rejected_data_location)
            .and_then(|l| l.s3_configuration)
            .unwrap();
        assert_eq!(location.bucket_name.as_deref(), Some("rejected"));
        assert_eq!(model.schema.unwrap().composite_partition_key.unwrap()[0].r#type, "MEASURE");
    }
}
