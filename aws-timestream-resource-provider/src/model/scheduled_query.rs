//! `AWS::Timestream::ScheduledQuery` model.
//!
//! Apart from tags, every user-settable property is create-only: a change
//! to any of them is a replacement, which the orchestration caller performs
//! as create-then-delete. The `SQ*` properties are read-only summaries of
//! the configuration the provider holds, rendered as JSON strings.

use serde::{Deserialize, Serialize};

use super::{non_empty, Tag};
use crate::error::{HandlerError, HandlerResult};
use crate::handlers::delete::DeleteState;

/// Maximum length of a scheduled query name.
pub const SCHEDULED_QUERY_NAME_MAX_LENGTH: usize = 64;

/// Reported in `SQTargetConfiguration` when the query has no target.
pub const NO_TARGET_CONFIGURATION: &str = "NO TARGET CONFIGURATION AVAILABLE";

/// Reported in `SQKmsKeyId`, by both create and read, when the query is
/// encrypted with the service key.
pub const NO_KMS_KEY_ID: &str = "NO KMS KEY ID AVAILABLE";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScheduledQueryModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_query_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_string: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_configuration: Option<ScheduleConfiguration>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_configuration: Option<NotificationConfiguration>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_query_execution_role_arn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_configuration: Option<TargetConfiguration>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_report_configuration: Option<ErrorReportConfiguration>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kms_key_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,

    #[serde(rename = "SQName", default, skip_serializing_if = "Option::is_none")]
    pub sq_name: Option<String>,

    #[serde(rename = "SQQueryString", default, skip_serializing_if = "Option::is_none")]
    pub sq_query_string: Option<String>,

    #[serde(rename = "SQScheduleConfiguration", default, skip_serializing_if = "Option::is_none")]
    pub sq_schedule_configuration: Option<String>,

    #[serde(rename = "SQNotificationConfiguration", default, skip_serializing_if = "Option::is_none")]
    pub sq_notification_configuration: Option<String>,

    #[serde(
        rename = "SQScheduledQueryExecutionRoleArn",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub sq_scheduled_query_execution_role_arn: Option<String>,

    #[serde(rename = "SQTargetConfiguration", default, skip_serializing_if = "Option::is_none")]
    pub sq_target_configuration: Option<String>,

    #[serde(rename = "SQErrorReportConfiguration", default, skip_serializing_if = "Option::is_none")]
    pub sq_error_report_configuration: Option<String>,

    #[serde(rename = "SQKmsKeyId", default, skip_serializing_if = "Option::is_none")]
    pub sq_kms_key_id: Option<String>,
}

/// The create-only configuration of a scheduled query, with every required
/// block present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledQueryDefinition {
    pub query_string: String,
    pub schedule_configuration: ScheduleConfiguration,
    pub notification_configuration: NotificationConfiguration,
    pub scheduled_query_execution_role_arn: String,
    pub error_report_configuration: ErrorReportConfiguration,
    pub target_configuration: Option<TargetConfiguration>,
    pub kms_key_id: Option<String>,
}

impl ScheduledQueryModel {
    pub fn with_arn(arn: impl Into<String>) -> Self {
        Self {
            arn: Some(arn.into()),
            ..Self::default()
        }
    }

    pub fn name(&self) -> Option<&str> {
        non_empty(self.scheduled_query_name.as_deref())
    }

    pub fn arn(&self) -> Option<&str> {
        non_empty(self.arn.as_deref())
    }

    /// Extracts the configuration needed to create the query, rejecting a
    /// model that is missing a required block.
    pub fn definition(&self) -> HandlerResult<ScheduledQueryDefinition> {
        Ok(ScheduledQueryDefinition {
            query_string: required(self.query_string.clone(), "QueryString")?,
            schedule_configuration: required(
                self.schedule_configuration.clone(),
                "ScheduleConfiguration",
            )?,
            notification_configuration: required(
                self.notification_configuration.clone(),
                "NotificationConfiguration",
            )?,
            scheduled_query_execution_role_arn: required(
                self.scheduled_query_execution_role_arn.clone(),
                "ScheduledQueryExecutionRoleArn",
            )?,
            error_report_configuration: required(
                self.error_report_configuration.clone(),
                "ErrorReportConfiguration",
            )?,
            target_configuration: self.target_configuration.clone(),
            kms_key_id: self.kms_key_id.clone(),
        })
    }

    /// Names the create-only properties that differ from `previous`.
    ///
    /// An unset name is not compared, since the previous state carries the
    /// generated one.
    pub fn create_only_changes(&self, previous: &Self) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if self.name().is_some() && self.name() != previous.name() {
            changed.push("ScheduledQueryName");
        }
        if self.query_string != previous.query_string {
            changed.push("QueryString");
        }
        if self.schedule_configuration != previous.schedule_configuration {
            changed.push("ScheduleConfiguration");
        }
        if self.notification_configuration != previous.notification_configuration {
            changed.push("NotificationConfiguration");
        }
        if self.scheduled_query_execution_role_arn != previous.scheduled_query_execution_role_arn {
            changed.push("ScheduledQueryExecutionRoleArn");
        }
        if self.target_configuration != previous.target_configuration {
            changed.push("TargetConfiguration");
        }
        if self.error_report_configuration != previous.error_report_configuration {
            changed.push("ErrorReportConfiguration");
        }
        if self.kms_key_id != previous.kms_key_id {
            changed.push("KmsKeyId");
        }
        changed
    }

    /// Fills the `SQ*` summary properties from a definition.
    pub fn set_summary(&mut self, name: &str, definition: &ScheduledQueryDefinition) {
        self.sq_name = Some(name.to_string());
        self.sq_query_string = Some(definition.query_string.clone());
        self.sq_schedule_configuration = render(&definition.schedule_configuration);
        self.sq_notification_configuration = render(&definition.notification_configuration);
        self.sq_scheduled_query_execution_role_arn =
            Some(definition.scheduled_query_execution_role_arn.clone());
        self.sq_target_configuration = match &definition.target_configuration {
            Some(target) => render(target),
            None => Some(NO_TARGET_CONFIGURATION.to_string()),
        };
        self.sq_error_report_configuration = render(&definition.error_report_configuration);
        self.sq_kms_key_id = Some(
            definition
                .kms_key_id
                .clone()
                .unwrap_or_else(|| NO_KMS_KEY_ID.to_string()),
        );
    }
}

fn required<T>(value: Option<T>, property: &str) -> HandlerResult<T> {
    value.ok_or_else(|| HandlerError::invalid_request(format!("{property} is required")))
}

fn render<T: Serialize>(block: &T) -> Option<String> {
    serde_json::to_string(block).ok()
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScheduleConfiguration {
    /// A cron or rate expression.
    pub schedule_expression: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NotificationConfiguration {
    pub sns_configuration: SnsConfiguration,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SnsConfiguration {
    pub topic_arn: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorReportConfiguration {
    pub s3_configuration: S3Configuration,
}

/// Error report destination.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct S3Configuration {
    pub bucket_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_key_prefix: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_option: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TargetConfiguration {
    pub timestream_configuration: TimestreamConfiguration,
}

/// Destination table for query results.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TimestreamConfiguration {
    pub database_name: String,
    pub table_name: String,
    pub time_column: String,

    #[serde(default)]
    pub dimension_mappings: Vec<DimensionMapping>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_measure_mappings: Option<MultiMeasureMappings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mixed_measure_mappings: Option<Vec<MixedMeasureMapping>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measure_name_column: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DimensionMapping {
    pub name: String,
    pub dimension_value_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MultiMeasureMappings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_multi_measure_name: Option<String>,

    #[serde(default)]
    pub multi_measure_attribute_mappings: Vec<MultiMeasureAttributeMapping>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MultiMeasureAttributeMapping {
    pub source_column: String,
    pub measure_value_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_multi_measure_attribute_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MixedMeasureMapping {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measure_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_column: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_measure_name: Option<String>,

    pub measure_value_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_measure_attribute_mappings: Option<Vec<MultiMeasureAttributeMapping>>,
}

/// Progress of a multi-invocation scheduled query delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledQueryCallbackContext {
    #[serde(default)]
    pub delete_scheduled_query_started: bool,
}

impl From<ScheduledQueryCallbackContext> for DeleteState {
    fn from(context: ScheduledQueryCallbackContext) -> Self {
        Self {
            delete_issued: context.delete_scheduled_query_started,
            confirmed: false,
        }
    }
}

impl From<DeleteState> for ScheduledQueryCallbackContext {
    fn from(state: DeleteState) -> Self {
        Self {
            delete_scheduled_query_started: state.delete_issued,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_model() -> ScheduledQueryModel {
        ScheduledQueryModel {
            query_string: Some("SELECT 1".to_string()),
            schedule_configuration: Some(ScheduleConfiguration {
                schedule_expression: "rate(1 hour)".to_string(),
            }),
            notification_configuration: Some(NotificationConfiguration {
                sns_configuration: SnsConfiguration {
                    topic_arn: "arn:aws:sns:us-east-1:123456789012:alerts".to_string(),
                },
            }),
            scheduled_query_execution_role_arn: Some(
                "arn:aws:iam::123456789012:role/sq".to_string(),
            ),
            error_report_configuration: Some(ErrorReportConfiguration {
                s3_configuration: S3Configuration {
                    bucket_name: "errors".to_string(),
                    ..S3Configuration::default()
                },
            }),
            ..ScheduledQueryModel::default()
        }
    }

    #[test]
    fn test_definition_requires_blocks() {
        assert!(complete_model().definition().is_ok());

        let mut model = complete_model();
        model.notification_configuration = None;
        let error = model.definition().unwrap_err();
        assert_eq!(
            error,
            HandlerError::invalid_request("NotificationConfiguration is required")
        );
    }

    #[test]
    fn test_summary_uses_sentinels() {
        let mut model = complete_model();
        let definition = model.definition().unwrap();
        model.set_summary("hourly", &definition);

        assert_eq!(model.sq_name.as_deref(), Some("hourly"));
        assert_eq!(model.sq_target_configuration.as_deref(), Some(NO_TARGET_CONFIGURATION));
        assert_eq!(model.sq_kms_key_id.as_deref(), Some(NO_KMS_KEY_ID));
        assert_eq!(
            model.sq_schedule_configuration.as_deref(),
            Some(r#"{"ScheduleExpression":"rate(1 hour)"}"#)
        );
    }

    #[test]
    fn test_create_only_changes() {
        let previous = ScheduledQueryModel {
            scheduled_query_name: Some("generated-name".to_string()),
            ..complete_model()
        };

        let mut desired = complete_model();
        assert!(desired.create_only_changes(&previous).is_empty());

        desired.query_string = Some("SELECT 2".to_string());
        desired.kms_key_id = Some("alias/sq".to_string());
        assert_eq!(
            desired.create_only_changes(&previous),
            vec!["QueryString", "KmsKeyId"]
        );
    }

    #[test]
    fn test_read_only_property_names() {
        let model = ScheduledQueryModel {
            sq_name: Some("hourly".to_string()),
            sq_kms_key_id: Some(NO_KMS_KEY_ID.to_string()),
            ..ScheduledQueryModel::default()
        };
        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"SQName": "hourly", "SQKmsKeyId": NO_KMS_KEY_ID})
        );
    }

    #[test]
    fn test_context_wire_name() {
        let context = ScheduledQueryCallbackContext::from(DeleteState::issued());
        assert_eq!(
            serde_json::to_value(context).unwrap(),
            serde_json::json!({"deleteScheduledQueryStarted": true})
        );
    }
}
