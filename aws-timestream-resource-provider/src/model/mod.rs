//! Resource models as declared in the CloudFormation resource schemas.
//!
//! Models serialize with the schema's PascalCase property names. Read-only
//! properties (ARNs and the scheduled-query summary attributes) are filled
//! in by the handlers after the provider reports them.

use serde::{Deserialize, Serialize};

pub mod database;
pub mod scheduled_query;
pub mod table;

pub use database::{DatabaseCallbackContext, DatabaseModel};
pub use scheduled_query::{ScheduledQueryCallbackContext, ScheduledQueryModel};
pub use table::{TableCallbackContext, TableModel};

pub const DATABASE_TYPE_NAME: &str = "AWS::Timestream::Database";
pub const TABLE_TYPE_NAME: &str = "AWS::Timestream::Table";
pub const SCHEDULED_QUERY_TYPE_NAME: &str = "AWS::Timestream::ScheduledQuery";

/// A resource-level tag.
///
/// The value may be null in a template; such entries are dropped when tags
/// are merged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }
}

/// Returns the value when it is present and non-empty.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
