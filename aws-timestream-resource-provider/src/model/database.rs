//! `AWS::Timestream::Database` model.

use serde::{Deserialize, Serialize};

use super::{non_empty, Tag};

/// Maximum length of a database name.
pub const DATABASE_NAME_MAX_LENGTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DatabaseModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kms_key_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl DatabaseModel {
    pub fn named(database_name: impl Into<String>) -> Self {
        Self {
            database_name: Some(database_name.into()),
            ..Self::default()
        }
    }

    /// The database name, if one has been set.
    pub fn name(&self) -> Option<&str> {
        non_empty(self.database_name.as_deref())
    }
}

/// Databases complete every operation in one invocation, so nothing is
/// carried between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DatabaseCallbackContext {}
