//! The request a lifecycle handler operates on.

use serde::{Deserialize, Serialize};

use crate::tags::TagMap;

/// Lifecycle operation requested by the orchestration caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    List,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create => write!(f, "CREATE"),
            Self::Read => write!(f, "READ"),
            Self::Update => write!(f, "UPDATE"),
            Self::Delete => write!(f, "DELETE"),
            Self::List => write!(f, "LIST"),
        }
    }
}

/// Desired and previous state for one handler invocation.
///
/// Stack and system tags come from the orchestration caller, separately
/// from the resource's own `Tags` property.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResourceHandlerRequest<M> {
    /// Unique per logical request; stable across retries of that request.
    pub client_request_token: String,
    pub desired_resource_state: M,
    pub previous_resource_state: Option<M>,
    pub desired_resource_tags: Option<TagMap>,
    pub previous_resource_tags: Option<TagMap>,
    pub system_tags: Option<TagMap>,
    pub logical_resource_identifier: Option<String>,
    pub next_token: Option<String>,
    pub region: Option<String>,
    pub aws_account_id: Option<String>,
    pub stack_id: Option<String>,
}

impl<M> ResourceHandlerRequest<M> {
    /// Creates a request for `desired` with no previous state.
    pub fn new(client_request_token: impl Into<String>, desired: M) -> Self {
        Self {
            client_request_token: client_request_token.into(),
            desired_resource_state: desired,
            previous_resource_state: None,
            desired_resource_tags: None,
            previous_resource_tags: None,
            system_tags: None,
            logical_resource_identifier: None,
            next_token: None,
            region: None,
            aws_account_id: None,
            stack_id: None,
        }
    }

    pub fn with_previous_state(mut self, previous: M) -> Self {
        self.previous_resource_state = Some(previous);
        self
    }

    pub fn with_logical_resource_identifier(mut self, logical_id: impl Into<String>) -> Self {
        self.logical_resource_identifier = Some(logical_id.into());
        self
    }

    pub fn with_stack_tags(mut self, desired: TagMap, previous: Option<TagMap>) -> Self {
        self.desired_resource_tags = Some(desired);
        self.previous_resource_tags = previous;
        self
    }

    pub fn with_system_tags(mut self, system_tags: TagMap) -> Self {
        self.system_tags = Some(system_tags);
        self
    }

    pub fn with_next_token(mut self, next_token: impl Into<String>) -> Self {
        self.next_token = Some(next_token.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_wire_names() {
        let action: Action = serde_json::from_str("\"DELETE\"").unwrap();
        assert_eq!(action, Action::Delete);
        assert_eq!(serde_json::to_string(&Action::List).unwrap(), "\"LIST\"");
        assert_eq!(Action::Update.to_string(), "UPDATE");
    }

    #[test]
    fn test_request_builder() {
        let request = ResourceHandlerRequest::new("token", "desired".to_string())
            .with_previous_state("previous".to_string())
            .with_logical_resource_identifier("MyDatabase")
            .with_next_token("page-2");

        assert_eq!(request.client_request_token, "token");
        assert_eq!(request.previous_resource_state.as_deref(), Some("previous"));
        assert_eq!(request.logical_resource_identifier.as_deref(), Some("MyDatabase"));
        assert_eq!(request.next_token.as_deref(), Some("page-2"));
    }
}
