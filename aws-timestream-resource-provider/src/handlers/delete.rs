//! Resumable delete reconciliation.
//!
//! Tables and scheduled queries disappear some time after their delete call
//! is accepted. A delete therefore spans several invocations: the first
//! issues the delete and reports in-progress, and later ones (re-invoked by
//! the caller with the echoed [`DeleteState`]) poll until the resource is
//! gone. The handler never sleeps between polls.
//!
//! Properties the state machine keeps:
//!
//! - The delete call is issued at most once per logical delete; once the
//!   state records it as issued, only describes follow.
//! - A resource that is already gone, whether reported by the delete call
//!   or by a describe, is a successful delete.
//! - Any other provider failure ends the delete with its classified error.

use async_trait::async_trait;

use crate::classifier::{classify, ApiOperation, ResourceRef};
use crate::error::{HandlerResult, ProviderResult};

/// Progress carried between delete invocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeleteState {
    /// The provider accepted the delete call.
    pub delete_issued: bool,
    /// The resource was observed gone.
    ///
    /// [`reconcile_delete`] honours this when the caller sends it back but
    /// never sets it: observing the resource gone ends the delete with
    /// [`DeleteProgress::Deleted`] instead of another round trip.
    pub confirmed: bool,
}

impl DeleteState {
    /// State after the provider accepted the delete call.
    pub fn issued() -> Self {
        Self {
            delete_issued: true,
            confirmed: false,
        }
    }
}

/// Result of one delete reconciliation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteProgress {
    /// The resource no longer exists.
    Deleted,
    /// The resource is still visible; poll again with this state.
    Pending(DeleteState),
}

/// A resource that is deleted asynchronously.
#[async_trait]
pub trait DeleteTarget: Send + Sync {
    /// The resource being deleted, used to classify failures.
    fn resource(&self) -> ResourceRef;

    fn delete_operation(&self) -> ApiOperation;

    fn describe_operation(&self) -> ApiOperation;

    /// Asks the provider to delete the resource.
    async fn issue_delete(&self) -> ProviderResult<()>;

    /// Describes the resource, returning its status when the provider
    /// reports one. A missing resource is a ResourceNotFound error.
    async fn describe(&self) -> ProviderResult<Option<String>>;
}

/// Advances a delete by one step.
///
/// `state` is the state echoed back by the caller, or `None` on the first
/// invocation.
pub async fn reconcile_delete<T>(target: &T, state: Option<DeleteState>) -> HandlerResult<DeleteProgress>
where
    T: DeleteTarget + ?Sized,
{
    let state = state.unwrap_or_default();
    if state.confirmed {
        return Ok(DeleteProgress::Deleted);
    }

    let state = if state.delete_issued {
        state
    } else {
        match target.issue_delete().await {
            Ok(()) => {
                tracing::debug!(
                    resource_type = target.resource().type_name,
                    identifier = %target.resource().identifier,
                    "Delete accepted"
                );
                DeleteState::issued()
            }
            Err(error) if error.is_not_found() => {
                tracing::info!(
                    resource_type = target.resource().type_name,
                    identifier = %target.resource().identifier,
                    "Resource already absent, nothing to delete"
                );
                return Ok(DeleteProgress::Deleted);
            }
            Err(error) => {
                return Err(classify(target.delete_operation(), &error, &target.resource()));
            }
        }
    };

    match target.describe().await {
        Ok(status) => {
            tracing::debug!(
                resource_type = target.resource().type_name,
                identifier = %target.resource().identifier,
                status = status.as_deref().unwrap_or("UNKNOWN"),
                "Resource still present, polling again"
            );
            Ok(DeleteProgress::Pending(state))
        }
        Err(error) if error.is_not_found() => Ok(DeleteProgress::Deleted),
        Err(error) => Err(classify(target.describe_operation(), &error, &target.resource())),
    }
}
