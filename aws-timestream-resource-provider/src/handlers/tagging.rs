//! Applying tag changes to a resource.

use crate::classifier::{classify, ApiOperation, ResourceRef};
use crate::client::TaggingApi;
use crate::error::HandlerResult;
use crate::model::Tag;
use crate::request::ResourceHandlerRequest;
use crate::tags::{self, TagDiff, TagMap};

/// Tags before and after an update, including stack-level tags.
pub fn update_tag_sets<M>(
    request: &ResourceHandlerRequest<M>,
    desired_tags: Option<&[Tag]>,
    previous_tags: Option<&[Tag]>,
) -> (TagMap, TagMap) {
    let previous = tags::previously_attached(request.previous_resource_tags.as_ref(), previous_tags);
    let desired = tags::new_desired(desired_tags, request.desired_resource_tags.as_ref());
    (previous, desired)
}

/// Moves the resource at `arn` from `previous` to `desired` tags.
///
/// Keys are removed before new values are added, so a failed add never
/// leaves a stale key behind.
pub async fn reconcile_tags<C>(
    client: &C,
    arn: &str,
    previous: &TagMap,
    desired: &TagMap,
    resource: &ResourceRef,
) -> HandlerResult<()>
where
    C: TaggingApi + ?Sized,
{
    let diff = TagDiff::between(previous, desired);
    if diff.is_empty() {
        return Ok(());
    }
    tracing::debug!(
        arn,
        adding = diff.to_add.len(),
        removing = diff.to_remove.len(),
        "Reconciling tags"
    );

    if !diff.to_remove.is_empty() {
        client
            .untag_resource(arn, &diff.keys_to_remove())
            .await
            .map_err(|e| classify(ApiOperation::UntagResource, &e, resource))?;
    }
    if !diff.to_add.is_empty() {
        client
            .tag_resource(arn, &diff.to_add)
            .await
            .map_err(|e| classify(ApiOperation::TagResource, &e, resource))?;
    }
    Ok(())
}

/// Reads the tags attached to `arn`; an empty set reads as `None`.
pub async fn read_tags<C>(client: &C, arn: &str, resource: &ResourceRef) -> HandlerResult<Option<Vec<Tag>>>
where
    C: TaggingApi + ?Sized,
{
    let attached = client
        .list_tags_for_resource(arn)
        .await
        .map_err(|e| classify(ApiOperation::ListTagsForResource, &e, resource))?;
    Ok(tags::to_model_tags(&attached))
}
